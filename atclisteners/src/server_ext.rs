//! Extension atcserver pour le registre d'auditeurs
//!
//! ```rust,no_run
//! use atclisteners::ListenersExt;
//! use atcserver::ServerBuilder;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut server = ServerBuilder::new_configured().build();
//! let registry = server.init_listeners().await;
//! # Ok(())
//! # }
//! ```

use crate::api::create_router;
use crate::config_ext::ListenersConfigExt;
use crate::openapi::ListenersApiDoc;
use crate::registry::ListenerRegistry;
use atcserver::Server;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use utoipa::OpenApi;

/// Trait pour étendre atcserver avec le registre d'auditeurs
pub trait ListenersExt {
    /// Crée le registre depuis la configuration et enregistre `/api/listeners`
    async fn init_listeners(&mut self) -> Arc<ListenerRegistry>;

    /// Enregistre `/api/listeners` sur un registre existant
    async fn init_listeners_with_registry(
        &mut self,
        registry: Arc<ListenerRegistry>,
    ) -> Arc<ListenerRegistry>;
}

impl ListenersExt for Server {
    async fn init_listeners(&mut self) -> Arc<ListenerRegistry> {
        let timeout = Duration::from_secs(atcconfig::get_config().get_listeners_timeout_secs());
        self.init_listeners_with_registry(Arc::new(ListenerRegistry::with_timeout(timeout)))
            .await
    }

    async fn init_listeners_with_registry(
        &mut self,
        registry: Arc<ListenerRegistry>,
    ) -> Arc<ListenerRegistry> {
        self.add_openapi(
            create_router(registry.clone()),
            ListenersApiDoc::openapi(),
            "listeners",
        )
        .await;

        info!(timeout_secs = registry.timeout().as_secs(), "Listener registry initialized");
        registry
    }
}
