//! Extension atcserver pour le relais de flux
//!
//! Ce module fournit un trait d'extension pour ajouter le relais audio à un
//! serveur atcserver, sans que atcserver dépende de atcstream.
//!
//! # Exemple
//!
//! ```rust,no_run
//! use atcstream::StreamRelayExt;
//! use atcserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_stream_relay().await?;
//!
//!     server.start().await;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

use crate::api_rest::StreamState;
use anyhow::Result;

/// Trait pour étendre atcserver avec le relais de flux
pub trait StreamRelayExt {
    /// Initialise le relais depuis la configuration et enregistre les routes
    ///
    /// # Routes enregistrées
    ///
    /// - `GET|OPTIONS /api/stream-proxy/{source}/{code}` - Relais audio
    /// - `GET|OPTIONS /api/stream-proxy/{code}` - Relais radioscanner (ancienne forme)
    /// - `GET /api/stream/{code}` - Infos du flux
    /// - `GET /api/airports` - Catalogue des aéroports
    async fn init_stream_relay(&mut self) -> Result<StreamState>;

    /// Enregistre les routes avec un état déjà construit
    async fn init_stream_relay_with_state(&mut self, state: StreamState) -> StreamState;
}
