//! Implémentation du trait StreamRelayExt pour atcserver::Server

use crate::api_rest::{create_router, StreamState};
use crate::config_ext::StreamConfigExt;
use crate::openapi::StreamApiDoc;
use crate::relay::StreamRelay;
use crate::server_ext::StreamRelayExt;
use anyhow::Result;
use atcserver::Server;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

impl StreamRelayExt for Server {
    async fn init_stream_relay(&mut self) -> Result<StreamState> {
        info!("Initializing stream relay...");

        let config = atcconfig::get_config();
        let resolver = config
            .build_resolver()
            .map_err(|e| anyhow::anyhow!("Failed to create upstream resolver: {}", e))?;
        let relay = StreamRelay::from_resolver(Arc::new(resolver));

        Ok(self
            .init_stream_relay_with_state(StreamState::new(Arc::new(relay)))
            .await)
    }

    async fn init_stream_relay_with_state(&mut self, state: StreamState) -> StreamState {
        self.add_openapi(
            create_router(state.clone()),
            StreamApiDoc::openapi(),
            "stream",
        )
        .await;

        info!("Stream relay available at /api/stream-proxy/{{source}}/{{code}}");
        state
    }
}
