//! Extension atcserver pour la météo

use crate::api::create_router;
use crate::client::WeatherClient;
use crate::config_ext::WeatherConfigExt;
use crate::openapi::WeatherApiDoc;
use anyhow::Result;
use atcserver::Server;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

/// Trait pour étendre atcserver avec l'API météo
pub trait WeatherExt {
    /// Crée le client depuis la configuration et enregistre `/api/weather`
    async fn init_weather(&mut self) -> Result<Arc<WeatherClient>>;

    async fn init_weather_with_client(&mut self, client: Arc<WeatherClient>) -> Arc<WeatherClient>;
}

impl WeatherExt for Server {
    async fn init_weather(&mut self) -> Result<Arc<WeatherClient>> {
        let client = atcconfig::get_config()
            .build_weather_client()
            .map_err(|e| anyhow::anyhow!("Failed to create weather client: {}", e))?;
        Ok(self.init_weather_with_client(Arc::new(client)).await)
    }

    async fn init_weather_with_client(&mut self, client: Arc<WeatherClient>) -> Arc<WeatherClient> {
        self.add_openapi(create_router(client.clone()), WeatherApiDoc::openapi(), "weather")
            .await;
        info!("Weather API available at /api/weather");
        client
    }
}
