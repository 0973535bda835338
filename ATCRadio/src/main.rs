use atclisteners::ListenersExt;
use atcserver::ServerBuilder;
use atcstream::StreamRelayExt;
use atcweather::WeatherExt;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = ServerBuilder::new_configured().build();
    server.init_logging().await;

    server
        .add_route("/info", || async {
            serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })
        })
        .await;

    // Le relais est le cœur de l'application: sans lui, inutile de démarrer.
    info!("📻 Initializing stream relay...");
    server.init_stream_relay().await?;

    info!("👂 Initializing listener registry...");
    server.init_listeners().await;

    info!("🌦️ Initializing weather API...");
    if let Err(e) = server.init_weather().await {
        warn!("⚠️ Failed to initialize weather API: {}", e);
    }

    for airport in atcstream::airports() {
        info!(
            "✈️  {} ({}) -> {}",
            airport.code,
            airport.city,
            airport.relay_path()
        );
    }

    server.start().await;
    server.wait().await;

    Ok(())
}
