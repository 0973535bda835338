//! Endpoint `GET /api/weather?icao=XXXX`

use crate::client::{normalize_icao, WeatherClient};
use crate::models::WeatherReport;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherQuery {
    /// Code OACI de l'aéroport (défaut: ULLI)
    pub icao: Option<String>,
}

pub fn create_router(client: Arc<WeatherClient>) -> Router {
    Router::new()
        .route("/api/weather", get(get_weather))
        .with_state(client)
}

/// GET /api/weather
///
/// Répond toujours 200: sans METAR, un bulletin de repli est renvoyé.
#[utoipa::path(
    get,
    path = "/api/weather",
    tag = "weather",
    params(WeatherQuery),
    responses((status = 200, description = "METAR, TAF et heures du soleil", body = WeatherReport))
)]
async fn get_weather(
    State(client): State<Arc<WeatherClient>>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherReport> {
    let icao = normalize_icao(query.icao.as_deref().unwrap_or_default());
    Json(client.report(&icao).await)
}
