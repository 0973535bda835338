//! Endpoints API REST du relais de flux
//!
//! Ce module définit les handlers HTTP du relais audio, des infos de flux et
//! du catalogue d'aéroports. Les routes portent leur chemin complet
//! (`/api/...`) et se montent à la racine du serveur.

use crate::airports::{airports, Airport};
use crate::error::Error;
use crate::models::{StationSource, StreamInfo};
use crate::relay::{insert_cors_headers, preflight_response, StreamRelay};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

/// État partagé des handlers de flux
#[derive(Clone)]
pub struct StreamState {
    pub relay: Arc<StreamRelay>,
}

impl StreamState {
    pub fn new(relay: Arc<StreamRelay>) -> Self {
        Self { relay }
    }
}

/// Corps d'erreur JSON
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============ Gestion des erreurs ============

/// Erreur de relais, avec le contexte de la requête pour les logs
struct RelayError {
    source: String,
    code: String,
    error: Error,
    /// Corps de l'ancienne route à un segment (sans `details`)
    legacy: bool,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!(source = %self.source, code = %self.code, error = %self.error, "Error proxying stream");
        } else {
            warn!(source = %self.source, code = %self.code, error = %self.error, "Rejected stream request");
        }

        let body = if self.legacy {
            self.error.legacy_body()
        } else {
            self.error.body()
        };
        let mut response = (status, Json(body)).into_response();
        insert_cors_headers(response.headers_mut());
        response
    }
}

/// Crée le router de l'API de flux
pub fn create_router(state: StreamState) -> Router {
    Router::new()
        .route(
            "/api/stream-proxy/{source}/{code}",
            get(proxy_stream).options(stream_preflight),
        )
        .route(
            "/api/stream-proxy/{source}",
            get(proxy_legacy).options(stream_preflight),
        )
        .route(
            "/api/stream-proxy/{source}/",
            get(proxy_missing_code).options(stream_preflight),
        )
        .route(
            "/api/stream-proxy",
            get(proxy_missing_params).options(stream_preflight),
        )
        .route("/api/stream-proxy/", get(proxy_missing_params))
        .route("/api/stream/{code}", get(stream_info))
        .route("/api/airports", get(list_airports))
        .with_state(state)
}

async fn relay(state: &StreamState, source: Option<&str>, code: Option<&str>) -> Response {
    relay_with(state, source, code, false).await
}

async fn relay_with(
    state: &StreamState,
    source: Option<&str>,
    code: Option<&str>,
    legacy: bool,
) -> Response {
    match state.relay.handle(source, code).await {
        Ok(response) => response,
        Err(error) => RelayError {
            source: source.unwrap_or_default().to_string(),
            code: code.unwrap_or_default().to_string(),
            error,
            legacy,
        }
        .into_response(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/stream-proxy/{source}/{code}
#[utoipa::path(
    get,
    path = "/api/stream-proxy/{source}/{code}",
    tag = "stream",
    params(
        ("source" = String, Path, description = "Source du flux: radioscanner ou liveatc"),
        ("code" = String, Path, description = "Code station (casse indifférente)")
    ),
    responses(
        (status = 200, description = "Flux audio continu (audio/mpeg)"),
        (status = 400, description = "Paramètres manquants ou source inconnue", body = ErrorResponse),
        (status = 404, description = "URL du flux introuvable dans la page scanner", body = ErrorResponse),
        (status = 500, description = "Échec du relais", body = ErrorResponse)
    )
)]
async fn proxy_stream(
    State(state): State<StreamState>,
    Path((source, code)): Path<(String, String)>,
) -> Response {
    relay(&state, Some(&source), Some(&code)).await
}

/// GET /api/stream-proxy/{code}
///
/// Ancienne forme à un segment: toujours la source radioscanner.
#[utoipa::path(
    get,
    path = "/api/stream-proxy/{code}",
    tag = "stream",
    params(("code" = String, Path, description = "Code station radioscanner")),
    responses(
        (status = 200, description = "Flux audio continu (audio/mpeg)"),
        (status = 400, description = "Code station manquant", body = ErrorResponse),
        (status = 404, description = "URL du flux introuvable", body = ErrorResponse),
        (status = 500, description = "Échec du relais, sans détails", body = ErrorResponse)
    )
)]
async fn proxy_legacy(State(state): State<StreamState>, Path(code): Path<String>) -> Response {
    relay_with(&state, Some(StationSource::ScannerPage.id()), Some(&code), true).await
}

async fn proxy_missing_code(
    State(state): State<StreamState>,
    Path(source): Path<String>,
) -> Response {
    relay(&state, Some(&source), None).await
}

async fn proxy_missing_params(State(state): State<StreamState>) -> Response {
    relay(&state, None, None).await
}

/// OPTIONS /api/stream-proxy/{source}/{code}
#[utoipa::path(
    options,
    path = "/api/stream-proxy/{source}/{code}",
    tag = "stream",
    params(
        ("source" = String, Path, description = "Source du flux"),
        ("code" = String, Path, description = "Code station")
    ),
    responses((status = 200, description = "En-têtes CORS, corps vide"))
)]
async fn stream_preflight() -> Response {
    preflight_response()
}

/// GET /api/stream/{code}
///
/// Infos du flux lues dans la page scanner.
#[utoipa::path(
    get,
    path = "/api/stream/{code}",
    tag = "stream",
    params(("code" = String, Path, description = "Code station radioscanner")),
    responses(
        (status = 200, description = "URL du flux et nombre d'auditeurs", body = StreamInfo),
        (status = 404, description = "URL du flux introuvable", body = ErrorResponse),
        (status = 500, description = "Page scanner inaccessible", body = ErrorResponse)
    )
)]
async fn stream_info(State(state): State<StreamState>, Path(code): Path<String>) -> Response {
    match state.relay.resolver().scanner_page(&code).await {
        Ok(page) => Json(StreamInfo::from(page)).into_response(),
        Err(Error::StreamUrlNotFound(_)) => {
            warn!(%code, "No stream URL in scanner page");
            error_response(StatusCode::NOT_FOUND, "Stream URL not found")
        }
        Err(e) => {
            error!(%code, error = %e, "Error fetching stream data");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch stream data")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorResponse {
        error: message.to_string(),
        details: None,
    };
    (status, Json(body)).into_response()
}

/// GET /api/airports
#[utoipa::path(
    get,
    path = "/api/airports",
    tag = "stream",
    responses((status = 200, description = "Catalogue des aéroports", body = Vec<Airport>))
)]
async fn list_airports() -> Json<Vec<Airport>> {
    Json(airports().to_vec())
}
