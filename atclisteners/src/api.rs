//! Endpoints API REST du registre d'auditeurs
//!
//! - `POST /api/listeners` `{sessionId}` : heartbeat
//! - `GET /api/listeners` : nombre d'auditeurs
//! - `DELETE /api/listeners` `{sessionId?}` : départ d'un auditeur

use crate::error::Error;
use crate::registry::ListenerRegistry;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Corps des requêtes POST et DELETE
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// Identifiant opaque généré par le client
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Réponse des requêtes POST et DELETE
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListenersUpdateResponse {
    pub success: bool,
    pub listeners: usize,
}

/// Réponse de GET
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListenersCountResponse {
    pub listeners: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Crée le router du registre
pub fn create_router(registry: Arc<ListenerRegistry>) -> Router {
    Router::new()
        .route(
            "/api/listeners",
            get(count_listeners)
                .post(register_heartbeat)
                .delete(remove_listener),
        )
        .with_state(registry)
}

/// POST /api/listeners
#[utoipa::path(
    post,
    path = "/api/listeners",
    tag = "listeners",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Heartbeat enregistré", body = ListenersUpdateResponse),
        (status = 400, description = "sessionId manquant", body = ErrorResponse),
        (status = 500, description = "Corps invalide", body = ErrorResponse)
    )
)]
async fn register_heartbeat(
    State(registry): State<Arc<ListenerRegistry>>,
    body: Bytes,
) -> Response {
    let request: SessionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!("Error registering heartbeat: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register heartbeat",
            );
        }
    };

    match registry.heartbeat(request.session_id.as_deref().unwrap_or_default()) {
        Ok(listeners) => {
            debug!(listeners, "Heartbeat registered");
            Json(ListenersUpdateResponse {
                success: true,
                listeners,
            })
            .into_response()
        }
        Err(e @ Error::BadRequest) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

/// GET /api/listeners
#[utoipa::path(
    get,
    path = "/api/listeners",
    tag = "listeners",
    responses((status = 200, description = "Nombre d'auditeurs", body = ListenersCountResponse))
)]
async fn count_listeners(
    State(registry): State<Arc<ListenerRegistry>>,
) -> Json<ListenersCountResponse> {
    Json(ListenersCountResponse {
        listeners: registry.count(),
    })
}

/// DELETE /api/listeners
///
/// Un corps vide ou sans `sessionId` ne fait que purger les sessions périmées.
#[utoipa::path(
    delete,
    path = "/api/listeners",
    tag = "listeners",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Auditeur retiré", body = ListenersUpdateResponse),
        (status = 500, description = "Corps invalide", body = ErrorResponse)
    )
)]
async fn remove_listener(
    State(registry): State<Arc<ListenerRegistry>>,
    body: Bytes,
) -> Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        SessionRequest::default()
    } else {
        match serde_json::from_slice::<SessionRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                error!("Error removing listener: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to remove listener",
                );
            }
        }
    };

    let listeners = registry.remove(request.session_id.as_deref());
    Json(ListenersUpdateResponse {
        success: true,
        listeners,
    })
    .into_response()
}
