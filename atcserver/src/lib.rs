//! # atcserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit le serveur HTTP d'ATCRadio. Elle ne connaît aucune
//! logique métier : les crates de domaine (`atcstream`, `atclisteners`,
//! `atcweather`) ajoutent leurs routes via des traits d'extension sur
//! [`Server`].
//!
//! ## Fonctionnalités
//!
//! - **API de haut niveau** : routes JSON, handlers avec état, APIs documentées
//! - **Server-Sent Events (SSE)** : logs en temps réel via `/log-sse`
//! - **Documentation OpenAPI** : Swagger UI par API
//! - **Arrêt sur Ctrl+C**
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use atcserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_logging().await;
//!
//!     server.add_route("/info", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, SseLayer, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
