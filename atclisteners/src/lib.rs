//! # atclisteners - Registre des auditeurs
//!
//! Compte approximativement les auditeurs connectés à partir des heartbeats
//! envoyés par le lecteur. Les sessions muettes depuis plus de 60 secondes
//! (configurable via `listeners.timeout_secs`) sont purgées à chaque appel.
//!
//! Le registre vit en mémoire, dans un seul processus.

pub mod api;
pub mod config_ext;
pub mod error;
pub mod openapi;
pub mod registry;
pub mod server_ext;

pub use api::create_router;
pub use config_ext::ListenersConfigExt;
pub use error::{Error, Result};
pub use registry::{ListenerRegistry, DEFAULT_LISTENER_TIMEOUT_SECS};
pub use server_ext::ListenersExt;
