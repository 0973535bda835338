//! # atcstream - Relais des flux audio ATC
//!
//! Cette crate trouve l'URL réelle d'un flux ATC et le relaie au navigateur.
//!
//! - [`UpstreamResolver`] : calcule l'URL (source `liveatc`) ou l'extrait de la
//!   page du scanner (source `radioscanner`), sans jamais la mettre en cache
//! - [`StreamRelay`] : ouvre le flux amont et le retransmet morceau par
//!   morceau avec des en-têtes CORS et anti-cache
//! - [`scrape`] : fonctions pures d'extraction sur le HTML du scanner
//! - [`airports`] : catalogue statique des aéroports
//!
//! Le relais s'installe sur un `atcserver::Server` via [`StreamRelayExt`],
//! et se configure via [`StreamConfigExt`].

pub mod airports;
pub mod api_rest;
pub mod config_ext;
pub mod error;
pub mod models;
pub mod openapi;
pub mod relay;
pub mod resolver;
pub mod scrape;
pub mod server_ext;
mod server_impl;

pub use airports::{airports, default_airport, find_airport, Airport};
pub use api_rest::{create_router, StreamState};
pub use config_ext::StreamConfigExt;
pub use error::{Error, Result};
pub use models::{ResolvedStream, ScannerPage, StationSource, StreamInfo, StreamTarget};
pub use relay::StreamRelay;
pub use resolver::{ResolverBuilder, StreamResolver, UpstreamResolver};
pub use server_ext::StreamRelayExt;
