//! # atcweather - Météo des aéroports
//!
//! Relaie le dernier METAR et TAF d'un aéroport (API aviationweather.gov)
//! ainsi que les heures de lever et coucher du soleil. Sans METAR, un
//! bulletin de repli plausible est renvoyé pour que le lecteur ait toujours
//! quelque chose à afficher.

pub mod api;
pub mod client;
pub mod config_ext;
pub mod error;
pub mod models;
pub mod openapi;
pub mod server_ext;

pub use client::{normalize_icao, WeatherClient, WeatherClientBuilder};
pub use config_ext::WeatherConfigExt;
pub use error::{Error, Result};
pub use models::{SunTimes, WeatherReport};
pub use server_ext::WeatherExt;
