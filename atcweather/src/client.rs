//! HTTP client for the aviation weather and sunrise-sunset APIs
//!
//! # Example
//!
//! ```no_run
//! use atcweather::WeatherClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WeatherClient::new()?;
//!     let report = client.report("ulli").await;
//!     println!("{}", report.raw.unwrap_or_default());
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{MetarRecord, SunResponse, SunTimes, TafRecord, WeatherReport};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default aviation weather API (NOAA)
pub const DEFAULT_AVIATION_API_BASE: &str = "https://aviationweather.gov/api/data";

/// Default sun times API
pub const DEFAULT_SUN_API_BASE: &str = "https://api.sunrise-sunset.org";

/// Default timeout for weather requests (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Airport used when the request names none
pub const DEFAULT_ICAO: &str = "ULLI";

/// Coordinates used for airports missing from the catalogue (Pulkovo)
pub const FALLBACK_COORDINATES: (f64, f64) = (59.8003, 30.2625);

/// Stateless weather client; nothing is cached
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    aviation_api_base: String,
    sun_api_base: String,
}

impl WeatherClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> WeatherClientBuilder {
        WeatherClientBuilder::default()
    }

    /// Latest METAR of an airport, `None` when the API has none
    pub async fn metar(&self, icao: &str) -> Result<Option<MetarRecord>> {
        let url = format!("{}/metar", self.aviation_api_base.trim_end_matches('/'));
        let records: Vec<MetarRecord> = self
            .get_json(&url, &[("ids", icao), ("format", "json")])
            .await?;
        Ok(records.into_iter().next())
    }

    /// Latest TAF of an airport, `None` when the API has none
    pub async fn taf(&self, icao: &str) -> Result<Option<TafRecord>> {
        let url = format!("{}/taf", self.aviation_api_base.trim_end_matches('/'));
        let records: Vec<TafRecord> = self
            .get_json(&url, &[("ids", icao), ("format", "json")])
            .await?;
        Ok(records.into_iter().next())
    }

    /// Sunrise and sunset (UTC, ISO 8601) at the given coordinates
    pub async fn sun_times(&self, latitude: f64, longitude: f64) -> Result<SunTimes> {
        let url = format!("{}/json", self.sun_api_base.trim_end_matches('/'));
        let (lat, lng) = (latitude.to_string(), longitude.to_string());
        let response: SunResponse = self
            .get_json(&url, &[("lat", lat.as_str()), ("lng", lng.as_str()), ("formatted", "0")])
            .await?;

        match response.results {
            Some(times) if response.status == "OK" => Ok(times),
            _ => Err(Error::NoData("sun times")),
        }
    }

    /// Weather of an airport; always answers, falling back to a synthetic
    /// report when no METAR can be obtained
    pub async fn report(&self, icao: &str) -> WeatherReport {
        let icao = normalize_icao(icao);
        let (latitude, longitude) = atcstream::find_airport(&icao)
            .map(|a| (a.latitude, a.longitude))
            .unwrap_or(FALLBACK_COORDINATES);

        let (metar, taf, sun) = tokio::join!(
            self.metar(&icao),
            self.taf(&icao),
            self.sun_times(latitude, longitude)
        );

        let taf = taf.unwrap_or_else(|e| {
            warn!(%icao, "TAF fetch error: {}", e);
            None
        });
        let sun = sun
            .map_err(|e| warn!("Sun times fetch error: {}", e))
            .ok();

        match metar {
            Ok(Some(metar)) => {
                debug!(%icao, "METAR found");
                WeatherReport::from_records(&metar, taf.as_ref(), sun)
            }
            Ok(None) => {
                warn!(%icao, "Weather fetch error: {}", Error::NoData("METAR"));
                WeatherReport::fallback(&icao, chrono::Utc::now())
            }
            Err(e) => {
                warn!(%icao, "Weather fetch error: {}", e);
                WeatherReport::fallback(&icao, chrono::Utc::now())
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        // The aviation API answers 204 with an empty body for unknown stations
        if status == reqwest::StatusCode::NO_CONTENT {
            return Err(Error::NoData("weather"));
        }
        Ok(response.json().await?)
    }
}

/// Upper-cased ICAO code, [`DEFAULT_ICAO`] when blank
pub fn normalize_icao(icao: &str) -> String {
    match icao.trim() {
        "" => DEFAULT_ICAO.to_string(),
        code => code.to_uppercase(),
    }
}

/// Builder for a [`WeatherClient`]
#[derive(Debug)]
pub struct WeatherClientBuilder {
    client: Option<Client>,
    aviation_api_base: String,
    sun_api_base: String,
    timeout: Duration,
}

impl Default for WeatherClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            aviation_api_base: DEFAULT_AVIATION_API_BASE.to_string(),
            sun_api_base: DEFAULT_SUN_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl WeatherClientBuilder {
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn aviation_api_base(mut self, url: impl Into<String>) -> Self {
        self.aviation_api_base = url.into();
        self
    }

    pub fn sun_api_base(mut self, url: impl Into<String>) -> Self {
        self.sun_api_base = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<WeatherClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().timeout(self.timeout).build()?,
        };
        Ok(WeatherClient {
            client,
            aviation_api_base: self.aviation_api_base,
            sun_api_base: self.sun_api_base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_icao() {
        assert_eq!(normalize_icao("urss"), "URSS");
        assert_eq!(normalize_icao(" unnt "), "UNNT");
        assert_eq!(normalize_icao(""), DEFAULT_ICAO);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = WeatherClientBuilder::default();
        assert_eq!(builder.aviation_api_base, DEFAULT_AVIATION_API_BASE);
        assert_eq!(builder.sun_api_base, DEFAULT_SUN_API_BASE);
        assert_eq!(builder.timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }
}
