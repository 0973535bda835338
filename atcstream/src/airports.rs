//! Airport catalogue
//!
//! Static list of the airports offered by the player, with the stream each
//! one maps to and the coordinates used for sun times.

use crate::error::Result;
use crate::models::{StationSource, StreamTarget};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ambient track mixed under the ATC audio by the player
pub const DEFAULT_AMBIENT_MUSIC_URL: &str = "https://ice3.somafm.com/fluid-128-mp3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    /// ICAO code
    pub code: String,
    pub city: String,
    pub source: StationSource,
    pub stream_code: String,
    pub frequency: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_music_url: Option<String>,
}

impl Airport {
    fn new(
        code: &str,
        city: &str,
        source: StationSource,
        stream_code: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            code: code.to_string(),
            city: city.to_string(),
            source,
            stream_code: stream_code.to_string(),
            frequency: "ATC Mix".to_string(),
            latitude,
            longitude,
            ambient_music_url: Some(DEFAULT_AMBIENT_MUSIC_URL.to_string()),
        }
    }

    /// Stream to relay for this airport
    pub fn stream_target(&self) -> Result<StreamTarget> {
        StreamTarget::new(self.source, self.stream_code.clone())
    }

    /// Relay path the player should request
    pub fn relay_path(&self) -> String {
        format!("/api/stream-proxy/{}/{}", self.source, self.stream_code)
    }
}

static AIRPORTS: Lazy<Vec<Airport>> = Lazy::new(|| {
    vec![
        Airport::new(
            "ULLI",
            "Санкт-Петербург (Пулково)",
            StationSource::ScannerPage,
            "ulli",
            59.8003,
            30.2625,
        ),
        Airport::new(
            "URSS",
            "Сочи (Адлер)",
            StationSource::DirectStream,
            "urss",
            43.4499,
            39.9566,
        ),
        Airport::new(
            "UNNT",
            "Новосибирск (Толмачёво)",
            StationSource::DirectStream,
            "unnt",
            55.0198,
            82.6187,
        ),
    ]
});

/// All airports, default first
pub fn airports() -> &'static [Airport] {
    &AIRPORTS
}

/// Airport offered when none is selected
pub fn default_airport() -> &'static Airport {
    &AIRPORTS[0]
}

/// Look an airport up by ICAO code (case-insensitive)
pub fn find_airport(icao: &str) -> Option<&'static Airport> {
    let icao = icao.trim();
    AIRPORTS.iter().find(|a| a.code.eq_ignore_ascii_case(icao))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        let codes: Vec<&str> = airports().iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["ULLI", "URSS", "UNNT"]);
        assert_eq!(default_airport().code, "ULLI");
        assert_eq!(default_airport().city, "Санкт-Петербург (Пулково)");
        assert_eq!(find_airport("UNNT").unwrap().city, "Новосибирск (Толмачёво)");
    }

    #[test]
    fn test_find_airport_case_insensitive() {
        let urss = find_airport("urss").unwrap();
        assert_eq!(urss.source, StationSource::DirectStream);
        assert_eq!(urss.relay_path(), "/api/stream-proxy/liveatc/urss");
        assert!(find_airport("LFPG").is_none());
    }

    #[test]
    fn test_stream_target() {
        let target = default_airport().stream_target().unwrap();
        assert_eq!(target.source, StationSource::ScannerPage);
        assert_eq!(target.station_code, "ulli");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(default_airport()).unwrap();
        assert_eq!(json["streamCode"], "ulli");
        assert_eq!(json["source"], "radioscanner");
        assert_eq!(json["ambientMusicUrl"], DEFAULT_AMBIENT_MUSIC_URL);
        assert_eq!(json["latitude"], 59.8003);
    }
}
