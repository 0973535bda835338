//! Data model for stream targets and resolved streams

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;
use utoipa::ToSchema;

/// How the upstream URL of a station is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StationSource {
    /// URL embedded in a scanner web page (radioscanner)
    #[serde(rename = "radioscanner")]
    ScannerPage,
    /// URL computed from a fixed template (liveatc)
    #[serde(rename = "liveatc")]
    DirectStream,
}

impl StationSource {
    /// Identifier used in URLs and in the airport catalogue
    pub fn id(&self) -> &'static str {
        match self {
            StationSource::ScannerPage => "radioscanner",
            StationSource::DirectStream => "liveatc",
        }
    }
}

impl FromStr for StationSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "radioscanner" => Ok(StationSource::ScannerPage),
            "liveatc" => Ok(StationSource::DirectStream),
            _ => Err(Error::UnknownSource(s.to_string())),
        }
    }
}

impl fmt::Display for StationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A station to resolve, built per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub source: StationSource,
    pub station_code: String,
}

impl StreamTarget {
    /// Build a target; the station code must not be blank
    pub fn new(source: StationSource, station_code: impl Into<String>) -> Result<Self> {
        let station_code = station_code.into();
        if station_code.trim().is_empty() {
            return Err(Error::BadRequest);
        }
        Ok(Self {
            source,
            station_code,
        })
    }

    /// Parse a raw `(source, code)` pair coming from a request path
    pub fn parse(source: &str, station_code: &str) -> Result<Self> {
        if source.trim().is_empty() || station_code.trim().is_empty() {
            return Err(Error::BadRequest);
        }
        Self::new(source.trim().parse()?, station_code.trim())
    }

    /// Station code as used in upstream URLs
    pub fn normalized_code(&self) -> String {
        self.station_code.to_lowercase()
    }
}

/// A concrete, fetchable upstream audio URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    url: Url,
}

impl ResolvedStream {
    pub fn parse(raw: &str) -> std::result::Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(raw.trim())?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl From<Url> for ResolvedStream {
    fn from(url: Url) -> Self {
        Self { url }
    }
}

impl fmt::Display for ResolvedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// What a scanner page tells about a station
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerPage {
    pub stream: ResolvedStream,
    /// Best-effort listener count read from the page (0 when absent)
    pub listeners: u32,
}

/// Response of `GET /api/stream/{code}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub stream_url: String,
    pub listeners: u32,
    pub is_live: bool,
}

impl From<ScannerPage> for StreamInfo {
    fn from(page: ScannerPage) -> Self {
        Self {
            stream_url: page.stream.to_string(),
            listeners: page.listeners,
            is_live: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_str_is_case_insensitive() {
        assert_eq!(
            "radioscanner".parse::<StationSource>().unwrap(),
            StationSource::ScannerPage
        );
        assert_eq!(
            "LiveATC".parse::<StationSource>().unwrap(),
            StationSource::DirectStream
        );
        match "broadcastify".parse::<StationSource>() {
            Err(Error::UnknownSource(s)) => assert_eq!(s, "broadcastify"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_source_serializes_to_identifier() {
        assert_eq!(
            serde_json::to_value(StationSource::ScannerPage).unwrap(),
            "radioscanner"
        );
        assert_eq!(StationSource::DirectStream.to_string(), "liveatc");
    }

    #[test]
    fn test_target_rejects_blank_code() {
        assert!(matches!(
            StreamTarget::parse("liveatc", "  "),
            Err(Error::BadRequest)
        ));
        assert!(matches!(
            StreamTarget::parse("", "urss"),
            Err(Error::BadRequest)
        ));
    }

    #[test]
    fn test_target_normalizes_code() {
        let target = StreamTarget::parse("liveatc", "URSS").unwrap();
        assert_eq!(target.station_code, "URSS");
        assert_eq!(target.normalized_code(), "urss");
    }

    #[test]
    fn test_resolved_stream_requires_a_url() {
        assert!(ResolvedStream::parse("not a url").is_err());
        let stream = ResolvedStream::parse("https://example.test/abc").unwrap();
        assert_eq!(stream.as_str(), "https://example.test/abc");
    }

    #[test]
    fn test_stream_info_json_shape() {
        let info = StreamInfo::from(ScannerPage {
            stream: ResolvedStream::parse("http://up.test/live.mp3").unwrap(),
            listeners: 7,
        });
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["streamUrl"], "http://up.test/live.mp3");
        assert_eq!(json["listeners"], 7);
        assert_eq!(json["isLive"], true);
    }
}
