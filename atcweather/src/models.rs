//! Upstream weather records and the report served to the player

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One METAR record of the aviation weather API
///
/// Numeric fields are kept as raw JSON: `wdir` may be `"VRB"`, `visib`
/// may be `"10+"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetarRecord {
    #[serde(rename = "rawOb")]
    pub raw_ob: Option<String>,
    pub raw_text: Option<String>,
    pub temp: Option<Value>,
    pub wspd: Option<Value>,
    pub wdir: Option<Value>,
    pub visib: Option<Value>,
    pub altim: Option<Value>,
    #[serde(rename = "reportTime")]
    pub report_time: Option<Value>,
    #[serde(rename = "obsTime")]
    pub obs_time: Option<Value>,
}

impl MetarRecord {
    pub fn raw(&self) -> Option<&str> {
        non_empty(&self.raw_ob).or_else(|| non_empty(&self.raw_text))
    }
}

/// One TAF record of the aviation weather API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TafRecord {
    #[serde(rename = "rawTAF")]
    pub raw_taf: Option<String>,
    pub raw_text: Option<String>,
}

impl TafRecord {
    pub fn raw(&self) -> Option<&str> {
        non_empty(&self.raw_taf).or_else(|| non_empty(&self.raw_text))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Answer of the sunrise-sunset API
#[derive(Debug, Clone, Deserialize)]
pub struct SunResponse {
    pub status: String,
    pub results: Option<SunTimes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

/// Weather of an airport, as served by `GET /api/weather`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub raw: Option<String>,
    pub temp: Option<Value>,
    pub wind_speed: Option<Value>,
    pub wind_dir: Option<Value>,
    pub visibility: Option<Value>,
    pub qnh: Option<Value>,
    pub report_time: Option<Value>,
    pub taf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
}

impl WeatherReport {
    pub fn from_records(metar: &MetarRecord, taf: Option<&TafRecord>, sun: Option<SunTimes>) -> Self {
        let report_time = metar
            .report_time
            .clone()
            .filter(|v| !v.is_null())
            .or_else(|| metar.obs_time.clone());
        let (sunrise, sunset) = match sun {
            Some(sun) => (Some(sun.sunrise), Some(sun.sunset)),
            None => (None, None),
        };

        Self {
            raw: metar.raw().map(str::to_string),
            temp: metar.temp.clone(),
            wind_speed: metar.wspd.clone(),
            wind_dir: metar.wdir.clone(),
            visibility: metar.visib.clone(),
            qnh: metar.altim.clone(),
            report_time,
            taf: taf.and_then(TafRecord::raw).map(str::to_string),
            sunrise,
            sunset,
        }
    }

    /// Plausible report for `icao` when the real one is unavailable
    pub fn fallback(icao: &str, now: DateTime<Utc>) -> Self {
        let day = now.format("%d");
        let hour = now.hour();
        let minute = now.minute();
        let end_hour = (hour + 6) % 24;

        let at = |h: u32, m: u32| {
            NaiveTime::from_hms_opt(h, m, 0)
                .map(|t| now.date_naive().and_time(t).and_utc())
                .unwrap_or(now)
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        };

        Self {
            raw: Some(format!(
                "{icao} {day}{hour:02}{minute:02}Z 27015KT 9999 FEW020 BKN040 02/M01 Q1013 NOSIG"
            )),
            temp: Some(2.into()),
            wind_speed: Some(15.into()),
            wind_dir: Some(270.into()),
            visibility: Some(10.into()),
            qnh: Some(1013.into()),
            report_time: Some(
                now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
                    .into(),
            ),
            taf: Some(format!(
                "TAF {icao} {day}{hour:02}00Z {day}{hour:02}/{day}{end_hour:02} 27015KT 9999 FEW020 BKN040"
            )),
            sunrise: Some(at(8, 30)),
            sunset: Some(at(16, 45)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_records_prefers_raw_ob_and_report_time() {
        let metar: MetarRecord = serde_json::from_value(json!({
            "rawOb": "ULLI 171230Z 24005MPS 9999 SCT020 08/05 Q1015 NOSIG",
            "raw_text": "ignored",
            "temp": 8, "wspd": 10, "wdir": "VRB", "visib": "6+", "altim": 1015,
            "reportTime": "2026-10-17 12:30:00", "obsTime": 1_792_240_200
        }))
        .unwrap();
        let taf: TafRecord = serde_json::from_value(json!({"raw_text": "TAF ULLI 171100Z"})).unwrap();

        let report = WeatherReport::from_records(&metar, Some(&taf), None);
        assert_eq!(
            report.raw.as_deref(),
            Some("ULLI 171230Z 24005MPS 9999 SCT020 08/05 Q1015 NOSIG")
        );
        assert_eq!(report.wind_dir, Some(json!("VRB")));
        assert_eq!(report.report_time, Some(json!("2026-10-17 12:30:00")));
        assert_eq!(report.taf.as_deref(), Some("TAF ULLI 171100Z"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["windSpeed"], 10);
        assert_eq!(json["qnh"], 1015);
        assert!(json.get("sunrise").is_none());
    }

    #[test]
    fn test_from_records_falls_back_to_obs_time_and_raw_text() {
        let metar: MetarRecord =
            serde_json::from_value(json!({"raw_text": "URSS 171200Z", "obsTime": 1_792_238_400}))
                .unwrap();
        let report = WeatherReport::from_records(
            &metar,
            None,
            Some(SunTimes {
                sunrise: "2026-10-17T04:12:00+00:00".into(),
                sunset: "2026-10-17T14:58:00+00:00".into(),
            }),
        );
        assert_eq!(report.raw.as_deref(), Some("URSS 171200Z"));
        assert_eq!(report.report_time, Some(json!(1_792_238_400u64)));
        assert_eq!(report.taf, None);
        assert_eq!(report.sunset.as_deref(), Some("2026-10-17T14:58:00+00:00"));
    }

    #[test]
    fn test_fallback() {
        let now = Utc.with_ymd_and_hms(2026, 10, 7, 21, 5, 42).unwrap();
        let report = WeatherReport::fallback("UNNT", now);

        assert_eq!(
            report.raw.as_deref(),
            Some("UNNT 072105Z 27015KT 9999 FEW020 BKN040 02/M01 Q1013 NOSIG")
        );
        assert_eq!(
            report.taf.as_deref(),
            Some("TAF UNNT 072100Z 0721/0703 27015KT 9999 FEW020 BKN040")
        );
        assert_eq!(report.temp, Some(json!(2)));
        assert_eq!(report.report_time, Some(json!("2026-10-07T21:05:42.000Z")));
        assert_eq!(report.sunrise.as_deref(), Some("2026-10-07T08:30:00.000Z"));
        assert_eq!(report.sunset.as_deref(), Some("2026-10-07T16:45:00.000Z"));
    }
}
