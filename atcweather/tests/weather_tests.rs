//! Weather client and endpoint tests against a mock API

use atcweather::api::create_router;
use atcweather::WeatherClient;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WeatherClient {
    WeatherClient::builder()
        .aviation_api_base(server.uri())
        .sun_api_base(server.uri())
        .build()
        .unwrap()
}

async fn get_json(client: WeatherClient, uri: &str) -> Value {
    let response = create_router(Arc::new(client))
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_weather_from_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metar"))
        .and(query_param("ids", "URSS"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "rawOb": "URSS 171230Z 09003MPS CAVOK 18/09 Q1019 NOSIG",
            "temp": 18, "wspd": 6, "wdir": 90, "visib": "6+", "altim": 1019,
            "reportTime": "2026-10-17T12:30:00.000Z"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/taf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "rawTAF": "TAF URSS 171100Z 1712/1812 09005MPS CAVOK"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .and(query_param("lat", "43.4499"))
        .and(query_param("formatted", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": {
                "sunrise": "2026-10-17T04:12:00+00:00",
                "sunset": "2026-10-17T14:58:00+00:00"
            }
        })))
        .mount(&server)
        .await;

    let json = get_json(client_for(&server), "/api/weather?icao=urss").await;

    assert_eq!(json["raw"], "URSS 171230Z 09003MPS CAVOK 18/09 Q1019 NOSIG");
    assert_eq!(json["temp"], 18);
    assert_eq!(json["windSpeed"], 6);
    assert_eq!(json["windDir"], 90);
    assert_eq!(json["visibility"], "6+");
    assert_eq!(json["qnh"], 1019);
    assert_eq!(json["reportTime"], "2026-10-17T12:30:00.000Z");
    assert_eq!(json["taf"], "TAF URSS 171100Z 1712/1812 09005MPS CAVOK");
    assert_eq!(json["sunrise"], "2026-10-17T04:12:00+00:00");
    assert_eq!(json["sunset"], "2026-10-17T14:58:00+00:00");
}

#[tokio::test]
async fn test_missing_taf_and_sun_times_are_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"raw_text": "ULLI 171230Z", "temp": 3}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/taf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "INVALID_REQUEST"})))
        .mount(&server)
        .await;

    let json = get_json(client_for(&server), "/api/weather").await;

    assert_eq!(json["raw"], "ULLI 171230Z");
    assert_eq!(json["taf"], Value::Null);
    assert!(json.get("sunrise").is_none());
}

#[tokio::test]
async fn test_fallback_when_metar_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let json = get_json(client_for(&server), "/api/weather?icao=unnt").await;

    let raw = json["raw"].as_str().unwrap();
    assert!(raw.starts_with("UNNT "));
    assert!(raw.ends_with("Z 27015KT 9999 FEW020 BKN040 02/M01 Q1013 NOSIG"));
    assert_eq!(json["temp"], 2);
    assert_eq!(json["windSpeed"], 15);
    assert_eq!(json["windDir"], 270);
    assert_eq!(json["qnh"], 1013);
    assert!(json["taf"].as_str().unwrap().starts_with("TAF UNNT "));
    assert!(json["sunrise"].is_string());
}

#[tokio::test]
async fn test_unknown_airport_uses_fallback_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .and(query_param("lat", "59.8003"))
        .and(query_param("lng", "30.2625"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": {"sunrise": "a", "sunset": "b"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = client_for(&server).report("lfpg").await;
    assert!(report.raw.unwrap().starts_with("LFPG "));
}

#[tokio::test]
#[ignore = "Integration test - calls aviationweather.gov"]
async fn test_real_weather() {
    let report = WeatherClient::new().unwrap().report("ULLI").await;
    assert!(report.raw.unwrap().starts_with("ULLI"));
}
