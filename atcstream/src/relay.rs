//! Stream Relay
//!
//! Forwards a live upstream audio stream to the caller, chunk by chunk, with
//! browser-friendly headers. Every failure is decided before the first body
//! byte: once the response is returned, the relay only forwards bytes until
//! either side hangs up.

use crate::error::{Error, Result};
use crate::models::StreamTarget;
use crate::resolver::{DEFAULT_USER_AGENT, StreamResolver, UpstreamResolver};
use axum::body::Body;
use axum::http::header::{
    ACCEPT, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, EXPIRES, PRAGMA,
    USER_AGENT,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use reqwest::Client;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{debug, info, warn};

/// Content type used when the upstream does not send one
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Icecast/Shoutcast metadata headers passed through when present
pub const STREAM_METADATA_HEADERS: &[&str] =
    &["icy-br", "icy-name", "icy-genre", "icy-url", "ice-audio-info"];

/// Relay between a [`StreamResolver`] and the upstream audio servers
pub struct StreamRelay {
    resolver: Arc<dyn StreamResolver>,
    client: Client,
    user_agent: String,
}

impl StreamRelay {
    /// Create a relay using `client` for the audio requests
    ///
    /// `client` must not carry a total request timeout, streams are unbounded.
    pub fn new(resolver: Arc<dyn StreamResolver>, client: Client) -> Self {
        Self {
            resolver,
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a relay sharing the resolver's connection pool and User-Agent
    pub fn from_resolver(resolver: Arc<UpstreamResolver>) -> Self {
        let client = resolver.http_client().clone();
        let user_agent = resolver.user_agent().to_string();
        Self::new(resolver, client).with_user_agent(user_agent)
    }

    /// Override the User-Agent sent to the audio upstream
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn resolver(&self) -> &Arc<dyn StreamResolver> {
        &self.resolver
    }

    /// Relay the stream of `(source, station_code)`
    ///
    /// Both values are validated before anything touches the network; an
    /// unknown source never reaches the resolver.
    pub async fn handle(
        &self,
        source: Option<&str>,
        station_code: Option<&str>,
    ) -> Result<Response> {
        let (source, station_code) = match (non_blank(source), non_blank(station_code)) {
            (Some(source), Some(code)) => (source, code),
            _ => return Err(Error::BadRequest),
        };
        let target = StreamTarget::parse(source, station_code)?;

        let stream = self.resolver.resolve(&target).await?;
        info!(
            source = %target.source,
            code = %target.station_code,
            url = %stream,
            "Relaying stream"
        );

        let upstream = self
            .client
            .get(stream.url().clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "audio/mpeg, audio/*")
            .header(CONNECTION, "keep-alive")
            .send()
            .await
            .map_err(|e| {
                Error::UpstreamFetchFailed(format!("Failed to fetch audio stream: {}", e))
            })?;

        let status = upstream.status();
        if !status.is_success() {
            return Err(Error::UpstreamFetchFailed(format!(
                "Failed to fetch audio stream: {}",
                status.as_u16()
            )));
        }
        if upstream.content_length() == Some(0) {
            return Err(Error::UpstreamFetchFailed("No stream body available".to_string()));
        }

        let headers = relay_headers(upstream.headers());
        let body = RelayBody::new(upstream.bytes_stream().boxed(), target);

        let mut response = Response::new(Body::from_stream(body));
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Permissive CORS headers shared by relay, preflight and error responses
pub fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Range"),
    );
}

/// Headers of the outgoing relay response, derived from the upstream ones
pub fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let content_type = upstream
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);

    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    insert_cors_headers(&mut headers);

    for &name in STREAM_METADATA_HEADERS {
        if let Some(value) = upstream.get(name) {
            headers.insert(HeaderName::from_static(name), value.clone());
        }
    }

    headers
}

/// Empty 200 answer to a CORS preflight
pub fn preflight_response() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    insert_cors_headers(response.headers_mut());
    response
}

/// Body of a relay response
///
/// Forwards upstream chunks as they come. Dropping it (client gone) drops
/// the upstream stream, which closes the upstream connection.
pub struct RelayBody {
    inner: BoxStream<'static, reqwest::Result<Bytes>>,
    target: StreamTarget,
    bytes_forwarded: u64,
    finished: bool,
}

impl RelayBody {
    pub fn new(inner: BoxStream<'static, reqwest::Result<Bytes>>, target: StreamTarget) -> Self {
        debug!(source = %target.source, code = %target.station_code, "Relay started");
        Self {
            inner,
            target,
            bytes_forwarded: 0,
            finished: false,
        }
    }

    pub fn bytes_forwarded(&self) -> u64 {
        self.bytes_forwarded
    }
}

impl Stream for RelayBody {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.bytes_forwarded += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.finished = true;
                warn!(
                    source = %self.target.source,
                    code = %self.target.station_code,
                    bytes = self.bytes_forwarded,
                    "Upstream stream error: {}", e
                );
                Poll::Ready(Some(Err(io::Error::other(e))))
            }
            Poll::Ready(None) => {
                self.finished = true;
                info!(
                    source = %self.target.source,
                    code = %self.target.station_code,
                    bytes = self.bytes_forwarded,
                    "Upstream stream ended"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayBody {
    fn drop(&mut self) {
        if !self.finished {
            info!(
                source = %self.target.source,
                code = %self.target.station_code,
                bytes = self.bytes_forwarded,
                "Client disconnected, closing upstream"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationSource;

    #[test]
    fn test_relay_headers_defaults() {
        let headers = relay_headers(&HeaderMap::new());
        assert_eq!(headers[CONTENT_TYPE], "audio/mpeg");
        assert_eq!(headers[CACHE_CONTROL], "no-cache, no-store, must-revalidate");
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "0");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Range");
        assert!(headers.get("icy-name").is_none());
    }

    #[test]
    fn test_relay_headers_mirror_upstream() {
        let mut upstream = HeaderMap::new();
        upstream.insert(CONTENT_TYPE, HeaderValue::from_static("audio/aacp"));
        upstream.insert("icy-br", HeaderValue::from_static("32"));
        upstream.insert("icy-name", HeaderValue::from_static("URSS Tower"));
        upstream.insert("x-other", HeaderValue::from_static("dropped"));

        let headers = relay_headers(&upstream);
        assert_eq!(headers[CONTENT_TYPE], "audio/aacp");
        assert_eq!(headers["icy-br"], "32");
        assert_eq!(headers["icy-name"], "URSS Tower");
        assert!(headers.get("icy-genre").is_none());
        assert!(headers.get("x-other").is_none());
    }

    #[test]
    fn test_preflight_response() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_relay_body_forwards_in_order() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from_static(&[1, 2])),
            Ok(Bytes::from_static(&[3])),
        ];
        let target = StreamTarget::new(StationSource::DirectStream, "urss").unwrap();
        let mut body = RelayBody::new(futures::stream::iter(chunks).boxed(), target);

        let mut received = Vec::new();
        while let Some(chunk) = body.next().await {
            received.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(received, vec![1, 2, 3]);
        assert_eq!(body.bytes_forwarded(), 3);
        assert!(body.finished);
    }
}
