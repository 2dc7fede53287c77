//! HTTP client for the track backend.
//!
//! One GET per call against a fixed base URL.  No retries and no timeouts:
//! a failure is terminal for that call and the caller decides how to degrade.

use std::future::Future;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::track::{StreamDescriptor, Track, TrackId};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid backend url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{url} returned status {status}")]
    RequestFailed { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Anything that can answer the four backend questions.  Implemented by
/// [`TrackGateway`]; tests substitute an in-memory source.
pub trait TrackSource: Send + Sync + 'static {
    fn list_tracks(&self) -> impl Future<Output = GatewayResult<Vec<Track>>> + Send;
    fn random_track(&self) -> impl Future<Output = GatewayResult<Track>> + Send;
    fn search_tracks(&self, query: &str) -> impl Future<Output = GatewayResult<Vec<Track>>> + Send;
    fn resolve_stream(&self, id: &TrackId)
        -> impl Future<Output = GatewayResult<StreamDescriptor>> + Send;
}

#[derive(Debug, Clone)]
pub struct TrackGateway {
    client: reqwest::Client,
    base_url: String,
}

impl TrackGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` joined with `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let invalid = |reason: String| GatewayError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> GatewayResult<T> {
        let url = self.endpoint(segments)?;
        debug!("gateway: GET {} {:?}", url, query);

        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let url = url.to_string();
        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GatewayError::Decode { url, source })
    }
}

impl TrackSource for TrackGateway {
    async fn list_tracks(&self) -> GatewayResult<Vec<Track>> {
        self.get_json(&["tracks"], &[]).await
    }

    async fn random_track(&self) -> GatewayResult<Track> {
        self.get_json(&["random-track"], &[]).await
    }

    async fn search_tracks(&self, query: &str) -> GatewayResult<Vec<Track>> {
        self.get_json(&["search"], &[("q", query)]).await
    }

    async fn resolve_stream(&self, id: &TrackId) -> GatewayResult<StreamDescriptor> {
        let id = id.to_string();
        self.get_json(&["stream", &id], &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(
            TrackGateway::new("http://127.0.0.1:8000/").base_url(),
            "http://127.0.0.1:8000"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let gw = TrackGateway::new("http://127.0.0.1:8000");
        let url = gw.endpoint(&["stream", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/stream/a%20b%2Fc");

        let gw = TrackGateway::new("http://example.com/api/");
        let url = gw.endpoint(&["tracks"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/tracks");
    }

    #[test]
    fn test_invalid_base_url() {
        let gw = TrackGateway::new("not a url");
        assert!(matches!(
            gw.endpoint(&["tracks"]),
            Err(GatewayError::InvalidUrl { .. })
        ));
    }
}
