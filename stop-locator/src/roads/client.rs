//! Roads API HTTP client.

use super::error::RoadsError;
use super::snapper::RoadSnapProvider;
use super::types::{RoadsErrorPayload, SnapResponse};
use crate::domain::Coordinate;

/// Default base URL for the Roads API.
const DEFAULT_BASE_URL: &str = "https://roads.googleapis.com";

/// Configuration for the Roads API client.
#[derive(Debug, Clone)]
pub struct RoadsConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoadsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Roads `snapToRoads` endpoint.
#[derive(Debug, Clone)]
pub struct RoadsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RoadsClient {
    /// Create a new Roads API client.
    pub fn new(config: RoadsConfig) -> Result<Self, RoadsError> {
        if config.api_key.trim().is_empty() {
            return Err(RoadsError::InvalidKey("API key is empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }
}

impl RoadSnapProvider for RoadsClient {
    async fn snap_to_roads(&self, point: Coordinate) -> Result<SnapResponse, RoadsError> {
        let url = format!("{}/v1/snapToRoads", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("path", point.as_query_param()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RoadsError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoadsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the structured message when the body has one
            let message = serde_json::from_str::<RoadsErrorPayload>(&body)
                .map(|p| p.error.message)
                .unwrap_or(body);
            return Err(RoadsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| RoadsError::Json {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> RoadsClient {
        RoadsClient::new(RoadsConfig::new("test-key").with_base_url(server.base_url())).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = RoadsConfig::new("test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn config_builder() {
        let config = RoadsConfig::new("test-key")
            .with_base_url("http://localhost:9090/")
            .with_timeout(5);
        assert_eq!(config.timeout_secs, 5);

        let client = RoadsClient::new(config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9090");
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(
            RoadsClient::new(RoadsConfig::new("")),
            Err(RoadsError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn sends_point_as_path() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/snapToRoads")
                    .query_param("path", "13.0827,80.2707")
                    .query_param("key", "test-key");
                then.status(200).json_body(serde_json::json!({
                    "snappedPoints": [{
                        "location": { "latitude": 13.0829, "longitude": 80.2709 },
                        "originalIndex": 0,
                        "placeId": "road"
                    }]
                }));
            })
            .await;

        let resp = client(&server)
            .snap_to_roads(Coordinate::new(13.0827, 80.2707))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(resp.first_coordinate(), Some(Coordinate::new(13.0829, 80.2709)));
    }

    #[tokio::test]
    async fn structured_error_message_extracted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/snapToRoads");
                then.status(400).json_body(serde_json::json!({
                    "error": { "code": 400, "message": "Invalid path", "status": "INVALID_ARGUMENT" }
                }));
            })
            .await;

        let err = client(&server)
            .snap_to_roads(Coordinate::new(0.0, 0.0))
            .await
            .unwrap_err();
        match err {
            RoadsError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid path");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn forbidden_maps_to_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/snapToRoads");
                then.status(403);
            })
            .await;

        let err = client(&server)
            .snap_to_roads(Coordinate::new(13.0, 80.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RoadsError::Unauthorized));
    }
}
