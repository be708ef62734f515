//! Geocoding client error types.

use super::types::GeocodeStatus;

/// Errors from a single geocoding request.
///
/// None of these abort a run: the resolver logs them and moves on to the
/// next query variant.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized: check GOOGLE_MAPS_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by geocoding API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The response body reported a non-OK status
    #[error("geocoding status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: GeocodeStatus,
        message: Option<String>,
    },

    /// OK status but no candidates
    #[error("no geocoding results")]
    NoResults,

    /// The API key cannot be sent
    #[error("invalid API key: {0}")]
    InvalidKey(&'static str),
}
