//! Roads client error types.

/// Errors from a single snap-to-road request.
///
/// The snapper never surfaces these; it falls back to the unsnapped
/// coordinate.
#[derive(Debug, thiserror::Error)]
pub enum RoadsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized: check GOOGLE_MAPS_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by roads API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The API key cannot be sent
    #[error("invalid API key: {0}")]
    InvalidKey(&'static str),
}
