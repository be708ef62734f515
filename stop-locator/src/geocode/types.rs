//! Geocoding API response DTOs.
//!
//! These types map directly to the provider's JSON responses. Fields the
//! pipeline never reads (address components, viewport, location type) are
//! not modelled.

use std::fmt;

use serde::Deserialize;

use crate::domain::Coordinate;

use super::error::GeocodeError;

/// Top-level status reported in every geocoding response body.
///
/// The provider answers HTTP 200 for most failures and reports the real
/// outcome here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum GeocodeStatus {
    Ok,
    ZeroResults,
    OverDailyLimit,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    /// A status this client does not know about, kept verbatim.
    Other(String),
}

impl GeocodeStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, GeocodeStatus::Ok)
    }

    pub fn as_str(&self) -> &str {
        match self {
            GeocodeStatus::Ok => "OK",
            GeocodeStatus::ZeroResults => "ZERO_RESULTS",
            GeocodeStatus::OverDailyLimit => "OVER_DAILY_LIMIT",
            GeocodeStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            GeocodeStatus::RequestDenied => "REQUEST_DENIED",
            GeocodeStatus::InvalidRequest => "INVALID_REQUEST",
            GeocodeStatus::UnknownError => "UNKNOWN_ERROR",
            GeocodeStatus::Other(s) => s,
        }
    }
}

impl From<String> for GeocodeStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => GeocodeStatus::Ok,
            "ZERO_RESULTS" => GeocodeStatus::ZeroResults,
            "OVER_DAILY_LIMIT" => GeocodeStatus::OverDailyLimit,
            "OVER_QUERY_LIMIT" => GeocodeStatus::OverQueryLimit,
            "REQUEST_DENIED" => GeocodeStatus::RequestDenied,
            "INVALID_REQUEST" => GeocodeStatus::InvalidRequest,
            "UNKNOWN_ERROR" => GeocodeStatus::UnknownError,
            _ => GeocodeStatus::Other(s),
        }
    }
}

impl fmt::Display for GeocodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response from the geocode endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: GeocodeStatus,

    /// Candidates, best first according to the provider.
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,

    /// Human-readable detail, present on some error statuses.
    pub error_message: Option<String>,
}

impl GeocodeResponse {
    /// Take the provider's top candidate.
    ///
    /// Fails if the status is not `OK` or the candidate list is empty.
    /// Later candidates are never consulted.
    pub fn into_first_candidate(self) -> Result<GeocodeCandidate, GeocodeError> {
        if !self.status.is_ok() {
            return Err(GeocodeError::Status {
                status: self.status,
                message: self.error_message,
            });
        }

        self.results.into_iter().next().ok_or(GeocodeError::NoResults)
    }
}

/// One geocoding candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    pub geometry: Geometry,

    #[serde(default)]
    pub formatted_address: String,

    /// Stable provider identifier for the place. Occasionally absent.
    #[serde(default)]
    pub place_id: String,
}

impl GeocodeCandidate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.geometry.location.lat, self.geometry.location.lng)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
