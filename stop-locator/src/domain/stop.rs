//! Stop identifiers and per-stop pipeline results.

use std::fmt;

use serde::Serialize;

use super::Coordinate;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Identifier of a stop within its route, as keyed in the route file.
///
/// Stop ids are opaque non-blank strings; surrounding whitespace is removed.
///
/// # Examples
///
/// ```
/// use stop_locator::domain::StopId;
///
/// let id = StopId::parse(" 12 ").unwrap();
/// assert_eq!(id.as_str(), "12");
///
/// assert!(StopId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be blank",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop whose name was geocoded inside the configured region.
///
/// `original` always satisfies the region filter that was in force when the
/// record was created. `snapped` is the road-aligned refinement, or a copy of
/// `original` when snapping was skipped or failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedStop {
    pub stop_id: StopId,
    pub route_name: String,
    pub stop_name: String,
    pub original: Coordinate,
    pub snapped: Coordinate,
    pub formatted_address: String,
    pub place_id: String,
    /// The query variant that produced the accepted geocoding result.
    pub matched_query: String,
    /// Position of the route in the input file.
    pub route_index: usize,
}

/// A stop for which every query variant was exhausted without an in-region
/// match. Kept for manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStop {
    pub route_name: String,
    pub stop_id: StopId,
    pub stop_name: String,
}
