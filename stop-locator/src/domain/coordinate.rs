//! Coordinates and the rectangular region filter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as a `lat,lng` pair, the form both providers accept in
    /// query strings.
    pub fn as_query_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Error returned when a bounding box has its corners the wrong way round.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid region bounds: {reason}")]
pub struct InvalidBounds {
    reason: &'static str,
}

/// Serialized shape of [`RegionBounds`], validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BoundsRepr {
    southwest: Coordinate,
    northeast: Coordinate,
}

/// An axis-aligned latitude/longitude window.
///
/// The south-west corner is never north or east of the north-east corner,
/// so a `RegionBounds` always describes a non-empty closed rectangle.
/// Windows crossing the antimeridian are not supported.
///
/// # Examples
///
/// ```
/// use stop_locator::domain::{Coordinate, RegionBounds};
///
/// let bounds = RegionBounds::new(Coordinate::new(12.7, 79.8), Coordinate::new(13.3, 80.5)).unwrap();
/// assert!(bounds.contains(Coordinate::new(13.08, 80.27)));
///
/// // Corners are inclusive
/// assert!(bounds.contains(Coordinate::new(12.7, 80.5)));
///
/// // Swapped corners are rejected
/// assert!(RegionBounds::new(Coordinate::new(13.3, 80.5), Coordinate::new(12.7, 79.8)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundsRepr", into = "BoundsRepr")]
pub struct RegionBounds {
    southwest: Coordinate,
    northeast: Coordinate,
}

impl RegionBounds {
    /// Build a window from its south-west and north-east corners.
    pub fn new(southwest: Coordinate, northeast: Coordinate) -> Result<Self, InvalidBounds> {
        if !(southwest.lat.is_finite()
            && southwest.lng.is_finite()
            && northeast.lat.is_finite()
            && northeast.lng.is_finite())
        {
            return Err(InvalidBounds {
                reason: "corners must be finite numbers",
            });
        }

        if southwest.lat > northeast.lat {
            return Err(InvalidBounds {
                reason: "south-west latitude is north of north-east latitude",
            });
        }

        if southwest.lng > northeast.lng {
            return Err(InvalidBounds {
                reason: "south-west longitude is east of north-east longitude",
            });
        }

        Ok(Self {
            southwest,
            northeast,
        })
    }

    /// Greater Chennai, the region the stop data was collected for.
    pub const fn chennai() -> Self {
        Self {
            southwest: Coordinate::new(12.7, 79.8),
            northeast: Coordinate::new(13.3, 80.5),
        }
    }

    pub fn southwest(&self) -> Coordinate {
        self.southwest
    }

    pub fn northeast(&self) -> Coordinate {
        self.northeast
    }

    /// Whether `coordinate` lies inside the window, edges included.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        is_within_region(coordinate.lat, coordinate.lng, self)
    }

    /// Format as the `swLat,swLng|neLat,neLng` viewport bias string used
    /// by the geocoding provider.
    pub fn as_bias_param(&self) -> String {
        format!(
            "{}|{}",
            self.southwest.as_query_param(),
            self.northeast.as_query_param()
        )
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::chennai()
    }
}

impl TryFrom<BoundsRepr> for RegionBounds {
    type Error = InvalidBounds;

    fn try_from(repr: BoundsRepr) -> Result<Self, Self::Error> {
        Self::new(repr.southwest, repr.northeast)
    }
}

impl From<RegionBounds> for BoundsRepr {
    fn from(bounds: RegionBounds) -> Self {
        Self {
            southwest: bounds.southwest,
            northeast: bounds.northeast,
        }
    }
}

/// Closed-interval check of `lat`/`lng` against `bounds` on both axes.
///
/// NaN never lies within any region.
pub fn is_within_region(lat: f64, lng: f64, bounds: &RegionBounds) -> bool {
    bounds.southwest.lat <= lat
        && lat <= bounds.northeast.lat
        && bounds.southwest.lng <= lng
        && lng <= bounds.northeast.lng
}
