//! Domain types for the stop locator.
//!
//! Coordinates, region bounds, stop identifiers and the records the
//! pipeline produces. Types with invariants enforce them at construction,
//! so code that receives them can trust their validity.

mod coordinate;
mod route;
mod stop;

pub use coordinate::{Coordinate, InvalidBounds, RegionBounds, is_within_region};
pub use route::{Route, RouteName, RouteSet, Stop};
pub use stop::{FailedStop, InvalidStopId, ResolvedStop, StopId};
