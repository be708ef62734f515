//! Road snapping: nudging geocoded points onto the road network.
//!
//! Geocoded stop positions often land on building centroids or in the
//! middle of a junction. The Roads API moves them to the nearest road.

mod client;
mod error;
mod snapper;
mod types;

pub use client::{RoadsClient, RoadsConfig};
pub use error::RoadsError;
pub use snapper::{RoadSnapProvider, RoadSnapper};
pub use types::{LatitudeLongitude, RoadsErrorDetail, RoadsErrorPayload, SnapResponse, SnappedPoint};
