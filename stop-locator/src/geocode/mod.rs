//! Geocoding: stop names to coordinates.
//!
//! This module provides an HTTP client for the Google Geocoding API and the
//! resolver that drives it.
//!
//! Key characteristics of the provider:
//! - Most failures arrive as HTTP 200 with a non-`OK` `status` in the body
//! - Results are only *biased* towards the requested region and viewport,
//!   never restricted, so out-of-region answers must be filtered locally

mod client;
mod error;
mod resolver;
mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use error::GeocodeError;
pub use resolver::{
    GeocodeRequest, Geocoder, Rejection, ResolveOutcome, StopMatch, StopResolver,
    build_query_variants,
};
pub use types::{GeocodeCandidate, GeocodeResponse, GeocodeStatus, Geometry, LatLng};
