//! Transit stop geocoding pipeline.
//!
//! Turns route files of named stops into coordinates: each stop name is
//! geocoded with a series of fallback queries, checked against a region
//! bounding box, snapped to the nearest road, and written out as CSV.

pub mod batch;
pub mod config;
pub mod domain;
pub mod geocode;
pub mod output;
pub mod pacing;
pub mod report;
pub mod roads;
pub mod routes;
