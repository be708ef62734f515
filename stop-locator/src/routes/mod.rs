//! Route definition input.
//!
//! Loads the JSON file listing each route and its stops. This is the only
//! input whose failure aborts a run.

mod error;
mod file;

pub use error::RouteFileError;
pub use file::{load_routes, parse_routes};
