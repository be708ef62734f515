//! Region and pipeline configuration.
//!
//! The region decides which geocoding answers are plausible; the pipeline
//! settings decide how hard the providers are pushed.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::RegionBounds;

/// Default delay between geocoding requests.
const DEFAULT_VARIANT_DELAY: Duration = Duration::from_millis(100);

/// Default delay between stops.
const DEFAULT_STOP_DELAY: Duration = Duration::from_millis(200);

/// Errors from loading a region file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read region file {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid region file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Place names appended to stop names to disambiguate geocoding queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    /// Word(s) describing a stop, e.g. "bus stop". Omitted when `None`.
    pub transit_qualifier: Option<String>,
}

impl Locality {
    pub fn chennai() -> Self {
        Self {
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            country: "India".to_string(),
            transit_qualifier: Some("bus stop".to_string()),
        }
    }
}

impl Default for Locality {
    fn default() -> Self {
        Self::chennai()
    }
}

/// The area stops are expected to lie in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Display name for logs and reports.
    pub name: String,

    /// Results outside these bounds are rejected.
    pub bounds: RegionBounds,

    /// ccTLD-style region code passed to the geocoder as a bias.
    pub region_bias: String,

    pub locality: Locality,
}

impl RegionConfig {
    /// Load a region definition from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: "Chennai".to_string(),
            bounds: RegionBounds::chennai(),
            region_bias: "in".to_string(),
            locality: Locality::chennai(),
        }
    }
}

/// Pacing and feature toggles for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Minimum gap between requests to the same provider.
    pub variant_delay: Duration,

    /// Pause after each stop.
    /// Never shorter than `variant_delay`, see [`Self::stop_delay`].
    stop_delay: Duration,

    /// Whether resolved coordinates are snapped to the road network.
    pub snap_enabled: bool,
}

impl PipelineConfig {
    pub fn new(variant_delay: Duration, stop_delay: Duration, snap_enabled: bool) -> Self {
        Self {
            variant_delay,
            stop_delay,
            snap_enabled,
        }
    }

    /// Set the delay between provider requests.
    pub fn with_variant_delay(mut self, delay: Duration) -> Self {
        self.variant_delay = delay;
        self
    }

    /// Set the delay between stops.
    pub fn with_stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = delay;
        self
    }

    /// Enable or disable road snapping.
    pub fn with_snapping(mut self, enabled: bool) -> Self {
        self.snap_enabled = enabled;
        self
    }

    /// The effective delay between stops, at least the per-request delay.
    pub fn stop_delay(&self) -> Duration {
        self.stop_delay.max(self.variant_delay)
    }

    /// No pacing at all. For tests and replayed data.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, true)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            variant_delay: DEFAULT_VARIANT_DELAY,
            stop_delay: DEFAULT_STOP_DELAY,
            snap_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use tempfile::tempdir;

    const BENGALURU: &str = r#"
name = "Bengaluru"
region_bias = "in"

[bounds.southwest]
lat = 12.8
lng = 77.4

[bounds.northeast]
lat = 13.2
lng = 77.8

[locality]
city = "Bengaluru"
state = "Karnataka"
country = "India"
transit_qualifier = "bus stand"
"#;

    #[test]
    fn default_region_is_chennai() {
        let region = RegionConfig::default();
        assert_eq!(region.name, "Chennai");
        assert_eq!(region.region_bias, "in");
        assert_eq!(region.bounds, RegionBounds::chennai());
        assert_eq!(region.locality.transit_qualifier.as_deref(), Some("bus stop"));
    }

    #[test]
    fn parse_region_toml() {
        let region = RegionConfig::from_toml(BENGALURU).unwrap();
        assert_eq!(region.name, "Bengaluru");
        assert_eq!(region.bounds.southwest(), Coordinate::new(12.8, 77.4));
        assert_eq!(region.bounds.northeast(), Coordinate::new(13.2, 77.8));
        assert_eq!(region.locality.state, "Karnataka");
        assert_eq!(region.locality.transit_qualifier.as_deref(), Some("bus stand"));
    }

    #[test]
    fn optional_locality_parts() {
        let region = RegionConfig::from_toml(
            r#"
name = "Somewhere"
region_bias = "uk"
bounds = { southwest = { lat = 51.0, lng = -1.0 }, northeast = { lat = 52.0, lng = 0.5 } }
locality = { city = "Oxford" }
"#,
        )
        .unwrap();
        assert_eq!(region.locality.state, "");
        assert_eq!(region.locality.transit_qualifier, None);
    }

    #[test]
    fn swapped_bounds_rejected() {
        let swapped = BENGALURU.replace("lat = 12.8", "lat = 13.5");
        assert!(matches!(
            RegionConfig::from_toml(&swapped),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.toml");
        std::fs::write(&path, BENGALURU).unwrap();
        assert_eq!(RegionConfig::load(&path).unwrap().name, "Bengaluru");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RegionConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn default_pipeline() {
        let config = PipelineConfig::default();
        assert_eq!(config.variant_delay, Duration::from_millis(100));
        assert_eq!(config.stop_delay(), Duration::from_millis(200));
        assert!(config.snap_enabled);
    }

    #[test]
    fn stop_delay_never_below_variant_delay() {
        let config = PipelineConfig::default()
            .with_variant_delay(Duration::from_millis(500))
            .with_stop_delay(Duration::from_millis(50));
        assert_eq!(config.stop_delay(), Duration::from_millis(500));
    }

    #[test]
    fn builder_toggles_snapping() {
        let config = PipelineConfig::unpaced().with_snapping(false);
        assert!(!config.snap_enabled);
        assert_eq!(config.stop_delay(), Duration::ZERO);
    }
}
