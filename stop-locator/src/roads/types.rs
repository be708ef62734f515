//! Roads API response DTOs.

use serde::Deserialize;

use crate::domain::Coordinate;

/// Response from `snapToRoads`.
///
/// The provider omits `snappedPoints` entirely when nothing was near a
/// road, so a missing list is treated as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResponse {
    #[serde(default)]
    pub snapped_points: Vec<SnappedPoint>,

    /// Present when the path was too sparse to interpolate reliably.
    pub warning_message: Option<String>,
}

impl SnapResponse {
    /// The first snapped point, if any.
    pub fn first_coordinate(&self) -> Option<Coordinate> {
        self.snapped_points.first().map(SnappedPoint::coordinate)
    }
}

/// A single point aligned to the road network.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnappedPoint {
    pub location: LatitudeLongitude,
}

impl SnappedPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.location.latitude, self.location.longitude)
    }
}

/// The Roads API spells out its field names, unlike the geocoder.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatitudeLongitude {
    pub latitude: f64,
    pub longitude: f64,
}

/// Error payload returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadsErrorPayload {
    pub error: RoadsErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoadsErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_snapped_points() {
        let resp: SnapResponse = serde_json::from_str(
            r#"{
                "snappedPoints": [
                    {
                        "location": { "latitude": 13.0829, "longitude": 80.2752 },
                        "originalIndex": 0,
                        "placeId": "ChIJroad"
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(resp.snapped_points.len(), 1);
        assert_eq!(resp.first_coordinate(), Some(Coordinate::new(13.0829, 80.2752)));
    }

    #[test]
    fn missing_points_is_empty() {
        let resp: SnapResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.snapped_points.is_empty());
        assert_eq!(resp.first_coordinate(), None);
    }

    #[test]
    fn parse_error_payload() {
        let payload: RoadsErrorPayload = serde_json::from_str(
            r#"{"error": {"code": 400, "message": "Invalid path", "status": "INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(payload.error.message, "Invalid path");
    }
}
