//! Best-effort road snapping.

use std::future::Future;

use tracing::{debug, warn};

use crate::domain::Coordinate;
use crate::pacing::Pacer;

use super::error::RoadsError;
use super::types::SnapResponse;

/// Trait for road-snapping providers.
pub trait RoadSnapProvider {
    /// Snap a single-point path and return the parsed response as-is.
    fn snap_to_roads(
        &self,
        point: Coordinate,
    ) -> impl Future<Output = Result<SnapResponse, RoadsError>> + Send;
}

impl<P: RoadSnapProvider + Sync> RoadSnapProvider for &P {
    fn snap_to_roads(
        &self,
        point: Coordinate,
    ) -> impl Future<Output = Result<SnapResponse, RoadsError>> + Send {
        (**self).snap_to_roads(point)
    }
}

/// Moves coordinates onto the nearest road.
///
/// Snapping is a refinement, never a requirement: any failure yields the
/// input unchanged. There are no retries and no region check, since the
/// provider only ever answers with a point near the input or nothing.
#[derive(Debug, Clone)]
pub struct RoadSnapper<P> {
    provider: P,
    pacer: Pacer,
}

impl<P: RoadSnapProvider> RoadSnapper<P> {
    pub fn new(provider: P, pacer: Pacer) -> Self {
        Self { provider, pacer }
    }

    /// Snap `point`, or return it unchanged if the provider errors or has
    /// no snapped point.
    pub async fn snap(&self, point: Coordinate) -> Coordinate {
        self.pacer.wait().await;

        match self.provider.snap_to_roads(point).await {
            Ok(response) => match response.first_coordinate() {
                Some(snapped) => {
                    debug!(from = %point, to = %snapped, "snapped to road");
                    snapped
                }
                None => {
                    debug!(%point, warning = ?response.warning_message, "no road near point, keeping original");
                    point
                }
            },
            Err(e) => {
                warn!(%point, error = %e, "road snapping failed, keeping original");
                point
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    enum Script {
        Point(Coordinate),
        Empty,
        Fail,
    }

    struct MockRoads {
        script: Script,
        calls: Mutex<usize>,
    }

    impl MockRoads {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: Mutex::new(0),
            }
        }
    }

    impl RoadSnapProvider for MockRoads {
        async fn snap_to_roads(&self, _point: Coordinate) -> Result<SnapResponse, RoadsError> {
            *self.calls.lock().unwrap() += 1;
            match &self.script {
                Script::Point(c) => Ok(serde_json::from_value(serde_json::json!({
                    "snappedPoints": [{ "location": { "latitude": c.lat, "longitude": c.lng } }]
                }))
                .unwrap()),
                Script::Empty => Ok(serde_json::from_value(serde_json::json!({})).unwrap()),
                Script::Fail => Err(RoadsError::Json {
                    message: "expected value".into(),
                }),
            }
        }
    }

    const INPUT: Coordinate = Coordinate::new(13.0827, 80.2707);

    #[tokio::test]
    async fn returns_first_snapped_point() {
        let target = Coordinate::new(13.0829, 80.2709);
        let roads = MockRoads::new(Script::Point(target));
        let snapper = RoadSnapper::new(&roads, Pacer::unpaced());

        assert_eq!(snapper.snap(INPUT).await, target);
    }

    #[tokio::test]
    async fn empty_response_keeps_input() {
        let roads = MockRoads::new(Script::Empty);
        let snapper = RoadSnapper::new(&roads, Pacer::unpaced());

        assert_eq!(snapper.snap(INPUT).await, INPUT);
    }

    #[tokio::test]
    async fn error_keeps_input_without_retry() {
        let roads = MockRoads::new(Script::Fail);
        let snapper = RoadSnapper::new(&roads, Pacer::unpaced());

        assert_eq!(snapper.snap(INPUT).await, INPUT);
        assert_eq!(*roads.calls.lock().unwrap(), 1);
    }
}
