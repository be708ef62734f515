//! Run summaries.
//!
//! Everything here is recomputed from the resolved and failed collections
//! on demand; no state is carried between calls.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Coordinate, FailedStop, ResolvedStop};

/// Per-route statistics over resolved stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route_name: String,
    pub total_stops: usize,
    /// Resolved stop names in processing order.
    pub stop_names: Vec<String>,
    /// Arithmetic mean of the snapped latitudes.
    pub average_latitude: f64,
    /// Arithmetic mean of the snapped longitudes.
    pub average_longitude: f64,
}

impl RouteSummary {
    pub fn centroid(&self) -> Coordinate {
        Coordinate::new(self.average_latitude, self.average_longitude)
    }
}

/// Whole-run statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Routes with at least one resolved stop.
    pub total_routes: usize,
    pub total_resolved: usize,
    pub total_failed: usize,
    pub per_route: BTreeMap<String, RouteSummary>,
}

impl RunSummary {
    pub fn total_stops_seen(&self) -> usize {
        self.total_resolved + self.total_failed
    }

    /// Fraction of stops resolved, in `0.0..=1.0`. An empty run is `0.0`.
    pub fn success_rate(&self) -> f64 {
        match self.total_stops_seen() {
            0 => 0.0,
            seen => self.total_resolved as f64 / seen as f64,
        }
    }
}

/// Summarise a run.
pub fn summarize(resolved: &[ResolvedStop], failed: &[FailedStop]) -> RunSummary {
    let mut groups: BTreeMap<&str, Vec<&ResolvedStop>> = BTreeMap::new();
    for stop in resolved {
        groups.entry(stop.route_name.as_str()).or_default().push(stop);
    }

    let per_route = groups
        .into_iter()
        .map(|(name, stops)| {
            let n = stops.len() as f64;
            let lat_sum: f64 = stops.iter().map(|s| s.snapped.lat).sum();
            let lng_sum: f64 = stops.iter().map(|s| s.snapped.lng).sum();

            let summary = RouteSummary {
                route_name: name.to_string(),
                total_stops: stops.len(),
                stop_names: stops.iter().map(|s| s.stop_name.clone()).collect(),
                average_latitude: lat_sum / n,
                average_longitude: lng_sum / n,
            };
            (name.to_string(), summary)
        })
        .collect::<BTreeMap<_, _>>();

    RunSummary {
        total_routes: per_route.len(),
        total_resolved: resolved.len(),
        total_failed: failed.len(),
        per_route,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::StopId;
    use proptest::prelude::*;

    fn stop_strategy() -> impl Strategy<Value = (u8, f64, f64)> {
        (0u8..4, 12.7f64..=13.3, 79.8f64..=80.5)
    }

    proptest! {
        /// Resolved plus failed always equals stops seen, and route averages
        /// are the mean of that route's snapped points
        #[test]
        fn totals_and_means(points in proptest::collection::vec(stop_strategy(), 0..40), failures in 0usize..20) {
            let resolved: Vec<ResolvedStop> = points
                .iter()
                .enumerate()
                .map(|(i, (route, lat, lng))| ResolvedStop {
                    stop_id: StopId::parse(&i.to_string()).unwrap(),
                    route_name: format!("R{route}"),
                    stop_name: format!("S{i}"),
                    original: Coordinate::new(*lat, *lng),
                    snapped: Coordinate::new(*lat, *lng),
                    formatted_address: String::new(),
                    place_id: String::new(),
                    matched_query: String::new(),
                    route_index: *route as usize,
                })
                .collect();
            let failed: Vec<FailedStop> = (0..failures)
                .map(|i| FailedStop {
                    route_name: "F".into(),
                    stop_id: StopId::parse(&i.to_string()).unwrap(),
                    stop_name: format!("F{i}"),
                })
                .collect();

            let summary = summarize(&resolved, &failed);

            prop_assert_eq!(summary.total_stops_seen(), points.len() + failures);
            prop_assert_eq!(
                summary.per_route.values().map(|r| r.total_stops).sum::<usize>(),
                points.len()
            );

            for (name, route) in &summary.per_route {
                let mine: Vec<_> = resolved.iter().filter(|r| &r.route_name == name).collect();
                let mean_lat = mine.iter().map(|r| r.snapped.lat).sum::<f64>() / mine.len() as f64;
                let mean_lng = mine.iter().map(|r| r.snapped.lng).sum::<f64>() / mine.len() as f64;
                prop_assert!((route.average_latitude - mean_lat).abs() < 1e-9);
                prop_assert!((route.average_longitude - mean_lng).abs() < 1e-9);
            }

            let rate = summary.success_rate();
            prop_assert!((0.0..=1.0).contains(&rate));
        }
    }
}
