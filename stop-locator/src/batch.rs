//! Batch processing of every stop on every route.
//!
//! Stops are handled strictly one after another: the pacing exists to stay
//! under provider quotas, and parallel requests would defeat it. A failed
//! stop never stops the batch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::{FailedStop, ResolvedStop, Route, RouteSet, Stop};
use crate::geocode::{Geocoder, ResolveOutcome, StopResolver};
use crate::roads::{RoadSnapProvider, RoadSnapper};

/// Cooperative cancellation signal, checked between stops.
///
/// A request already in flight always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a batch run produced.
///
/// Every stop the runner reached lands in exactly one of `resolved` or
/// `failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub resolved: Vec<ResolvedStop>,
    pub failed: Vec<FailedStop>,
    /// Geocoding requests issued across all stops.
    pub geocode_requests: usize,
    /// The run was cancelled before reaching every stop.
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Number of stops the runner reached.
    pub fn stops_seen(&self) -> usize {
        self.resolved.len() + self.failed.len()
    }
}

/// Drives resolution and snapping over a whole route set.
pub struct BatchRunner<G, P> {
    resolver: StopResolver<G>,
    /// `None` disables snapping; resolved coordinates are kept as-is.
    snapper: Option<RoadSnapper<P>>,
    /// Pause after each stop, on top of the providers' own pacing.
    stop_delay: Duration,
}

impl<G, P> BatchRunner<G, P>
where
    G: Geocoder,
    P: RoadSnapProvider,
{
    /// Create a runner.
    ///
    /// `stop_delay` is slept after every stop and should be longer than
    /// the resolver's per-request pacing.
    pub fn new(
        resolver: StopResolver<G>,
        snapper: Option<RoadSnapper<P>>,
        stop_delay: Duration,
    ) -> Self {
        Self {
            resolver,
            snapper,
            stop_delay,
        }
    }

    /// Process every stop, routes in input order and stops in file order.
    pub async fn run(&self, routes: &RouteSet, cancel: &CancelFlag) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        info!(
            routes = routes.len(),
            stops = routes.total_stops(),
            region = %self.resolver.region().name,
            "starting batch"
        );

        for (route_index, route) in routes.routes.iter().enumerate() {
            info!(route = %route.name, stops = route.stops.len(), "processing route");

            for stop in &route.stops {
                if cancel.is_cancelled() {
                    warn!(
                        processed = outcome.stops_seen(),
                        "batch cancelled, keeping partial results"
                    );
                    outcome.cancelled = true;
                    return outcome;
                }

                self.process_stop(route_index, route, stop, &mut outcome).await;

                if !self.stop_delay.is_zero() {
                    tokio::time::sleep(self.stop_delay).await;
                }
            }
        }

        outcome
    }

    async fn process_stop(
        &self,
        route_index: usize,
        route: &Route,
        stop: &Stop,
        outcome: &mut BatchOutcome,
    ) {
        info!(route = %route.name, stop_id = %stop.id, stop = %stop.name, "processing stop");

        match self.resolver.resolve(&stop.name, route.context_name()).await {
            ResolveOutcome::Resolved(found) => {
                outcome.geocode_requests += found.attempts;

                let snapped = match &self.snapper {
                    Some(snapper) => snapper.snap(found.coordinate).await,
                    None => found.coordinate,
                };

                outcome.resolved.push(ResolvedStop {
                    stop_id: stop.id.clone(),
                    route_name: route.name.clone(),
                    stop_name: found.stop_name,
                    original: found.coordinate,
                    snapped,
                    formatted_address: found.formatted_address,
                    place_id: found.place_id,
                    matched_query: found.matched_query,
                    route_index,
                });
            }
            ResolveOutcome::Unresolved { attempts } => {
                outcome.geocode_requests += attempts;
                outcome.failed.push(FailedStop {
                    route_name: route.name.clone(),
                    stop_id: stop.id.clone(),
                    stop_name: stop.name.clone(),
                });
            }
        }
    }
}
