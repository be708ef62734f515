//! Stop name resolution.
//!
//! A short stop name on its own is ambiguous ("Central" exists in many
//! cities), so each stop is tried under several query variants, most
//! specific first. The first variant whose top candidate falls inside the
//! configured region wins. Candidates are never compared against each
//! other or across variants.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::config::{Locality, RegionConfig};
use crate::domain::{Coordinate, RegionBounds};
use crate::pacing::Pacer;

use super::error::GeocodeError;
use super::types::GeocodeResponse;

/// One geocoding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    /// Free-text address to geocode.
    pub address: String,
    /// Region code biasing results towards a country (e.g. `in`).
    pub region_bias: String,
    /// Viewport bias in `swLat,swLng|neLat,neLng` form.
    pub bounds_bias: String,
}

impl GeocodeRequest {
    pub fn new(
        address: impl Into<String>,
        region_bias: impl Into<String>,
        bounds: &RegionBounds,
    ) -> Self {
        Self {
            address: address.into(),
            region_bias: region_bias.into(),
            bounds_bias: bounds.as_bias_param(),
        }
    }
}

/// Trait for geocoding providers.
///
/// This abstraction allows the resolver to be tested with mock data.
pub trait Geocoder {
    /// Issue one geocoding request and return the parsed response as-is.
    fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> impl Future<Output = Result<GeocodeResponse, GeocodeError>> + Send;
}

impl<G: Geocoder + Sync> Geocoder for &G {
    fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> impl Future<Output = Result<GeocodeResponse, GeocodeError>> + Send {
        (**self).geocode(request)
    }
}

/// Build the ordered list of queries to try for a stop.
///
/// With a route name, the route-qualified query comes first. The remaining
/// queries add progressively less locality context, ending with a
/// space-separated stop, city and state. Blank locality parts
/// are skipped and duplicate queries dropped, keeping the first occurrence.
///
/// # Examples
///
/// ```
/// use stop_locator::config::Locality;
/// use stop_locator::geocode::build_query_variants;
///
/// let variants = build_query_variants("Guindy", Some("21G"), &Locality::chennai());
/// assert_eq!(variants[0], "Guindy, 21G, Chennai");
/// assert_eq!(variants[1], "Guindy, Chennai, Tamil Nadu, India");
/// ```
pub fn build_query_variants(
    stop_name: &str,
    route_name: Option<&str>,
    locality: &Locality,
) -> Vec<String> {
    let stop = stop_name.trim();
    let city = locality.city.trim();
    let region_parts: Vec<&str> = [
        locality.city.as_str(),
        locality.state.as_str(),
        locality.country.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();

    let mut candidates = Vec::with_capacity(5);

    if let Some(route) = route_name.map(str::trim).filter(|r| !r.is_empty()) {
        candidates.push(join(&[stop, route, city], ", "));
    }

    let mut full = vec![stop];
    full.extend(&region_parts);
    candidates.push(join(&full, ", "));

    candidates.push(join(&[stop, city], ", "));

    if let Some(qualifier) = locality
        .transit_qualifier
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    {
        let qualified = format!("{stop} {qualifier}");
        candidates.push(join(&[qualified.as_str(), city], ", "));
    }

    // Space-separated, without the country
    candidates.push(join(&[stop, city, locality.state.trim()], " "));

    let mut variants: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// Join the non-empty `parts` with `sep`.
fn join(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// A stop name matched to an in-region coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct StopMatch {
    pub stop_name: String,
    pub route_name: Option<String>,
    pub coordinate: Coordinate,
    pub formatted_address: String,
    pub place_id: String,
    /// The query variant that produced this match.
    pub matched_query: String,
    /// Number of requests issued, including the successful one.
    pub attempts: usize,
}

/// Result of resolving one stop.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(StopMatch),
    /// Every variant was tried without an in-region match.
    Unresolved { attempts: usize },
}

/// Why a single query variant did not produce a match.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// The provider call failed or returned no usable candidate
    #[error(transparent)]
    Provider(#[from] GeocodeError),

    /// The top candidate lies outside the configured region
    #[error("result {coordinate} ({address}) is outside the region")]
    OutOfRegion {
        coordinate: Coordinate,
        address: String,
    },
}

/// Resolves stop names to in-region coordinates.
#[derive(Debug, Clone)]
pub struct StopResolver<G> {
    geocoder: G,
    region: RegionConfig,
    pacer: Pacer,
}

impl<G: Geocoder> StopResolver<G> {
    /// Create a resolver.
    ///
    /// `pacer` spaces out geocoding requests; share it with anything else
    /// calling the same provider.
    pub fn new(geocoder: G, region: RegionConfig, pacer: Pacer) -> Self {
        Self {
            geocoder,
            region,
            pacer,
        }
    }

    pub fn region(&self) -> &RegionConfig {
        &self.region
    }

    /// Try each query variant in order until one yields an in-region result.
    ///
    /// Provider errors and out-of-region results are logged and skipped;
    /// they never escape. A blank stop name is unresolved without any
    /// request being made.
    pub async fn resolve(&self, stop_name: &str, route_name: Option<&str>) -> ResolveOutcome {
        let stop_name = stop_name.trim();
        if stop_name.is_empty() {
            warn!("skipping blank stop name");
            return ResolveOutcome::Unresolved { attempts: 0 };
        }

        let variants = build_query_variants(stop_name, route_name, &self.region.locality);

        for (i, query) in variants.iter().enumerate() {
            self.pacer.wait().await;

            match self.try_variant(query).await {
                Ok((coordinate, formatted_address, place_id)) => {
                    info!(stop = stop_name, %coordinate, query = %query, "resolved stop");
                    return ResolveOutcome::Resolved(StopMatch {
                        stop_name: stop_name.to_string(),
                        route_name: route_name.map(str::to_string),
                        coordinate,
                        formatted_address,
                        place_id,
                        matched_query: query.clone(),
                        attempts: i + 1,
                    });
                }
                Err(Rejection::Provider(
                    e @ (GeocodeError::Http(_)
                    | GeocodeError::Json { .. }
                    | GeocodeError::Api { .. }
                    | GeocodeError::Unauthorized
                    | GeocodeError::RateLimited),
                )) => {
                    warn!(stop = stop_name, query = %query, error = %e, "geocoding request failed");
                }
                Err(rejection) => {
                    debug!(stop = stop_name, query = %query, reason = %rejection, "query variant rejected");
                }
            }
        }

        warn!(stop = stop_name, attempts = variants.len(), "failed to find coordinates");
        ResolveOutcome::Unresolved {
            attempts: variants.len(),
        }
    }

    async fn try_variant(&self, query: &str) -> Result<(Coordinate, String, String), Rejection> {
        let request = GeocodeRequest::new(query, &self.region.region_bias, &self.region.bounds);
        debug!(query, "geocoding");

        let candidate = self.geocoder.geocode(&request).await?.into_first_candidate()?;
        let coordinate = candidate.coordinate();

        if !self.region.bounds.contains(coordinate) {
            return Err(Rejection::OutOfRegion {
                coordinate,
                address: candidate.formatted_address,
            });
        }

        Ok((coordinate, candidate.formatted_address, candidate.place_id))
    }
}
