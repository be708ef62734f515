//! Route definition file parsing.
//!
//! The file looks like:
//!
//! ```json
//! { "routes": [ { "routename": "21G", "stops": { "1": "Broadway", "2": "Central" } } ] }
//! ```
//!
//! Stops are kept in the order they appear in the JSON object.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::domain::{Route, RouteSet, Stop, StopId};

use super::error::RouteFileError;

#[derive(Debug, Deserialize)]
struct RouteFileDto {
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    /// `None` when the key is absent, `Some(None)` when it is null.
    #[serde(default, deserialize_with = "present", alias = "routeName", alias = "route_name")]
    routename: Option<Option<String>>,
    #[serde(default)]
    stops: OrderedStops,
}

/// Stop id → name entries in document order.
#[derive(Debug, Default)]
struct OrderedStops(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedStops {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StopsVisitor;

        impl<'de> Visitor<'de> for StopsVisitor {
            type Value = OrderedStops;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of stop id to stop name")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut stops = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    stops.push(entry);
                }
                Ok(OrderedStops(stops))
            }
        }

        deserializer.deserialize_map(StopsVisitor)
    }
}

/// Wraps a field that is present in the document, null or not.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Read and parse a route definition file.
pub fn load_routes(path: impl AsRef<Path>) -> Result<RouteSet, RouteFileError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| RouteFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_routes(&json)
}

/// Parse route definition JSON.
pub fn parse_routes(json: &str) -> Result<RouteSet, RouteFileError> {
    let dto: RouteFileDto = serde_json::from_str(json)?;

    let routes = dto
        .routes
        .into_iter()
        .enumerate()
        .map(|(index, route)| convert_route(index, route))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteSet::new(routes))
}

fn convert_route(index: usize, dto: RouteDto) -> Result<Route, RouteFileError> {
    let key_present = dto.routename.is_some();
    let name = dto
        .routename
        .flatten()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let label = name.clone().unwrap_or_else(|| format!("Route_{index}"));

    let mut seen = HashSet::new();
    let mut stops = Vec::with_capacity(dto.stops.0.len());
    for (raw_id, stop_name) in dto.stops.0 {
        let id = StopId::parse(&raw_id).map_err(|source| RouteFileError::InvalidStopId {
            route: label.clone(),
            source,
        })?;

        if !seen.insert(id.clone()) {
            return Err(RouteFileError::DuplicateStop {
                route: label,
                stop_id: id.to_string(),
            });
        }

        stops.push(Stop::new(id, stop_name.trim()));
    }

    Ok(match name {
        Some(name) => Route::new(name, stops),
        None if key_present => Route::blank(index, stops),
        None => Route::unnamed(index, stops),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteName;
    use tempfile::tempdir;

    #[test]
    fn parse_single_route() {
        let set = parse_routes(
            r#"{"routes": [{"routename": "R1", "stops": {"1": "Central Station", "2": "Unknown Place"}}]}"#,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        let route = &set.routes[0];
        assert_eq!(route.name, "R1");
        assert_eq!(route.name_source, RouteName::Given);
        assert_eq!(route.stops.len(), 2);
        assert_eq!(route.stops[0].id.as_str(), "1");
        assert_eq!(route.stops[0].name, "Central Station");
        assert_eq!(route.stops[1].name, "Unknown Place");
    }

    #[test]
    fn stops_keep_document_order() {
        let set = parse_routes(
            r#"{"routes": [{"routename": "R", "stops": {"10": "c", "2": "a", "1": "b"}}]}"#,
        )
        .unwrap();

        let ids: Vec<_> = set.routes[0].stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "2", "1"]);
    }

    #[test]
    fn missing_name_gets_placeholder() {
        let set = parse_routes(
            r#"{"routes": [{"routename": "A", "stops": {}}, {"stops": {"1": "x"}}, {"routename": "  ", "stops": {}}]}"#,
        )
        .unwrap();

        assert_eq!(set.routes[1].name, "Route_1");
        assert_eq!(set.routes[1].name_source, RouteName::Placeholder);
        assert_eq!(set.routes[1].context_name(), Some("Route_1"));
        assert_eq!(set.routes[2].name, "Route_2");
        assert_eq!(set.routes[2].name_source, RouteName::Blank);
    }

    #[test]
    fn empty_or_null_name_gives_no_context() {
        let set = parse_routes(
            r#"{"routes": [{"routename": "", "stops": {}}, {"routename": null, "stops": {}}]}"#,
        )
        .unwrap();

        assert_eq!(set.routes[0].name, "Route_0");
        assert_eq!(set.routes[0].context_name(), None);
        assert_eq!(set.routes[1].name, "Route_1");
        assert_eq!(set.routes[1].context_name(), None);
    }

    #[test]
    fn accepts_camel_case_route_name() {
        let set = parse_routes(r#"{"routes": [{"routeName": "M70", "stops": {}}]}"#).unwrap();
        assert_eq!(set.routes[0].name, "M70");
    }

    #[test]
    fn missing_routes_key_is_empty() {
        let set = parse_routes("{}").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn stop_names_are_trimmed() {
        let set =
            parse_routes(r#"{"routes": [{"routename": "R", "stops": {"1": "  Guindy  "}}]}"#)
                .unwrap();
        assert_eq!(set.routes[0].stops[0].name, "Guindy");
    }

    #[test]
    fn duplicate_stop_id_rejected() {
        let err = parse_routes(r#"{"routes": [{"routename": "R", "stops": {"1": "a", "1": "b"}}]}"#)
            .unwrap_err();
        assert!(matches!(err, RouteFileError::DuplicateStop { .. }));
    }

    #[test]
    fn blank_stop_id_rejected() {
        let err = parse_routes(r#"{"routes": [{"routename": "R", "stops": {" ": "a"}}]}"#)
            .unwrap_err();
        assert!(matches!(err, RouteFileError::InvalidStopId { .. }));
    }

    #[test]
    fn non_string_stop_name_rejected() {
        let err =
            parse_routes(r#"{"routes": [{"routename": "R", "stops": {"1": 5}}]}"#).unwrap_err();
        assert!(matches!(err, RouteFileError::Json(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            parse_routes("{\"routes\": ["),
            Err(RouteFileError::Json(_))
        ));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, r#"{"routes": [{"routename": "R1", "stops": {"1": "x"}}]}"#)
            .unwrap();

        let set = load_routes(&path).unwrap();
        assert_eq!(set.total_stops(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_routes(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, RouteFileError::Io { .. }));
    }
}
