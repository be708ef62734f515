//! Route definitions: named collections of stops.

use super::StopId;

/// A named boarding point on a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// How a route got its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteName {
    /// The route file named the route.
    Given,
    /// The route file had no name key; a positional placeholder was used.
    Placeholder,
    /// The name key was present but empty or null. Labelled with the
    /// placeholder, but offers no geocoding context.
    Blank,
}

/// A route and its stops, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub name_source: RouteName,
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn new(name: impl Into<String>, stops: Vec<Stop>) -> Self {
        Self {
            name: name.into(),
            name_source: RouteName::Given,
            stops,
        }
    }

    /// A route whose file entry had no name, labelled `Route_{index}`.
    pub fn unnamed(index: usize, stops: Vec<Stop>) -> Self {
        Self {
            name: format!("Route_{index}"),
            name_source: RouteName::Placeholder,
            stops,
        }
    }

    /// A route whose file entry had an empty or null name, labelled
    /// `Route_{index}`.
    pub fn blank(index: usize, stops: Vec<Stop>) -> Self {
        Self {
            name_source: RouteName::Blank,
            ..Self::unnamed(index, stops)
        }
    }

    /// The name to use as geocoding context. Placeholders count; only a
    /// blank name offers none.
    pub fn context_name(&self) -> Option<&str> {
        match self.name_source {
            RouteName::Given | RouteName::Placeholder => Some(&self.name),
            RouteName::Blank => None,
        }
    }
}

/// Every route in one input file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSet {
    pub routes: Vec<Route>,
}

impl RouteSet {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of stops across all routes.
    pub fn total_stops(&self) -> usize {
        self.routes.iter().map(|r| r.stops.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, name: &str) -> Stop {
        Stop::new(StopId::parse(id).unwrap(), name)
    }

    #[test]
    fn given_name_is_context() {
        let route = Route::new("21G", vec![stop("1", "Broadway")]);
        assert_eq!(route.context_name(), Some("21G"));
    }

    #[test]
    fn placeholder_name_is_context() {
        let route = Route::unnamed(3, vec![]);
        assert_eq!(route.name, "Route_3");
        assert_eq!(route.context_name(), Some("Route_3"));
    }

    #[test]
    fn blank_name_is_not_context() {
        let route = Route::blank(2, vec![]);
        assert_eq!(route.name, "Route_2");
        assert_eq!(route.name_source, RouteName::Blank);
        assert_eq!(route.context_name(), None);
    }

    #[test]
    fn total_stops_counts_all_routes() {
        let set = RouteSet::new(vec![
            Route::new("A", vec![stop("1", "x"), stop("2", "y")]),
            Route::new("B", vec![]),
            Route::new("C", vec![stop("1", "z")]),
        ]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.total_stops(), 3);
        assert!(RouteSet::default().is_empty());
    }
}
