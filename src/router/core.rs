//! Router core: the built route set and the memoizing router around it.

use arc_swap::{ArcSwap, ArcSwapOption};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::RouteConfiguration;
use crate::error::RoutingError;
use crate::registry::RoutingContext;
use crate::request::RouteRequest;
use crate::route::Route;
use crate::values::RouteValues;

const SLOW_ROUTING_THRESHOLD: Duration = Duration::from_millis(1);

/// Result of successfully matching a request.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The route that matched (shared with the route set).
    pub route: Arc<Route>,
    /// Route defaults merged with the values extracted from the path.
    pub values: RouteValues,
}

/// Result of successfully resolving route values.
#[derive(Debug, Clone)]
pub struct ResolvedUri {
    pub route: Arc<Route>,
    /// Path without leading slash, possibly followed by a query string.
    pub uri: String,
}

/// Parsed routes in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<Arc<Route>>,
    generation: u64,
}

impl RouteSet {
    /// Build and parse every route of `configuration`.
    ///
    /// Entries sharing a `uriPattern` must either all set `httpMethods` or all
    /// leave it out, otherwise a request could never tell them apart.
    pub fn build(
        configuration: &[RouteConfiguration],
        context: &RoutingContext,
    ) -> Result<Self, RoutingError> {
        let mut method_constraints: HashMap<&str, bool> = HashMap::new();
        let mut routes = Vec::with_capacity(configuration.len());

        for entry in configuration {
            let constrained = entry.http_methods.is_some();
            match method_constraints.get(entry.uri_pattern.as_str()) {
                Some(&previous) if previous != constrained => {
                    return Err(RoutingError::InvalidRouteSetup {
                        uri_pattern: entry.uri_pattern.clone(),
                    });
                }
                _ => {
                    method_constraints.insert(&entry.uri_pattern, constrained);
                }
            }

            let mut route = Route::from_configuration(entry, context.clone())?;
            route.parse()?;
            routes.push(Arc::new(route));
        }

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| describe(r))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self {
            routes,
            generation: 0,
        })
    }

    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Configuration generation this set was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First route, in configuration order, that matches `request`.
    pub fn route<R>(&self, request: &R) -> Result<Option<RouteMatch>, RoutingError>
    where
        R: RouteRequest + ?Sized,
    {
        for route in &self.routes {
            if let Some(values) = route.matches(request)? {
                return Ok(Some(RouteMatch {
                    route: Arc::clone(route),
                    values,
                }));
            }
        }
        Ok(None)
    }

    /// First route, in configuration order, that can build a URI from `route_values`.
    pub fn resolve(&self, route_values: &RouteValues) -> Result<ResolvedUri, RoutingError> {
        for route in &self.routes {
            if let Some(uri) = route.resolves(route_values)? {
                return Ok(ResolvedUri {
                    route: Arc::clone(route),
                    uri,
                });
            }
        }
        Err(RoutingError::NoMatchingRoute)
    }

    /// Log every route (pattern, methods, name) at info level.
    pub fn dump_routes(&self) {
        info!(
            routes_count = self.routes.len(),
            generation = self.generation,
            "[routes]"
        );
        for route in &self.routes {
            info!("[route] {}", describe(route));
        }
    }
}

fn describe(route: &Route) -> String {
    let methods = if route.has_http_method_constraints() {
        route
            .http_methods()
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        "*".to_string()
    };
    format!(
        "{} {} ({})",
        methods,
        route.uri_pattern().unwrap_or_default(),
        route.display_name()
    )
}

#[derive(Debug, Default)]
struct RoutesConfiguration {
    generation: u64,
    entries: Vec<RouteConfiguration>,
}

/// Matches requests against, and resolves URIs from, an ordered list of routes.
///
/// The route set is built lazily from the configuration and rebuilt only after
/// the configuration changes. All methods take `&self`; share the router in an
/// `Arc` to reconfigure it while it serves lookups.
#[derive(Debug)]
pub struct Router {
    configuration: ArcSwap<RoutesConfiguration>,
    route_set: ArcSwapOption<RouteSet>,
    last_matched_route: ArcSwapOption<Route>,
    last_resolved_route: ArcSwapOption<Route>,
    context: RoutingContext,
}

impl Default for Router {
    fn default() -> Self {
        Self::with_context(Vec::new(), RoutingContext::default())
    }
}

impl Router {
    pub fn new(routes: Vec<RouteConfiguration>) -> Self {
        Self::with_context(routes, RoutingContext::default())
    }

    pub fn with_context(routes: Vec<RouteConfiguration>, context: RoutingContext) -> Self {
        Self {
            configuration: ArcSwap::from_pointee(RoutesConfiguration {
                generation: 1,
                entries: routes,
            }),
            route_set: ArcSwapOption::empty(),
            last_matched_route: ArcSwapOption::empty(),
            last_resolved_route: ArcSwapOption::empty(),
            context,
        }
    }

    pub fn context(&self) -> &RoutingContext {
        &self.context
    }

    /// Current configuration entries.
    pub fn routes_configuration(&self) -> Vec<RouteConfiguration> {
        self.configuration.load().entries.clone()
    }

    /// Replace the configuration; routes are rebuilt on the next lookup.
    pub fn set_routes_configuration(&self, routes: Vec<RouteConfiguration>) {
        self.configuration.rcu(|current| RoutesConfiguration {
            generation: current.generation + 1,
            entries: routes.clone(),
        });
    }

    /// Append one entry after the configured routes.
    pub fn add_route_configuration(&self, route: RouteConfiguration) {
        self.configuration.rcu(|current| {
            let mut entries = current.entries.clone();
            entries.push(route.clone());
            RoutesConfiguration {
                generation: current.generation + 1,
                entries,
            }
        });
    }

    /// Build `routes` first and install them only if they are valid.
    ///
    /// On error the previous configuration and route set stay active.
    pub fn replace_routes_configuration(
        &self,
        routes: Vec<RouteConfiguration>,
    ) -> Result<Arc<RouteSet>, RoutingError> {
        let mut route_set = RouteSet::build(&routes, &self.context)?;
        let previous = self.configuration.rcu(|current| RoutesConfiguration {
            generation: current.generation + 1,
            entries: routes.clone(),
        });
        route_set.generation = previous.generation + 1;
        let route_set = Arc::new(route_set);
        self.route_set.store(Some(Arc::clone(&route_set)));
        Ok(route_set)
    }

    /// The route set for the current configuration, building it if needed.
    pub fn routes(&self) -> Result<Arc<RouteSet>, RoutingError> {
        let configuration = self.configuration.load_full();
        if let Some(route_set) = self.route_set.load_full() {
            if route_set.generation == configuration.generation {
                return Ok(route_set);
            }
        }
        let mut route_set = RouteSet::build(&configuration.entries, &self.context)?;
        route_set.generation = configuration.generation;
        let route_set = Arc::new(route_set);
        self.route_set.store(Some(Arc::clone(&route_set)));
        Ok(route_set)
    }

    /// Match `request` against the routes in order.
    ///
    /// `Ok(None)` means nothing matched; applying a fallback is up to the caller.
    pub fn route<R>(&self, request: &R) -> Result<Option<RouteValues>, RoutingError>
    where
        R: RouteRequest + ?Sized,
    {
        let route_set = self.routes()?;
        debug!(
            method = %request.method(),
            path = %request.path(),
            routes_count = route_set.len(),
            "Route match attempt"
        );

        let match_start = Instant::now();
        let result = route_set.route(request)?;
        let match_duration = match_start.elapsed();

        let Some(RouteMatch { route, values }) = result else {
            debug!(
                method = %request.method(),
                path = %request.path(),
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            return Ok(None);
        };

        if match_duration > SLOW_ROUTING_THRESHOLD {
            warn!(
                method = %request.method(),
                path = %request.path(),
                route_name = %route.display_name(),
                uri_pattern = route.uri_pattern().unwrap_or_default(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            info!(
                method = %request.method(),
                path = %request.path(),
                route_name = %route.display_name(),
                uri_pattern = route.uri_pattern().unwrap_or_default(),
                route_values = ?values,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }
        self.last_matched_route.store(Some(route));
        Ok(Some(values))
    }

    /// Build a URI from `route_values` with the first route able to.
    pub fn resolve(&self, route_values: &RouteValues) -> Result<String, RoutingError> {
        let route_set = self.routes()?;
        let resolve_start = Instant::now();
        let result = route_set.resolve(route_values);
        let resolve_duration = resolve_start.elapsed();

        match result {
            Ok(ResolvedUri { route, uri }) => {
                debug!(
                    uri = %uri,
                    route_name = %route.display_name(),
                    uri_pattern = route.uri_pattern().unwrap_or_default(),
                    duration_us = resolve_duration.as_micros(),
                    "Route resolved"
                );
                self.last_resolved_route.store(Some(route));
                Ok(uri)
            }
            Err(e) => {
                warn!(
                    route_values = ?route_values,
                    duration_us = resolve_duration.as_micros(),
                    error = %e,
                    "Route resolution failed"
                );
                Err(e)
            }
        }
    }

    /// The route of the most recent successful [`Router::route`] call.
    ///
    /// A call that matches nothing leaves the previous record in place.
    pub fn last_matched_route(&self) -> Option<Arc<Route>> {
        self.last_matched_route.load_full()
    }

    /// The route of the most recent successful [`Router::resolve`] call.
    pub fn last_resolved_route(&self) -> Option<Arc<Route>> {
        self.last_resolved_route.load_full()
    }
}
