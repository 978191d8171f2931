//! # Router Module
//!
//! The router owns an ordered list of route configurations and turns it into a
//! [`RouteSet`] of parsed [`Route`](crate::route::Route)s on first use.
//!
//! ## Overview
//!
//! - **Matching** ([`Router::route`]): routes are tried strictly in configured
//!   order and the first match wins. Nothing matching is `Ok(None)`, not an error.
//! - **Resolving** ([`Router::resolve`]): the first route that can build a URI
//!   from the given values wins; no such route is [`RoutingError::NoMatchingRoute`](crate::error::RoutingError::NoMatchingRoute).
//! - **Memoization**: the route set is rebuilt only after the configuration
//!   changed ([`Router::set_routes_configuration`], [`Router::add_route_configuration`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use patternrouter::config::RouteConfiguration;
//! use patternrouter::request::RoutingRequest;
//! use patternrouter::router::Router;
//!
//! let router = Router::new(vec![RouteConfiguration::new("{@controller}/{@action}")]);
//! let values = router.route(&RoutingRequest::get("standard/index"))?;
//! assert_eq!(router.resolve(&values.unwrap())?, "standard/index");
//! ```

mod core;

pub use self::core::{ResolvedUri, RouteMatch, RouteSet, Router};
