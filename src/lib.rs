//! # patternrouter
//!
//! **patternrouter** is a bidirectional URI routing engine. A route is a URI
//! pattern such as `{@controller}(/{@action}).{@format}` plus defaults; the same
//! route both matches incoming request paths into route values and resolves
//! route values back into a URI.
//!
//! ## Architecture
//!
//! - **[`route`]** - Pattern parsing, route parts, and the match/resolve algorithms
//! - **[`router`]** - Ordered route sets, first-match dispatch, memoized rebuilds
//! - **[`config`]** - Route configuration types and YAML/JSON/TOML loading
//! - **[`registry`]** - Controller, identity and custom route part collaborators
//! - **[`values`]** - Nested route value helpers (dotted paths, deep merge)
//! - **[`request`]** - The request view routes match against
//! - **[`hot_reload`]** - Live reloading of a routes file
//! - **[`logging`]** - `tracing` subscriber setup for hosts
//!
//! ### Matching and Resolving
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Router
//!     participant RouteSet
//!     participant Route
//!
//!     Host->>Router: route(&request)
//!     Router->>Router: routes() (rebuild if configuration changed)
//!     Router->>RouteSet: route(&request)
//!     loop configured order
//!         RouteSet->>Route: matches(&request)
//!         Route-->>RouteSet: Option<RouteValues>
//!     end
//!     RouteSet-->>Router: first match
//!     Router-->>Host: Option<RouteValues>
//!
//!     Host->>Router: resolve(&values)
//!     loop configured order
//!         Router->>Route: resolves(&values)
//!     end
//!     Router-->>Host: URI or NoMatchingRoute
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use patternrouter::config::RouteConfiguration;
//! use patternrouter::request::RoutingRequest;
//! use patternrouter::router::Router;
//! use serde_json::json;
//!
//! let mut entry = RouteConfiguration::new("{@controller}(/{@action})");
//! entry.defaults = json!({"@action": "index"}).as_object().cloned().unwrap();
//! let router = Router::new(vec![entry]);
//!
//! let values = router.route(&RoutingRequest::get("blog/show")).unwrap().unwrap();
//! assert_eq!(values["@controller"], "blog");
//! assert_eq!(values["@action"], "show");
//!
//! let home = json!({"@controller": "blog", "@action": "index"});
//! assert_eq!(router.resolve(home.as_object().unwrap()).unwrap(), "blog");
//! ```

pub mod config;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod registry;
pub mod request;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod values;

pub use error::RoutingError;
pub use route::Route;
pub use router::Router;
pub use values::RouteValues;
