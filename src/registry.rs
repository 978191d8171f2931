//! # Routing Collaborators
//!
//! Routes lean on three things they do not own:
//!
//! - a [`ControllerResolver`] that says whether `@package` / `@subpackage` /
//!   `@controller` values point at a real controller,
//! - an [`IdentityMapper`] that translates between object identifiers and the
//!   path segments identity route parts put into URIs,
//! - the [`RoutePartHandlers`] registry of custom dynamic route parts, looked up
//!   by the `handler` name in a route part configuration.
//!
//! [`RoutingContext`] bundles them so the router can hand one value to every
//! route it builds.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::route::RoutePartHandler;

/// Resolves controller coordinates to a controller object name.
pub trait ControllerResolver: Send + Sync {
    /// Returns the controller object name, or `None` if no such controller exists.
    fn resolve_controller_object_name(
        &self,
        package: &str,
        subpackage: &str,
        controller: &str,
    ) -> Option<String>;
}

impl<F> ControllerResolver for F
where
    F: Fn(&str, &str, &str) -> Option<String> + Send + Sync,
{
    fn resolve_controller_object_name(
        &self,
        package: &str,
        subpackage: &str,
        controller: &str,
    ) -> Option<String> {
        self(package, subpackage, controller)
    }
}

/// Fixed table of known controllers.
///
/// Lookups are case-insensitive on all three coordinates.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<(String, String, String), String>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller; returns `self` for chaining.
    #[must_use]
    pub fn with_controller(
        mut self,
        package: &str,
        subpackage: &str,
        controller: &str,
        object_name: impl Into<String>,
    ) -> Self {
        self.controllers
            .insert(Self::key(package, subpackage, controller), object_name.into());
        self
    }

    fn key(package: &str, subpackage: &str, controller: &str) -> (String, String, String) {
        (
            package.to_ascii_lowercase(),
            subpackage.to_ascii_lowercase(),
            controller.to_ascii_lowercase(),
        )
    }
}

impl ControllerResolver for ControllerRegistry {
    fn resolve_controller_object_name(
        &self,
        package: &str,
        subpackage: &str,
        controller: &str,
    ) -> Option<String> {
        self.controllers
            .get(&Self::key(package, subpackage, controller))
            .cloned()
    }
}

/// Maps object identifiers to URI path segments and back, per object type.
pub trait IdentityMapper: Send + Sync + fmt::Debug {
    /// Identifier of the `object_type` instance addressed by `path_segment`.
    fn identifier_for_path_segment(&self, object_type: &str, path_segment: &str) -> Option<String>;

    /// Path segment for the `object_type` instance with `identifier`.
    ///
    /// `uri_pattern` is the part's configured pattern for building new segments,
    /// if the mapper supports generating them.
    fn path_segment_for_identifier(
        &self,
        object_type: &str,
        uri_pattern: Option<&str>,
        identifier: &str,
    ) -> Option<String>;
}

/// Identity mapper backed by a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityMapper {
    by_segment: HashMap<(String, String), String>,
    by_identifier: HashMap<(String, String), String>,
}

impl InMemoryIdentityMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `path_segment` addresses the `object_type` object with `identifier`.
    #[must_use]
    pub fn with_mapping(mut self, object_type: &str, path_segment: &str, identifier: &str) -> Self {
        self.by_segment.insert(
            (object_type.to_string(), path_segment.to_string()),
            identifier.to_string(),
        );
        self.by_identifier.insert(
            (object_type.to_string(), identifier.to_string()),
            path_segment.to_string(),
        );
        self
    }
}

impl IdentityMapper for InMemoryIdentityMapper {
    fn identifier_for_path_segment(&self, object_type: &str, path_segment: &str) -> Option<String> {
        self.by_segment
            .get(&(object_type.to_string(), path_segment.to_string()))
            .cloned()
    }

    fn path_segment_for_identifier(
        &self,
        object_type: &str,
        _uri_pattern: Option<&str>,
        identifier: &str,
    ) -> Option<String> {
        self.by_identifier
            .get(&(object_type.to_string(), identifier.to_string()))
            .cloned()
    }
}

/// Custom dynamic route part handlers, registered by name.
#[derive(Debug, Clone, Default)]
pub struct RoutePartHandlers {
    handlers: HashMap<String, Arc<dyn RoutePartHandler>>,
}

impl RoutePartHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous handler of that name.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn RoutePartHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    #[must_use]
    pub fn with_handler(mut self, name: impl Into<String>, handler: Arc<dyn RoutePartHandler>) -> Self {
        self.register(name, handler);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn RoutePartHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Everything a route needs from outside its own configuration.
#[derive(Clone)]
pub struct RoutingContext {
    /// When `None`, resolving skips the controller existence check.
    pub controllers: Option<Arc<dyn ControllerResolver>>,
    pub identities: Arc<dyn IdentityMapper>,
    pub handlers: RoutePartHandlers,
}

impl Default for RoutingContext {
    fn default() -> Self {
        Self {
            controllers: None,
            identities: Arc::new(InMemoryIdentityMapper::default()),
            handlers: RoutePartHandlers::default(),
        }
    }
}

impl RoutingContext {
    #[must_use]
    pub fn with_controllers(mut self, controllers: Arc<dyn ControllerResolver>) -> Self {
        self.controllers = Some(controllers);
        self
    }

    #[must_use]
    pub fn with_identities(mut self, identities: Arc<dyn IdentityMapper>) -> Self {
        self.identities = identities;
        self
    }

    #[must_use]
    pub fn with_handlers(mut self, handlers: RoutePartHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}

impl fmt::Debug for RoutingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingContext")
            .field("controllers", &self.controllers.is_some())
            .field("identities", &self.identities)
            .field("handlers", &self.handlers)
            .finish()
    }
}
