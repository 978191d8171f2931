//! Route core: one configured pattern with its match and resolve algorithms.
//!
//! Both entry points take `&self` and return their outcome, so a parsed
//! `Route` can be shared between threads behind an `Arc`.

use http::Method;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

use super::parse;
use super::part::RoutePart;
use super::query::{build_query, extract_internal_arguments};
use crate::config::{RouteConfiguration, RoutePartConfiguration};
use crate::error::RoutingError;
use crate::registry::RoutingContext;
use crate::request::RouteRequest;
use crate::values::{self, RouteValues};

/// A URI pattern plus everything needed to match requests against it and to
/// build URIs from route values.
#[derive(Debug, Clone)]
pub struct Route {
    pub(super) name: Option<String>,
    pub(super) uri_pattern: Option<String>,
    pub(super) defaults: RouteValues,
    pub(super) route_parts: Vec<RoutePart>,
    pub(super) route_parts_configuration: HashMap<String, RoutePartConfiguration>,
    pub(super) lower_case: bool,
    pub(super) append_exceeding_arguments: bool,
    pub(super) http_methods: Vec<Method>,
    pub(super) is_parsed: bool,
    pub(super) context: RoutingContext,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            name: None,
            uri_pattern: None,
            defaults: RouteValues::new(),
            route_parts: Vec::new(),
            route_parts_configuration: HashMap::new(),
            lower_case: true,
            append_exceeding_arguments: false,
            http_methods: Vec::new(),
            is_parsed: false,
            context: RoutingContext::default(),
        }
    }
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unparsed route from one configuration entry.
    pub fn from_configuration(
        configuration: &RouteConfiguration,
        context: RoutingContext,
    ) -> Result<Self, RoutingError> {
        let mut route = Route {
            context,
            ..Route::default()
        };
        route.name = configuration.name.clone();
        route.set_uri_pattern(configuration.uri_pattern.clone());
        route.set_defaults(configuration.defaults.clone());
        route.set_route_parts_configuration(configuration.route_parts.clone());
        if let Some(lower_case) = configuration.to_lower_case {
            route.set_lower_case(lower_case);
        }
        if let Some(append) = configuration.append_exceeding_arguments {
            route.set_append_exceeding_arguments(append);
        }
        if let Some(methods) = &configuration.http_methods {
            let methods = methods
                .iter()
                .map(|m| {
                    Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
                        RoutingError::InvalidHttpMethod {
                            route: route.display_name().into_owned(),
                            method: m.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            route.set_http_methods(methods);
        }
        Ok(route)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for logs and errors; falls back to the pattern.
    pub fn display_name(&self) -> Cow<'_, str> {
        match (&self.name, &self.uri_pattern) {
            (Some(name), _) => Cow::Borrowed(name),
            (None, Some(pattern)) => Cow::Borrowed(pattern),
            (None, None) => Cow::Borrowed(""),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn uri_pattern(&self) -> Option<&str> {
        self.uri_pattern.as_deref()
    }

    pub fn set_uri_pattern(&mut self, uri_pattern: impl Into<String>) {
        self.uri_pattern = Some(uri_pattern.into());
        self.invalidate();
    }

    pub fn defaults(&self) -> &RouteValues {
        &self.defaults
    }

    /// Dotted keys (`"post.title"`) are stored as nested maps.
    pub fn set_defaults(&mut self, defaults: RouteValues) {
        self.defaults = values::expand_dotted_keys(&defaults);
        self.invalidate();
    }

    pub fn route_parts_configuration(&self) -> &HashMap<String, RoutePartConfiguration> {
        &self.route_parts_configuration
    }

    pub fn set_route_parts_configuration(
        &mut self,
        configuration: HashMap<String, RoutePartConfiguration>,
    ) {
        self.route_parts_configuration = configuration;
        self.invalidate();
    }

    pub fn lower_case(&self) -> bool {
        self.lower_case
    }

    pub fn set_lower_case(&mut self, lower_case: bool) {
        self.lower_case = lower_case;
        self.invalidate();
    }

    pub fn append_exceeding_arguments(&self) -> bool {
        self.append_exceeding_arguments
    }

    pub fn set_append_exceeding_arguments(&mut self, append: bool) {
        self.append_exceeding_arguments = append;
    }

    pub fn http_methods(&self) -> &[Method] {
        &self.http_methods
    }

    pub fn set_http_methods(&mut self, methods: Vec<Method>) {
        self.http_methods = methods;
    }

    pub fn has_http_method_constraints(&self) -> bool {
        !self.http_methods.is_empty()
    }

    pub fn set_context(&mut self, context: RoutingContext) {
        self.context = context;
        self.invalidate();
    }

    pub fn is_parsed(&self) -> bool {
        self.is_parsed
    }

    /// Parsed parts; empty until [`Route::parse`] succeeds.
    pub fn route_parts(&self) -> &[RoutePart] {
        &self.route_parts
    }

    fn invalidate(&mut self) {
        self.is_parsed = false;
        self.route_parts.clear();
    }

    /// Compile the pattern into route parts. A no-op once parsed.
    ///
    /// On error the route stays unparsed with no parts.
    pub fn parse(&mut self) -> Result<(), RoutingError> {
        if self.is_parsed {
            return Ok(());
        }
        self.route_parts = parse::compile(self)?;
        self.is_parsed = true;
        debug!(
            route_name = %self.display_name(),
            uri_pattern = self.uri_pattern.as_deref().unwrap_or_default(),
            parts_count = self.route_parts.len(),
            "Route pattern parsed"
        );
        Ok(())
    }

    fn parts(&self) -> Result<Cow<'_, [RoutePart]>, RoutingError> {
        if self.is_parsed {
            Ok(Cow::Borrowed(&self.route_parts))
        } else {
            Ok(Cow::Owned(parse::compile(self)?))
        }
    }

    /// Match a request against this route.
    ///
    /// Returns the defaults merged with the values extracted from the path, or
    /// `None` if the route does not match. Only an invalid part value is an error.
    pub fn matches<R>(&self, request: &R) -> Result<Option<RouteValues>, RoutingError>
    where
        R: RouteRequest + ?Sized,
    {
        if self.uri_pattern.is_none() {
            return Ok(None);
        }
        if self.has_http_method_constraints() && !self.http_methods.contains(request.method()) {
            return Ok(None);
        }
        let parts = self.parts()?;

        let mut route_path = request.path().trim_matches('/');
        let mut match_results = RouteValues::new();
        let mut skip_optional_parts = false;
        let mut optional_part_count = 0usize;

        for part in parts.iter() {
            if part.is_optional() {
                optional_part_count += 1;
                if skip_optional_parts {
                    if !part.has_default_value() {
                        return Ok(None);
                    }
                    continue;
                }
            } else {
                optional_part_count = 0;
                skip_optional_parts = false;
            }

            let Some(matched) = part.match_path(route_path) else {
                if part.is_optional() && optional_part_count == 1 && part.has_default_value() {
                    skip_optional_parts = true;
                    continue;
                }
                return Ok(None);
            };
            route_path = &route_path[matched.consumed..];

            if let Some(value) = matched.value {
                if !values::is_plain(&value) {
                    return Err(RoutingError::invalid_value(
                        part.name(),
                        self.name.as_deref(),
                        "matched values must be strings, numbers, booleans or containers of those",
                    ));
                }
                values::set_path(&mut match_results, part.name(), value);
            }
        }

        if !route_path.is_empty() {
            return Ok(None);
        }
        Ok(Some(values::deep_merge(&self.defaults, &match_results)))
    }

    /// Build a URI from `route_values`.
    ///
    /// Returns `None` if a required part cannot be resolved, if a default is
    /// contradicted, or if exceeding arguments are left over and may not be appended.
    /// Referring to a controller that does not exist is an error.
    pub fn resolves(&self, route_values: &RouteValues) -> Result<Option<String>, RoutingError> {
        if self.uri_pattern.is_none() {
            return Ok(None);
        }
        let parts = self.parts()?;

        let mut route_values = route_values.clone();
        let merged_route_values = values::deep_merge(&self.defaults, &route_values);
        let mut remaining_defaults = self.defaults.clone();

        let mut matching_uri = String::new();
        let mut optional_uri_portion = String::new();
        let mut require_optional_route_parts = false;

        for part in parts.iter() {
            let resolved = part.resolve(&mut route_values);
            if resolved.is_none() && !part.has_default_value() {
                return Ok(None);
            }
            if part.is_dynamic() {
                values::unset_path(&mut remaining_defaults, part.name());
            }

            let default = part
                .default_text()
                .map_err(|reason| RoutingError::invalid_value(part.name(), self.name.as_deref(), reason))?;
            let default = default.as_deref().unwrap_or_default();

            if !part.is_optional() {
                matching_uri.push_str(resolved.as_deref().unwrap_or(default));
                optional_uri_portion.clear();
                require_optional_route_parts = false;
                continue;
            }

            match resolved.as_deref() {
                Some(value) if !value.eq_ignore_ascii_case(default) => {
                    optional_uri_portion.push_str(value);
                    require_optional_route_parts = true;
                }
                _ => optional_uri_portion.push_str(default),
            }
            if require_optional_route_parts {
                matching_uri.push_str(&optional_uri_portion);
                optional_uri_portion.clear();
            }
        }

        if !compare_and_remove_matching_defaults(&remaining_defaults, &mut route_values) {
            return Ok(None);
        }

        if route_values.get("@format").map_or(false, |f| f.as_str() == Some("")) {
            route_values.remove("@format");
        }

        self.ensure_controller_exists(&merged_route_values)?;

        if !route_values.is_empty() {
            values::remove_empty_elements(&mut route_values);
            let query_values = if self.append_exceeding_arguments {
                route_values
            } else {
                let internal_arguments = extract_internal_arguments(&mut route_values);
                if !route_values.is_empty() {
                    return Ok(None);
                }
                internal_arguments
            };
            let query = build_query(&query_values);
            if !query.is_empty() {
                matching_uri.push(if matching_uri.contains('?') { '&' } else { '?' });
                matching_uri.push_str(&query);
            }
        }

        Ok(Some(matching_uri))
    }

    /// Fails with `ControllerNotFound` when the configured resolver does not know
    /// the controller named by `merged`.
    ///
    /// Without a resolver, or without `@controller` in `merged`, there is nothing
    /// to check; the caller picks the fallback controller for such routes.
    fn ensure_controller_exists(&self, merged: &RouteValues) -> Result<(), RoutingError> {
        let Some(controllers) = &self.context.controllers else {
            return Ok(());
        };
        let Some(controller) = merged.get("@controller").and_then(values::scalar_text) else {
            return Ok(());
        };
        let text = |key: &str| {
            merged
                .get(key)
                .and_then(values::scalar_text)
                .unwrap_or_default()
        };
        let package = text("@package");
        let subpackage = text("@subpackage");
        if controllers
            .resolve_controller_object_name(&package, &subpackage, &controller)
            .is_none()
        {
            return Err(RoutingError::ControllerNotFound {
                package,
                subpackage,
                controller,
            });
        }
        Ok(())
    }
}

/// Checks defaults no part consumed against the caller's values.
///
/// A default may be missing from `route_values` only if it is `""`, or if it is
/// `@format` with a default of `html`. Present values must equal their default
/// case-insensitively and are removed once checked.
fn compare_and_remove_matching_defaults(defaults: &RouteValues, route_values: &mut RouteValues) -> bool {
    for (key, default) in defaults {
        let Some(value) = route_values.get_mut(key).filter(|v| !v.is_null()) else {
            let tolerated = default.as_str() == Some("")
                || (key == "@format"
                    && values::scalar_text(default).map_or(false, |f| f.eq_ignore_ascii_case("html")));
            if tolerated {
                continue;
            }
            return false;
        };

        if let (Value::Object(nested_defaults), Value::Object(nested_values)) = (default, &mut *value) {
            if !compare_and_remove_matching_defaults(nested_defaults, nested_values) {
                return false;
            }
            continue;
        }
        let same = match (default, &*value) {
            (Value::Object(_), _) | (_, Value::Object(_)) => false,
            (Value::Array(_), _) | (_, Value::Array(_)) => default == &*value,
            (default, value) => match (values::scalar_text(value), values::scalar_text(default)) {
                (Some(v), Some(d)) => v.eq_ignore_ascii_case(&d),
                _ => false,
            },
        };
        if !same {
            return false;
        }
        route_values.remove(key);
    }
    true
}
