//! URI pattern compiler.
//!
//! Grammar, one token at a time:
//!
//! ```text
//! token    := [ "(" ] ( "{" content "}" | content ) [ ")" ]
//! content  := [ "@" ] any text without { } ( )
//! ```
//!
//! `{…}` marks a dynamic part, `(…)` an optional section. Dynamic content may be
//! quoted (`{'@controller'}`); the quotes are not part of the name.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::part::{RoutePart, RoutePartKind};
use super::Route;
use crate::error::{PatternViolation, RoutingError};
use crate::values;

static ROUTE_PART_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<optionalStart>\(?)(?P<dynamic>\{?)(?P<content>@?[^}{()]+)\}?(?P<optionalEnd>\)?)",
    )
    .expect("route part token regex must compile")
});

fn flag(captures: &Captures<'_>, group: &str) -> bool {
    captures.name(group).map_or(false, |m| !m.as_str().is_empty())
}

/// Compile the route's pattern into parts. An unset or empty pattern yields no parts.
pub(super) fn compile(route: &Route) -> Result<Vec<RoutePart>, RoutingError> {
    let pattern = match route.uri_pattern.as_deref() {
        None | Some("") => return Ok(Vec::new()),
        Some(pattern) => pattern,
    };
    let fail = |violation| RoutingError::invalid_pattern(pattern, route.name.as_deref(), violation);

    if pattern.ends_with('/') {
        return Err(fail(PatternViolation::TrailingSlash));
    }
    if pattern.starts_with('/') {
        return Err(fail(PatternViolation::LeadingSlash));
    }

    let mut parts: Vec<RoutePart> = Vec::new();
    let mut current_part_is_optional = false;

    for token in ROUTE_PART_TOKEN.captures_iter(pattern) {
        let content = token.name("content").map_or("", |m| m.as_str());

        if flag(&token, "optionalStart") {
            if parts.last().map_or(false, RoutePart::is_optional) {
                return Err(fail(PatternViolation::SuccessiveOptionalSections));
            }
            current_part_is_optional = true;
        }

        let mut part = if flag(&token, "dynamic") {
            if parts.last().map_or(false, RoutePart::is_dynamic) {
                return Err(fail(PatternViolation::SuccessiveDynamicParts));
            }
            let name = content.trim_matches('\'');
            let mut part = RoutePart::new(name, dynamic_kind(route, name)?);
            part.default_value = values::get_path(&route.defaults, name).cloned();
            part
        } else {
            if let Some(previous) = parts.last_mut().filter(|p| p.is_dynamic()) {
                previous.split_string = content.to_string();
            }
            RoutePart::new(content, RoutePartKind::Static)
        };

        part.optional = current_part_is_optional;
        part.lower_case = route.lower_case;
        if let Some(configuration) = route.route_parts_configuration.get(part.name()) {
            if !configuration.options.is_empty() {
                part.options = configuration.options.clone();
            }
            if let Some(lower_case) = configuration.to_lower_case {
                part.lower_case = lower_case;
            }
        }
        parts.push(part);

        if flag(&token, "optionalEnd") {
            if !current_part_is_optional {
                return Err(fail(PatternViolation::UnopenedOptionalSection));
            }
            current_part_is_optional = false;
        }
    }

    if current_part_is_optional {
        return Err(fail(PatternViolation::UnterminatedOptionalSection));
    }
    Ok(parts)
}

fn dynamic_kind(route: &Route, name: &str) -> Result<RoutePartKind, RoutingError> {
    let Some(configuration) = route.route_parts_configuration.get(name) else {
        return Ok(RoutePartKind::Dynamic);
    };
    if let Some(handler) = &configuration.handler {
        let implementation = route.context.handlers.get(handler).ok_or_else(|| {
            RoutingError::InvalidRoutePartHandler {
                part: name.to_string(),
                handler: handler.clone(),
            }
        })?;
        return Ok(RoutePartKind::Custom {
            handler: handler.clone(),
            implementation,
        });
    }
    if let Some(object_type) = &configuration.object_type {
        return Ok(RoutePartKind::Identity {
            object_type: object_type.clone(),
            uri_pattern: configuration.uri_pattern.clone(),
            mapper: route.context.identities.clone(),
        });
    }
    Ok(RoutePartKind::Dynamic)
}
