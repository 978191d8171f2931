//! # Routing Errors
//!
//! Every failure the routing engine can raise is a variant of [`RoutingError`].
//! An ordinary non-match is never an error: [`Route::matches`](crate::route::Route::matches)
//! and [`Route::resolves`](crate::route::Route::resolves) return `Ok(None)` for that.
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | `InvalidUriPattern` | `Route::parse` | malformed pattern |
//! | `InvalidRoutePartHandler` | `Route::parse` | `handler` names no registered part handler |
//! | `InvalidRoutePartValue` | `matches` / `resolves` | a part produced an unusable value |
//! | `InvalidRouteSetup` | `RouteSet::build` | ambiguous `httpMethods` for one pattern |
//! | `InvalidHttpMethod` | `Route::from_configuration` | unparsable entry in `httpMethods` |
//! | `ControllerNotFound` | `resolves` | resolved values point at a missing controller |
//! | `NoMatchingRoute` | `Router::resolve` | no route can build a URI |

use std::fmt;
use thiserror::Error;

/// Why a URI pattern was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternViolation {
    LeadingSlash,
    /// A trailing slash can be made optional with `(/)` instead.
    TrailingSlash,
    SuccessiveOptionalSections,
    /// Two dynamic parts need static text between them to know where the first one ends.
    SuccessiveDynamicParts,
    UnopenedOptionalSection,
    UnterminatedOptionalSection,
}

impl fmt::Display for PatternViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatternViolation::LeadingSlash => "starts with a slash, which is not allowed",
            PatternViolation::TrailingSlash => {
                "ends with a slash, which is not allowed; put the trailing slash in brackets to make it optional"
            }
            PatternViolation::SuccessiveOptionalSections => {
                "contains successive optional sections, which is not allowed"
            }
            PatternViolation::SuccessiveDynamicParts => {
                "contains successive dynamic route parts, which is not allowed"
            }
            PatternViolation::UnopenedOptionalSection => "contains an unopened optional section",
            PatternViolation::UnterminatedOptionalSection => {
                "contains an unterminated optional section"
            }
        };
        write!(f, "{}", s)
    }
}

/// Errors raised while building, matching or resolving routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The URI pattern of a route is malformed.
    #[error("the URI pattern \"{pattern}\" of route \"{route}\" {violation}")]
    InvalidUriPattern {
        pattern: String,
        route: String,
        violation: PatternViolation,
    },

    /// A route part is configured with a handler that is not registered.
    #[error("route part \"{part}\" is configured with handler \"{handler}\", which is not a registered dynamic route part handler")]
    InvalidRoutePartHandler { part: String, handler: String },

    /// A route part produced a value the route cannot use.
    #[error("route part \"{part}\" of route \"{route}\" produced an invalid value: {reason}")]
    InvalidRoutePartValue {
        part: String,
        route: String,
        reason: String,
    },

    /// Two configuration entries share a pattern but disagree on HTTP method constraints.
    #[error("there are multiple routes with the uriPattern \"{uri_pattern}\" and only some of them set \"httpMethods\"; specify accepted HTTP methods for all of these, or adjust the uriPattern")]
    InvalidRouteSetup { uri_pattern: String },

    /// An `httpMethods` entry is not a valid HTTP method token.
    #[error("route \"{route}\" lists \"{method}\" in httpMethods, which is not a valid HTTP method")]
    InvalidHttpMethod { route: String, method: String },

    /// The values resolved by a route reference a controller that does not exist.
    #[error("no controller could be resolved for package \"{package}\", subpackage \"{subpackage}\", controller \"{controller}\"")]
    ControllerNotFound {
        package: String,
        subpackage: String,
        controller: String,
    },

    /// No configured route can build a URI for the given values.
    #[error("could not resolve a route and its corresponding URI for the given parameters")]
    NoMatchingRoute,
}

impl RoutingError {
    pub(crate) fn invalid_pattern(
        pattern: &str,
        route: Option<&str>,
        violation: PatternViolation,
    ) -> Self {
        RoutingError::InvalidUriPattern {
            pattern: pattern.to_string(),
            route: route.unwrap_or_default().to_string(),
            violation,
        }
    }

    pub(crate) fn invalid_value(part: &str, route: Option<&str>, reason: impl Into<String>) -> Self {
        RoutingError::InvalidRoutePartValue {
            part: part.to_string(),
            route: route.unwrap_or_default().to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by configuration rather than by request data.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RoutingError::InvalidUriPattern { .. }
                | RoutingError::InvalidRoutePartHandler { .. }
                | RoutingError::InvalidRouteSetup { .. }
                | RoutingError::InvalidHttpMethod { .. }
                | RoutingError::ControllerNotFound { .. }
        )
    }
}
