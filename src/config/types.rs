use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::values::RouteValues;

/// One routing rule as written in a routes file.
///
/// ```yaml
/// - name: 'Blog post'
///   uriPattern: 'blog/{post}(.{@format})'
///   defaults:
///     '@package': 'Acme.Blog'
///     '@controller': 'Post'
///     '@action': 'show'
///     '@format': 'html'
///   routeParts:
///     post:
///       objectType: 'Acme\Blog\Domain\Model\Post'
///   httpMethods: ['GET']
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub uri_pattern: String,
    #[serde(default, skip_serializing_if = "RouteValues::is_empty")]
    pub defaults: RouteValues,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub route_parts: HashMap<String, RoutePartConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_lower_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_exceeding_arguments: Option<bool>,
    /// `None` leaves the route unrestricted. Entries are method names such as `GET`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_methods: Option<Vec<String>>,
}

impl RouteConfiguration {
    pub fn new(uri_pattern: impl Into<String>) -> Self {
        Self {
            uri_pattern: uri_pattern.into(),
            ..Self::default()
        }
    }
}

/// Per-part options, keyed by part name inside [`RouteConfiguration::route_parts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePartConfiguration {
    /// Name of a handler registered in [`RoutePartHandlers`](crate::registry::RoutePartHandlers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    /// Turns the part into an identity part for objects of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "RouteValues::is_empty")]
    pub options: RouteValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_lower_case: Option<bool>,
}

/// Top-level shape of a routes file that wraps its list in a `routes` key.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RoutesDocument {
    #[serde(default)]
    pub routes: Vec<RouteConfiguration>,
}
