//! Route parts: the segments a URI pattern compiles into.
//!
//! A part either consumes a prefix of the remaining request path (matching) or
//! produces its slice of an outgoing URI from route values (resolving).
//!
//! | Kind | Matching | Resolving |
//! |------|----------|-----------|
//! | `Static` | literal prefix | its own text |
//! | `Dynamic` | text up to the split string, percent-decoded | string/integer value, percent-encoded |
//! | `Identity` | path segment → `{"__identity": id}` | `__identity` → path segment |
//! | `Custom` | registered [`RoutePartHandler`] | registered [`RoutePartHandler`] |

use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::registry::IdentityMapper;
use crate::values::{self, RouteValues};

/// Custom logic for a dynamic route part.
///
/// The route still decides *where* the part's segment ends (up to the split
/// string, never across a `/`); the handler only decides what the segment means.
pub trait RoutePartHandler: Send + Sync + fmt::Debug {
    /// Turns the raw (still percent-encoded) path segment into a route value,
    /// or `None` if this part does not accept it.
    fn match_value(&self, part: &RoutePart, segment: &str) -> Option<Value>;

    /// Turns the route value addressed by the part into URI text, or `None` if it
    /// cannot be represented. The text is used verbatim, so encode it.
    fn resolve_value(&self, part: &RoutePart, value: &Value) -> Option<String>;
}

/// The closed set of part variants.
#[derive(Debug, Clone)]
pub enum RoutePartKind {
    Static,
    Dynamic,
    Identity {
        object_type: String,
        uri_pattern: Option<String>,
        mapper: Arc<dyn IdentityMapper>,
    },
    Custom {
        handler: String,
        implementation: Arc<dyn RoutePartHandler>,
    },
}

/// Successful match of one part against the start of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PartMatch {
    /// `None` for parts that carry no value (static text).
    pub value: Option<Value>,
    /// Bytes of the path this part consumed.
    pub consumed: usize,
}

/// One compiled segment of a route pattern.
#[derive(Debug, Clone)]
pub struct RoutePart {
    pub(crate) name: String,
    pub(crate) kind: RoutePartKind,
    pub(crate) optional: bool,
    pub(crate) lower_case: bool,
    pub(crate) default_value: Option<Value>,
    pub(crate) options: RouteValues,
    pub(crate) split_string: String,
}

impl RoutePart {
    pub(crate) fn new(name: impl Into<String>, kind: RoutePartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            lower_case: true,
            default_value: None,
            options: RouteValues::new(),
            split_string: String::new(),
        }
    }

    /// Static text, or the (possibly dotted) value path of a dynamic part.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RoutePartKind {
        &self.kind
    }

    pub fn is_dynamic(&self) -> bool {
        !matches!(self.kind, RoutePartKind::Static)
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn lower_case(&self) -> bool {
        self.lower_case
    }

    pub fn options(&self) -> &RouteValues {
        &self.options
    }

    /// Static text following this part in the pattern; empty if none.
    pub fn split_string(&self) -> &str {
        &self.split_string
    }

    /// Configured default of a dynamic part.
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Static parts always count as having a default: their own text.
    pub fn has_default_value(&self) -> bool {
        matches!(self.kind, RoutePartKind::Static) || self.default_value.is_some()
    }

    /// Default as URI text. `Err` carries a description of a default that is
    /// neither a string nor an integer.
    pub(crate) fn default_text(&self) -> Result<Option<Cow<'_, str>>, String> {
        match (&self.kind, &self.default_value) {
            (RoutePartKind::Static, _) => Ok(Some(self.static_text())),
            (_, None) => Ok(None),
            (_, Some(Value::String(s))) => Ok(Some(Cow::Borrowed(s))),
            (_, Some(Value::Number(n))) if n.is_i64() || n.is_u64() => Ok(Some(Cow::Owned(n.to_string()))),
            (_, Some(other)) => Err(format!("default value must be a string or integer, got {}", other)),
        }
    }

    fn static_text(&self) -> Cow<'_, str> {
        if self.lower_case {
            Cow::Owned(self.name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    /// The slice of `route_path` a dynamic part would look at: everything up to the
    /// split string (or the whole path), and nothing if that would span a `/`.
    pub fn value_to_match<'p>(&self, route_path: &'p str) -> &'p str {
        if route_path.is_empty() || route_path.starts_with('/') {
            return "";
        }
        let mut candidate = route_path;
        if !self.split_string.is_empty() {
            if let Some(position) = candidate.find(self.split_string.as_str()) {
                candidate = &candidate[..position];
            }
        }
        if candidate.contains('/') {
            return "";
        }
        candidate
    }

    /// Try to consume a prefix of `route_path`.
    pub fn match_path(&self, route_path: &str) -> Option<PartMatch> {
        if self.name.is_empty() {
            return None;
        }
        if let RoutePartKind::Static = self.kind {
            let candidate = route_path.get(..self.name.len())?;
            let same = if self.lower_case {
                candidate.eq_ignore_ascii_case(&self.name)
            } else {
                candidate == self.name
            };
            return same.then(|| PartMatch {
                value: None,
                consumed: self.name.len(),
            });
        }

        let segment = self.value_to_match(route_path);
        if segment.is_empty() {
            return None;
        }
        let value = match &self.kind {
            RoutePartKind::Static => return None,
            RoutePartKind::Dynamic => Value::String(decode_segment(segment)?),
            RoutePartKind::Identity {
                object_type,
                mapper,
                ..
            } => {
                let path_segment = decode_segment(segment)?;
                let identifier = mapper.identifier_for_path_segment(object_type, &path_segment)?;
                json!({ "__identity": identifier })
            }
            RoutePartKind::Custom { implementation, .. } => {
                implementation.match_value(self, segment)?
            }
        };
        Some(PartMatch {
            value: Some(value),
            consumed: segment.len(),
        })
    }

    /// Produce this part's URI text from `values`, consuming the value it used.
    ///
    /// Returns `None` if the part cannot be resolved or its value is `""`;
    /// `values` is left untouched then.
    pub fn resolve(&self, values: &mut RouteValues) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }
        let value = match self.kind {
            RoutePartKind::Static => return Some(self.static_text().into_owned()),
            _ => values::get_path(values, &self.name)?,
        };
        // An empty value cannot be matched back, so the part falls back to its default.
        if value.as_str() == Some("") {
            return None;
        }
        let resolved = match &self.kind {
            RoutePartKind::Static => return None,
            RoutePartKind::Dynamic => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
                    _ => return None,
                };
                encode_segment(&text, self.lower_case)
            }
            RoutePartKind::Identity {
                object_type,
                uri_pattern,
                mapper,
            } => {
                let identifier = match value {
                    Value::String(s) => s.as_str(),
                    Value::Object(object) => object.get("__identity")?.as_str()?,
                    _ => return None,
                };
                let path_segment = mapper.path_segment_for_identifier(
                    object_type,
                    uri_pattern.as_deref(),
                    identifier,
                )?;
                encode_segment(&path_segment, self.lower_case)
            }
            RoutePartKind::Custom { implementation, .. } => {
                implementation.resolve_value(self, value)?
            }
        };
        values::unset_path(values, &self.name);
        Some(resolved)
    }
}

/// Percent-encode URI text the way resolved dynamic parts are written, lowercasing first if asked.
pub fn encode_segment(text: &str, lower_case: bool) -> String {
    if lower_case {
        urlencoding::encode(&text.to_ascii_lowercase()).into_owned()
    } else {
        urlencoding::encode(text).into_owned()
    }
}

fn decode_segment(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryIdentityMapper;

    fn dynamic(name: &str) -> RoutePart {
        RoutePart::new(name, RoutePartKind::Dynamic)
    }

    fn values(value: Value) -> RouteValues {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_static_part_consumes_its_text() {
        let part = RoutePart::new("blog", RoutePartKind::Static);
        assert_eq!(
            part.match_path("blog/post"),
            Some(PartMatch {
                value: None,
                consumed: 4
            })
        );
        assert_eq!(part.match_path("bl"), None);
        assert_eq!(part.match_path(""), None);
    }

    #[test]
    fn test_static_part_case_sensitivity_follows_lower_case() {
        let mut part = RoutePart::new("Blog", RoutePartKind::Static);
        assert!(part.match_path("blog").is_some());
        part.lower_case = false;
        assert!(part.match_path("blog").is_none());
        assert!(part.match_path("Blog").is_some());
    }

    #[test]
    fn test_dynamic_part_stops_at_split_string() {
        let mut part = dynamic("@action");
        part.split_string = ".".to_string();
        let matched = part.match_path("show.json").unwrap();
        assert_eq!(matched.value, Some(json!("show")));
        assert_eq!(matched.consumed, 4);
    }

    #[test]
    fn test_dynamic_part_never_spans_slash() {
        let part = dynamic("@controller");
        assert_eq!(part.match_path("foo/bar"), None);
        assert_eq!(part.match_path("/foo"), None);
        assert_eq!(part.match_path(""), None);
    }

    #[test]
    fn test_dynamic_part_decodes_value() {
        let part = dynamic("tag");
        assert_eq!(
            part.match_path("hello%20world").unwrap().value,
            Some(json!("hello world"))
        );
    }

    #[test]
    fn test_dynamic_part_resolves_and_consumes_nested_value() {
        let part = dynamic("post.title");
        let mut route_values = values(json!({"post": {"title": "Hello World", "id": "1"}}));
        assert_eq!(part.resolve(&mut route_values), Some("hello%20world".to_string()));
        assert_eq!(Value::Object(route_values), json!({"post": {"id": "1"}}));
    }

    #[test]
    fn test_dynamic_part_rejects_non_scalar_value() {
        let part = dynamic("page");
        let mut route_values = values(json!({"page": ["1"]}));
        assert_eq!(part.resolve(&mut route_values), None);
        assert!(route_values.contains_key("page"));

        let mut route_values = values(json!({"page": 3}));
        assert_eq!(part.resolve(&mut route_values), Some("3".to_string()));
    }

    #[test]
    fn test_identity_part_maps_both_ways() {
        let mapper = InMemoryIdentityMapper::new().with_mapping("Post", "hello-world", "uuid-1");
        let part = RoutePart::new(
            "post",
            RoutePartKind::Identity {
                object_type: "Post".to_string(),
                uri_pattern: None,
                mapper: Arc::new(mapper),
            },
        );
        assert_eq!(
            part.match_path("hello-world").unwrap().value,
            Some(json!({"__identity": "uuid-1"}))
        );
        assert_eq!(part.match_path("unknown"), None);

        let mut route_values = values(json!({"post": {"__identity": "uuid-1"}}));
        assert_eq!(part.resolve(&mut route_values), Some("hello-world".to_string()));
        assert!(route_values.is_empty());
    }

    #[derive(Debug)]
    struct YearHandler;

    impl RoutePartHandler for YearHandler {
        fn match_value(&self, _part: &RoutePart, segment: &str) -> Option<Value> {
            (segment.len() == 4 && segment.bytes().all(|b| b.is_ascii_digit()))
                .then(|| json!(segment))
        }

        fn resolve_value(&self, _part: &RoutePart, value: &Value) -> Option<String> {
            values::scalar_text(value).filter(|s| s.len() == 4)
        }
    }

    #[test]
    fn test_custom_part_delegates_to_handler() {
        let part = RoutePart::new(
            "year",
            RoutePartKind::Custom {
                handler: "year".to_string(),
                implementation: Arc::new(YearHandler),
            },
        );
        assert!(part.match_path("2024").is_some());
        assert!(part.match_path("24").is_none());
        let mut route_values = values(json!({"year": 1999}));
        assert_eq!(part.resolve(&mut route_values), Some("1999".to_string()));
    }

    #[test]
    fn test_default_text() {
        let mut part = RoutePart::new("Feed", RoutePartKind::Static);
        assert_eq!(part.default_text().unwrap().as_deref(), Some("feed"));
        part = dynamic("@format");
        assert_eq!(part.default_text().unwrap(), None);
        part.default_value = Some(json!("html"));
        assert_eq!(part.default_text().unwrap().as_deref(), Some("html"));
        part.default_value = Some(json!(1));
        assert_eq!(part.default_text().unwrap().as_deref(), Some("1"));
        part.default_value = Some(json!(true));
        assert!(part.default_text().is_err());
    }
}
