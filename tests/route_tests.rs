use patternrouter::config::{RouteConfiguration, RoutePartConfiguration};
use patternrouter::error::{PatternViolation, RoutingError};
use patternrouter::registry::{ControllerRegistry, InMemoryIdentityMapper, RoutePartHandlers, RoutingContext};
use patternrouter::request::RoutingRequest;
use patternrouter::route::{Route, RoutePart, RoutePartHandler};
use patternrouter::values::RouteValues;
use serde_json::{json, Value};
use std::sync::Arc;

mod common;
use common::routes::values;

fn route(pattern: &str, defaults: Value) -> Route {
    let mut route = Route::new();
    route.set_uri_pattern(pattern);
    route.set_defaults(values(defaults));
    route
}

fn matched(route: &Route, path: &str) -> Option<Value> {
    route
        .matches(&RoutingRequest::get(path))
        .unwrap()
        .map(Value::Object)
}

fn resolved(route: &Route, route_values: Value) -> Option<String> {
    route.resolves(&values(route_values)).unwrap()
}

#[test]
fn test_match_and_resolve_are_inverse() {
    let route = route("{'@controller'}/{'@action'}", json!({}));
    let result = matched(&route, "standard/index").unwrap();
    assert_eq!(result, json!({"@controller": "standard", "@action": "index"}));
    assert_eq!(resolved(&route, result), Some("standard/index".to_string()));
}

#[test]
fn test_optional_section_is_all_or_nothing() {
    let route = route("{'@controller'}(/{'@action'})", json!({"@action": "index"}));
    assert_eq!(
        resolved(&route, json!({"@controller": "foo", "@action": "index"})),
        Some("foo".to_string())
    );
    assert_eq!(
        resolved(&route, json!({"@controller": "foo", "@action": "show"})),
        Some("foo/show".to_string())
    );
    assert_eq!(
        resolved(&route, json!({"@controller": "foo"})),
        Some("foo".to_string())
    );

    assert_eq!(
        matched(&route, "foo").unwrap(),
        json!({"@controller": "foo", "@action": "index"})
    );
    assert_eq!(
        matched(&route, "foo/show").unwrap(),
        json!({"@controller": "foo", "@action": "show"})
    );
}

#[test]
fn test_optional_section_without_default_must_be_present() {
    let route = route("{@controller}(/{@action})", json!({}));
    assert_eq!(matched(&route, "foo"), None);
    assert!(matched(&route, "foo/bar").is_some());
}

#[test]
fn test_optional_format_suffix() {
    let route = route("{@controller}(.{@format})", json!({"@format": "html"}));
    assert_eq!(
        matched(&route, "foo.json").unwrap(),
        json!({"@controller": "foo", "@format": "json"})
    );
    assert_eq!(
        matched(&route, "foo").unwrap(),
        json!({"@controller": "foo", "@format": "html"})
    );
    assert_eq!(resolved(&route, json!({"@controller": "foo"})), Some("foo".to_string()));
    assert_eq!(
        resolved(&route, json!({"@controller": "foo", "@format": "json"})),
        Some("foo.json".to_string())
    );
}

#[test]
fn test_slashes_at_pattern_edges_are_rejected() {
    for (pattern, expected) in [
        ("foo/", PatternViolation::TrailingSlash),
        ("/foo", PatternViolation::LeadingSlash),
    ] {
        let mut route = route(pattern, json!({}));
        route.set_append_exceeding_arguments(true);
        route.set_lower_case(false);
        match route.parse() {
            Err(RoutingError::InvalidUriPattern { violation, .. }) => assert_eq!(violation, expected),
            other => panic!("expected invalid pattern for {pattern:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_unbalanced_optional_sections_are_rejected() {
    for pattern in ["foo(/bar", "foo)/bar"] {
        let mut route = route(pattern, json!({}));
        assert!(matches!(
            route.parse(),
            Err(RoutingError::InvalidUriPattern { .. })
        ));
    }
}

#[test]
fn test_unparsable_pattern_fails_match_with_error() {
    let route = route("foo/", json!({}));
    assert!(route.matches(&RoutingRequest::get("foo")).is_err());
}

#[test]
fn test_http_method_restriction() {
    let mut configuration = RouteConfiguration::new("foo");
    configuration.http_methods = Some(vec!["post".to_string()]);
    let route = Route::from_configuration(&configuration, RoutingContext::default()).unwrap();
    assert!(route.has_http_method_constraints());
    assert_eq!(route.matches(&RoutingRequest::get("foo")).unwrap(), None);
    assert!(route.matches(&RoutingRequest::post("foo")).unwrap().is_some());
}

#[test]
fn test_route_matches_http_request() {
    let route = route("blog/{post}", json!({}));
    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri("https://example.com/blog/hello?page=2")
        .body(())
        .unwrap();
    assert_eq!(
        route.matches(&request).unwrap().map(Value::Object),
        Some(json!({"post": "hello"}))
    );
}

#[test]
fn test_exceeding_arguments_policy() {
    let mut route = route("{@controller}", json!({}));
    let arguments = json!({"@controller": "foo", "page": "2"});
    assert_eq!(resolved(&route, arguments.clone()), None);

    route.set_append_exceeding_arguments(true);
    assert_eq!(resolved(&route, arguments), Some("foo?page=2".to_string()));
}

#[test]
fn test_internal_arguments_are_always_appended() {
    let route = route("{@controller}", json!({}));
    assert_eq!(
        resolved(&route, json!({"@controller": "foo", "__referrer": {"@action": "list"}})),
        Some("foo?__referrer%5B%40action%5D=list".to_string())
    );
}

#[test]
fn test_empty_exceeding_values_are_dropped() {
    let route = route("{@controller}", json!({}));
    assert_eq!(
        resolved(&route, json!({"@controller": "foo", "@format": "", "filter": {"tags": []}})),
        Some("foo".to_string())
    );
}

#[test]
fn test_whole_path_must_be_consumed() {
    let route = route("foo", json!({}));
    assert_eq!(matched(&route, "foo/bar"), None);
    assert_eq!(matched(&route, "/foo/"), Some(json!({})));
}

#[test]
fn test_empty_pattern_matches_empty_path() {
    let route = route("", json!({"@controller": "Standard"}));
    assert_eq!(matched(&route, "/"), Some(json!({"@controller": "Standard"})));
    assert_eq!(matched(&route, "foo"), None);
    assert_eq!(
        resolved(&route, json!({"@controller": "standard"})),
        Some(String::new())
    );
}

#[test]
fn test_unset_route_matches_nothing() {
    let route = Route::new();
    assert_eq!(route.matches(&RoutingRequest::get("")).unwrap(), None);
    assert_eq!(route.resolves(&RouteValues::new()).unwrap(), None);
}

#[test]
fn test_missing_required_value_fails_resolve() {
    let route = route("{@controller}/{@action}", json!({}));
    assert_eq!(resolved(&route, json!({"@controller": "foo"})), None);
}

#[test]
fn test_defaults_must_agree_with_values() {
    let route = route("blog", json!({"@controller": "Blog"}));
    assert_eq!(resolved(&route, json!({"@controller": "blog"})), Some("blog".to_string()));
    assert_eq!(resolved(&route, json!({"@controller": "news"})), None);
    assert_eq!(resolved(&route, json!({})), None);
}

#[test]
fn test_tolerated_missing_defaults() {
    let tolerant = route("{@controller}", json!({"@format": "HTML", "@subpackage": ""}));
    assert_eq!(resolved(&tolerant, json!({"@controller": "x"})), Some("x".to_string()));

    let strict = route("{@controller}", json!({"@format": "json"}));
    assert_eq!(resolved(&strict, json!({"@controller": "x"})), None);
}

#[test]
fn test_values_are_percent_encoded_and_decoded() {
    let mut route = route("tag/{name}", json!({}));
    assert_eq!(
        matched(&route, "tag/hello%20world"),
        Some(json!({"name": "hello world"}))
    );
    assert_eq!(
        resolved(&route, json!({"name": "Hello World"})),
        Some("tag/hello%20world".to_string())
    );
    route.set_lower_case(false);
    assert_eq!(
        resolved(&route, json!({"name": "Hello World"})),
        Some("tag/Hello%20World".to_string())
    );
}

#[test]
fn test_nested_part_names() {
    let route = route("posts/{post.title}", json!({"post.type": "news"}));
    assert_eq!(
        matched(&route, "posts/hello"),
        Some(json!({"post": {"title": "hello", "type": "news"}}))
    );
    assert_eq!(
        resolved(&route, json!({"post": {"title": "Hello", "type": "news"}})),
        Some("posts/hello".to_string())
    );
}

#[test]
fn test_identity_parts() {
    let identities = InMemoryIdentityMapper::new().with_mapping("Post", "hello-world", "uuid-1");
    let context = RoutingContext::default().with_identities(Arc::new(identities));
    let mut configuration = RouteConfiguration::new("blog/{post}");
    configuration.route_parts.insert(
        "post".to_string(),
        RoutePartConfiguration {
            object_type: Some("Post".to_string()),
            ..Default::default()
        },
    );
    let route = Route::from_configuration(&configuration, context).unwrap();

    assert_eq!(
        matched(&route, "blog/hello-world"),
        Some(json!({"post": {"__identity": "uuid-1"}}))
    );
    assert_eq!(matched(&route, "blog/unknown"), None);
    assert_eq!(
        resolved(&route, json!({"post": {"__identity": "uuid-1"}})),
        Some("blog/hello-world".to_string())
    );
    assert_eq!(
        resolved(&route, json!({"post": "uuid-1"})),
        Some("blog/hello-world".to_string())
    );
}

#[derive(Debug)]
struct BrokenHandler;

impl RoutePartHandler for BrokenHandler {
    fn match_value(&self, _part: &RoutePart, _segment: &str) -> Option<Value> {
        Some(json!({"broken": null}))
    }

    fn resolve_value(&self, _part: &RoutePart, _value: &Value) -> Option<String> {
        None
    }
}

#[test]
fn test_custom_part_with_unusable_value_is_an_error() {
    let handlers = RoutePartHandlers::new().with_handler("broken", Arc::new(BrokenHandler));
    let context = RoutingContext::default().with_handlers(handlers);
    let mut configuration = RouteConfiguration::new("{thing}");
    configuration.route_parts.insert(
        "thing".to_string(),
        RoutePartConfiguration {
            handler: Some("broken".to_string()),
            ..Default::default()
        },
    );
    let route = Route::from_configuration(&configuration, context).unwrap();
    assert!(matches!(
        route.matches(&RoutingRequest::get("anything")),
        Err(RoutingError::InvalidRoutePartValue { .. })
    ));
    assert_eq!(resolved(&route, json!({"thing": "x"})), None);
}

#[test]
fn test_unknown_controller_is_an_error() {
    let controllers = ControllerRegistry::new().with_controller("Acme.Blog", "", "Post", "PostController");
    let context = RoutingContext::default().with_controllers(Arc::new(controllers));
    let mut configuration = RouteConfiguration::new("{@controller}");
    configuration.defaults = values(json!({"@package": "Acme.Blog"}));
    let route = Route::from_configuration(&configuration, context).unwrap();

    assert_eq!(
        resolved(&route, json!({"@package": "acme.blog", "@controller": "post"})),
        Some("post".to_string())
    );
    assert_eq!(
        route.resolves(&values(json!({"@package": "Acme.Blog", "@controller": "Comment"}))),
        Err(RoutingError::ControllerNotFound {
            package: "Acme.Blog".to_string(),
            subpackage: String::new(),
            controller: "Comment".to_string(),
        })
    );
}

#[test]
fn test_routes_without_controller_skip_controller_check() {
    let controllers = ControllerRegistry::new().with_controller("Acme.Blog", "", "Post", "PostController");
    let context = RoutingContext::default().with_controllers(Arc::new(controllers));
    let route = Route::from_configuration(&RouteConfiguration::new("about"), context).unwrap();
    assert_eq!(route.resolves(&RouteValues::new()), Ok(Some("about".to_string())));
}

#[test]
fn test_empty_format_falls_back_to_default() {
    let route = route("{@controller}(.{@format})", json!({"@format": "html"}));
    let uri = resolved(&route, json!({"@controller": "foo", "@format": ""})).unwrap();
    assert_eq!(uri, "foo");
    assert_eq!(
        matched(&route, &uri),
        Some(json!({"@controller": "foo", "@format": "html"}))
    );
}

#[test]
fn test_empty_required_value_fails_resolve() {
    let route = route("{@controller}/{@action}", json!({}));
    assert_eq!(resolved(&route, json!({"@controller": "foo", "@action": ""})), None);
}

#[test]
fn test_unusable_default_fails_resolve_with_error() {
    let route = route("{@controller}(/{@action})", json!({"@action": true}));
    assert!(matches!(
        route.resolves(&values(json!({"@controller": "foo"}))),
        Err(RoutingError::InvalidRoutePartValue { .. })
    ));
}
