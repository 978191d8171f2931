//! Read-only view of an incoming request, as far as routing needs it.

use http::Method;

/// The two request properties routes match on.
///
/// `path` must already be relative to the application's base path; leading and
/// trailing slashes are ignored by the matcher.
pub trait RouteRequest {
    fn path(&self) -> &str;
    fn method(&self) -> &Method;
}

/// Owned request description, handy for tests and non-HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRequest {
    method: Method,
    path: String,
}

impl RoutingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }
}

impl RouteRequest for RoutingRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &Method {
        &self.method
    }
}

impl<B> RouteRequest for http::Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn method(&self) -> &Method {
        http::Request::method(self)
    }
}
