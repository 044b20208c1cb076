//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. The router is the
//! explicit dispatch table of the service: build it once at startup, hand it
//! to [`Server::serve`](crate::Server::serve), or drive it directly with
//! [`Router::handle`] in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use serde_json::json;
use tracing::{info, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

/// Outcome of a route lookup.
pub(crate) enum Route {
    Found(BoxedHandler, HashMap<String, String>),
    /// The path exists, but not under the requested method.
    MethodNotAllowed,
    /// The path matches once its trailing slash is added or removed.
    Redirect(String),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use persona::{Method, Request, Response, Router};
    /// # async fn show_person(_: Request) -> Response { Response::text("") }
    /// # async fn update_person(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/person/detail/{person_id}", show_person)
    ///     .on(Method::Put, "/person/{person_id}",        update_person);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route for
    /// the same method. Routes are registered at startup, so this surfaces
    /// as a boot failure rather than a request-time error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Finds the handler for `method` and `path`.
    ///
    /// `HEAD` falls back to the `GET` route for the same path. Captured
    /// parameters are percent-decoded.
    pub(crate) fn lookup(&self, method: Method, path: &str) -> Route {
        let fallback = (method == Method::Head).then_some(Method::Get);
        for m in std::iter::once(method).chain(fallback) {
            if let Some(matched) = self.routes.get(&m).and_then(|tree| tree.at(path).ok()) {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
                    .collect();
                return Route::Found(Arc::clone(matched.value), params);
            }
        }

        if self.matches_any(path) {
            return Route::MethodNotAllowed;
        }
        match toggle_trailing_slash(path) {
            Some(alternate) if self.matches_any(&alternate) => Route::Redirect(alternate),
            _ => Route::NotFound,
        }
    }

    fn matches_any(&self, path: &str) -> bool {
        self.routes.values().any(|tree| tree.at(path).is_ok())
    }

    /// Routes one request and produces one response.
    ///
    /// Generic over the body so the server can pass hyper's streaming body
    /// and tests can pass an in-memory `Full<Bytes>`. Every request is logged
    /// once at `info` with its status and latency.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: hyper::body::Body<Data = Bytes>,
        B::Error: std::fmt::Display,
    {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();

        let response = self.respond(parts, body).await;

        info!(
            %method,
            %path,
            status = response.status_code().as_u16(),
            latency_us = started.elapsed().as_micros() as u64,
            "request"
        );
        response.into_inner()
    }

    async fn respond<B>(&self, parts: http::request::Parts, body: B) -> Response
    where
        B: hyper::body::Body<Data = Bytes>,
        B::Error: std::fmt::Display,
    {
        let Ok(method) = Method::try_from(&parts.method) else {
            return detail(Status::MethodNotAllowed, "Method Not Allowed");
        };

        let (handler, params) = match self.lookup(method, parts.uri.path()) {
            Route::Found(handler, params) => (handler, params),
            Route::MethodNotAllowed => return detail(Status::MethodNotAllowed, "Method Not Allowed"),
            Route::Redirect(path) => return redirect(path, parts.uri.query()),
            Route::NotFound => return detail(Status::NotFound, "Not Found"),
        };

        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!("failed to read request body: {e}");
                return detail(Status::BadRequest, "could not read request body");
            }
        };

        let response = handler.call(Request::new(parts, body, params)).await;
        if method == Method::Head { response.without_body() } else { response }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn detail(status: Status, message: &str) -> Response {
    Response::builder().status(status).json(&json!({ "detail": message }))
}

/// `307` to `path`, keeping the query string.
fn redirect(path: String, query: Option<&str>) -> Response {
    let location = match query {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    Response::builder()
        .status(Status::TemporaryRedirect)
        .header("location", &location)
        .no_body()
}

/// `/a` to `/a/` and back. The root has no alternate.
fn toggle_trailing_slash(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    Some(match path.strip_suffix('/') {
        Some(trimmed) => trimmed.to_owned(),
        None => format!("{path}/"),
    })
}
