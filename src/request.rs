//! Incoming HTTP request type.

use std::collections::HashMap;
use std::convert::Infallible;

use bytes::Bytes;
use cookie::Cookie;
use http::HeaderMap;
use multer::Multipart;

/// An incoming HTTP request with its body fully buffered.
///
/// Handlers receive it by value. Everything a validator needs (path
/// parameters, query pairs, headers, cookies, form pairs, the raw body) is
/// reachable from here without touching hyper types.
pub struct Request {
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, body: Bytes, params: HashMap<String, String>) -> Self {
        Self {
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
            params,
        }
    }

    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/person/{person_id}`, `req.param("person_id")` on
    /// `/person/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decoded query-string pairs, in the order they appear.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|q| decode_pairs(q.as_bytes()))
            .unwrap_or_default()
    }

    /// Decoded `application/x-www-form-urlencoded` body pairs.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        decode_pairs(&self.body)
    }

    /// A `multipart/form-data` reader over the body, or `None` when the
    /// content type is not multipart or carries no boundary.
    pub fn multipart(&self) -> Option<Multipart<'static>> {
        let boundary = self
            .header("content-type")
            .and_then(|ct| multer::parse_boundary(ct).ok())?;
        let body = self.body.clone();
        let stream = futures::stream::once(async move { Ok::<_, Infallible>(body) });
        Some(Multipart::new(stream, boundary))
    }

    /// Looks up a cookie by name across every `Cookie` header.
    ///
    /// Malformed cookie fragments are skipped rather than failing the lookup.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == name)
            .map(|c| c.value().to_owned())
    }
}

fn decode_pairs(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
