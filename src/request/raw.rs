use axum::http::{header::COOKIE, request::Parts};
use serde_json::Value;

use super::PickError;
use crate::config::Limits;

/// Raw, untrusted request data grouped by [`Source`](crate::Source).
///
/// Values are kept exactly as received; nothing here is validated beyond the body being
/// JSON. Header names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequest {
    path: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    body: Option<Value>,
}

impl RawRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect query, headers and cookies from request parts, and parse `body` as JSON.
    ///
    /// Header values that are not visible ASCII are skipped. An empty body means "no
    /// body". Path parameters are not part of `Parts`; add them with
    /// [`with_path_param`](Self::with_path_param).
    pub fn from_parts(parts: &Parts, body: &[u8], limits: &Limits) -> Result<Self, PickError> {
        let mut raw = Self::new();
        if let Some(query) = parts.uri.query() {
            raw = raw.with_query_string(query);
        }
        for (name, value) in &parts.headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            if *name == COOKIE {
                raw = raw.with_cookie_header(value);
            } else {
                raw = raw.with_header(name.as_str(), value);
            }
        }
        raw.with_json_body(body, limits)
    }

    #[must_use]
    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append every pair of an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query.extend(
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Append every `name=value` pair of a `Cookie` header value.
    #[must_use]
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        self.cookies.extend(header.split(';').filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let value = value.trim().trim_matches('"');
            Some((name.trim().to_string(), value.to_string()))
        }));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Parse `bytes` as the JSON body. Empty input leaves the request without a body.
    pub fn with_json_body(mut self, bytes: &[u8], limits: &Limits) -> Result<Self, PickError> {
        if bytes.len() > limits.max_body_bytes {
            return Err(PickError::BodyTooLarge {
                limit: limits.max_body_bytes,
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(self);
        }
        let body: Value = serde_json::from_slice(bytes).map_err(|e| PickError::InvalidBody {
            detail: e.to_string(),
        })?;
        if !body.is_object() {
            return Err(PickError::BodyNotObject);
        }
        self.body = Some(body);
        Ok(self)
    }

    pub fn path_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        lookup(&self.path, key)
    }

    pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        lookup(&self.query, key)
    }

    /// Values of the header `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn cookie_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        lookup(&self.cookies, name)
    }

    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Number of keys, across all sources and body levels, failing the key check.
    pub(crate) fn invalid_key_count(&self, max_key_length: usize) -> usize {
        let flat = [&self.path, &self.query, &self.headers, &self.cookies]
            .into_iter()
            .flatten()
            .filter(|(k, _)| !super::is_valid_key(k, max_key_length))
            .count();
        flat + self
            .body
            .as_ref()
            .map_or(0, |body| invalid_body_keys(body, max_key_length))
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn invalid_body_keys(value: &Value, max_key_length: usize) -> usize {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                usize::from(!super::is_valid_key(k, max_key_length))
                    + invalid_body_keys(v, max_key_length)
            })
            .sum(),
        Value::Array(items) => items
            .iter()
            .map(|v| invalid_body_keys(v, max_key_length))
            .sum(),
        _ => 0,
    }
}
