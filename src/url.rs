//! URL value object.
//!
//! A thin wrapper over [`url::Url`] that keeps the query string as a
//! mutable [`Values`] map. The raw input is unescaped once on
//! construction and the query is re-escaped on serialization, so an
//! already-escaped input round-trips.

use std::fmt;

use crate::values::Values;

/// A parsed URL with query parameters exposed as a [`Values`] map.
#[derive(Debug, Clone)]
pub struct Url {
    inner: ::url::Url,
    query: Values,
}

impl Url {
    /// Parse `raw`, unescaping it once first.
    pub fn parse(raw: &str) -> anyhow::Result<Url> {
        let unescaped = urlencoding::decode(raw)?;
        let inner = ::url::Url::parse(&unescaped)?;
        let query = Values::parse_query(inner.query().unwrap_or(""));
        Ok(Url { inner, query })
    }

    /// First query value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query.get(key)
    }

    /// Append a query value under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.add(key, value);
    }

    /// Replace all query values under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.set(key, value);
    }

    /// Remove `key` from the query.
    pub fn del(&mut self, key: &str) {
        self.query.del(key);
    }

    pub fn query(&self) -> &Values {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Values {
        &mut self.query
    }

    /// Append path segments to the URL path.
    ///
    /// Has no effect on URLs that cannot be a base (e.g. `mailto:`).
    pub fn join_path(&mut self, segments: &[&str]) {
        if let Ok(mut path) = self.inner.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
    }

    pub fn as_url(&self) -> &::url::Url {
        &self.inner
    }

    /// The underlying [`url::Url`] with the current query applied.
    pub fn into_inner(self) -> ::url::Url {
        let mut inner = self.inner;
        apply_query(&mut inner, &self.query);
        inner
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut inner = self.inner.clone();
        apply_query(&mut inner, &self.query);
        write!(f, "{inner}")
    }
}

fn apply_query(url: &mut ::url::Url, query: &Values) {
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&query.encode()));
    }
}

/// Escape `s` for use inside a query string.
pub fn url_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Unescape `s`, returning it unchanged when it is not valid
/// percent-encoding.
pub fn url_decode(s: &str) -> String {
    match urlencoding::decode(s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s.to_string(),
    }
}
