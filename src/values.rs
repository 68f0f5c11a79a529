//! Multi-valued string map.
//!
//! [`Values`] is the shape produced by parsing form-encoded or
//! query-string data: a mapping from field name to an ordered list of
//! string values. It is the input to [`bind`](crate::bind), the output
//! of [`encode`](crate::encode), and the query container of
//! [`Url`](crate::url::Url).

use std::collections::hash_map;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A mapping from field name to an ordered list of string values.
///
/// The binder treats an explicitly present empty list the same as "no
/// value for this key".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values {
    inner: HashMap<String, Vec<String>>,
}

impl Values {
    pub fn new() -> Values {
        Values::default()
    }

    /// Parse a form-urlencoded query string (without the leading `?`).
    pub fn parse_query(query: &str) -> Values {
        let mut values = Values::new();
        for (key, value) in ::url::form_urlencoded::parse(query.as_bytes()) {
            values.add(key, value);
        }
        values
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Append a value under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replace all values under `key` with the single `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Remove `key` and all its values.
    pub fn del(&mut self, key: &str) {
        self.inner.remove(key);
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    /// Serialize to a form-urlencoded string.
    ///
    /// Keys are emitted in sorted order so the encoded form is
    /// deterministic; values keep their insertion order.
    pub fn encode(&self) -> String {
        let mut keys: Vec<&String> = self.inner.keys().collect();
        keys.sort();

        let mut serializer = ::url::form_urlencoded::Serializer::new(String::new());
        for key in keys {
            for value in &self.inner[key] {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    pub fn into_inner(self) -> HashMap<String, Vec<String>> {
        self.inner
    }
}

impl From<HashMap<String, Vec<String>>> for Values {
    fn from(inner: HashMap<String, Vec<String>>) -> Values {
        Values { inner }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Values {
        let mut values = Values::new();
        for (key, value) in iter {
            values.add(key, value);
        }
        values
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = hash_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_set_replaces() {
        let mut v = Values::new();
        v.add("k", "a");
        v.add("k", "b");
        assert_eq!(v.get_all("k"), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(v.get("k"), Some("a"));

        v.set("k", "c");
        assert_eq!(v.get_all("k"), Some(&["c".to_string()][..]));

        v.del("k");
        assert!(v.is_empty());
    }

    #[test]
    fn test_parse_query_round_trip() {
        let v = Values::parse_query("name=n1&age=10&tag=a&tag=b");
        assert_eq!(v.get("name"), Some("n1"));
        assert_eq!(v.get_all("tag"), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(v.encode(), "age=10&name=n1&tag=a&tag=b");
    }

    #[test]
    fn test_encode_escapes() {
        let mut v = Values::new();
        v.add("q", "a b&c");
        assert_eq!(v.encode(), "q=a+b%26c");
    }
}
