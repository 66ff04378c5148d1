//! Case-insensitive, insertion-ordered header container
//!
//! Keys are normalised to a single canonical casing (`content-type`,
//! `Content-Type` and `CONTENT-TYPE` all become `Content-Type`) on every
//! operation, so lookups never depend on how a caller spelled a name.

use std::fmt;

use http::{HeaderName, HeaderValue};
use thiserror::Error;

/// Content-Type presets shared by the header constructors and the body encoder.
pub mod content_type {
    pub const NAME: &str = "Content-Type";
    pub const JSON: &str = "application/json; charset=UTF-8";
    pub const TEXT: &str = "text/plain; charset=UTF-8";
    pub const FORM: &str = "application/x-www-form-urlencoded; charset=UTF-8";
    pub const FORM_DATA: &str = "multipart/form-data";
}

/// Normalise a header name: first letter and every letter after a `-` upper
/// case, everything else lower case.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.trim().chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Returns true if a content-type value selects JSON.
#[must_use]
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    #[must_use]
    pub fn new() -> Self {
        HeaderMap { entries: Vec::new() }
    }

    /// Build from any sequence of name/value pairs; later duplicates append.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            headers.append(k.as_ref(), v);
        }
        headers
    }

    /// Parse a raw `name: value` block separated by CRLF, the shape returned
    /// by XHR-style `getAllResponseHeaders`.
    #[must_use]
    pub fn parse_raw(raw: &str) -> Self {
        let mut headers = HeaderMap::new();
        for line in raw.split("\r\n").flat_map(|l| l.split('\n')) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.append(name, value.trim());
            }
        }
        headers
    }

    pub fn json() -> Self {
        Self::preset(content_type::JSON)
    }

    pub fn form() -> Self {
        Self::preset(content_type::FORM)
    }

    pub fn text() -> Self {
        Self::preset(content_type::TEXT)
    }

    pub fn form_data() -> Self {
        Self::preset(content_type::FORM_DATA)
    }

    fn preset(value: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.set(content_type::NAME, value);
        headers
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = canonical_name(name);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        let key = canonical_name(name);
        self.entries
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replace every value under `name` with a single one, keeping the
    /// position of the first existing entry.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_name(name);
        let value = value.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(first) => {
                self.entries[first].1 = value;
                let mut index = 0;
                self.entries.retain(|(k, _)| {
                    let keep = *k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries.push((canonical_name(name), value.into()));
    }

    pub fn has(&self, name: &str) -> bool {
        let key = canonical_name(name);
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Remove every value under `name`; returns whether anything was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        let key = canonical_name(name);
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        before != self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` over this map with `set` semantics.
    pub fn extend_from(&mut self, other: &HeaderMap) {
        let mut seen: Vec<&str> = Vec::new();
        for (k, v) in other.iter() {
            if seen.contains(&k) {
                self.append(k, v);
            } else {
                self.set(k, v);
                seen.push(k);
            }
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(content_type::NAME)
    }

    /// Convert into the `http` crate's map for transports that speak it.
    pub fn to_http(&self) -> Result<http::HeaderMap, HeaderError> {
        let mut out = http::HeaderMap::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| HeaderError::InvalidHeaderName { message: e.to_string() })?;
            let value = HeaderValue::from_str(v)?;
            out.append(name, value);
        }
        Ok(out)
    }
}

impl From<&http::HeaderMap> for HeaderMap {
    fn from(map: &http::HeaderMap) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in map {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        headers
    }
}

impl<K: AsRef<str>, V: Into<String>, const N: usize> From<[(K, V); N]> for HeaderMap {
    fn from(pairs: [(K, V); N]) -> Self {
        HeaderMap::from_pairs(pairs)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        HeaderMap::from_pairs(iter)
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Header-related errors.
#[derive(Debug, Clone, Error)]
pub enum HeaderError {
    #[error("Invalid header name: {message}")]
    InvalidHeaderName { message: String },
    /// Represents an error when a header value is invalid.
    #[error("Invalid header value: {message}")]
    InvalidHeaderValue {
        /// Error message describing the invalid header value
        message: String,
    },
}

impl From<http::header::InvalidHeaderValue> for HeaderError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        HeaderError::InvalidHeaderValue {
            message: err.to_string(),
        }
    }
}
