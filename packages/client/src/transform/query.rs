//! Query serialization and URL templating

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::http::{Query, RequestDescriptor};

static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z\d+\-.]*:)?//").unwrap_or_else(|_| unreachable!())
});

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\w+\}").unwrap_or_else(|_| unreachable!()));

/// Percent-encode a query component, then restore the characters that stay
/// readable in a query string (`:`, `$`, `,`, `[`, `]`, and space as `+`).
#[must_use]
pub fn encode(input: &str) -> String {
    urlencoding::encode(input)
        .replace("%3A", ":")
        .replace("%24", "$")
        .replace("%2C", ",")
        .replace("%20", "+")
        .replace("%5B", "[")
        .replace("%5D", "]")
}

#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_URL.is_match(url)
}

/// Flatten one value into raw key/value pairs. Objects extend the key with a
/// `[field]` segment, arrays repeat the key, nulls are dropped.
fn flatten_value(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten_value(key, item, out);
            }
        }
        Value::Object(map) => {
            for (field, item) in map {
                flatten_value(&format!("{key}[{field}]"), item, out);
            }
        }
        Value::String(s) => out.push((key.to_string(), s.clone())),
        Value::Bool(_) | Value::Number(_) => out.push((key.to_string(), value.to_string())),
    }
}

/// Flattened, unencoded pairs for `entries` in source order.
pub fn flatten_pairs<'a, I>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut out = Vec::new();
    for (key, value) in entries {
        flatten_value(key, value, &mut out);
    }
    out
}

/// Serialize key/value entries in source order, joined with `&`.
pub fn serialize_pairs<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    flatten_pairs(entries)
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Serialize a query without its leading `?`.
#[must_use]
pub fn serialize(query: &Query) -> String {
    match query {
        Query::Raw(raw) => raw.trim_start_matches('?').to_string(),
        Query::Structured(map) => serialize_pairs(map.iter().map(|(k, v)| (k.as_str(), v))),
        Query::Pairs(pairs) => serialize_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v))),
    }
}

/// Append a serialized query, using `&` when the URL already carries one.
#[must_use]
pub fn append_query(url: &str, serialized: &str) -> String {
    if serialized.is_empty() {
        return url.to_string();
    }
    if url.contains('?') {
        let joiner = if url.ends_with('?') || url.ends_with('&') { "" } else { "&" };
        format!("{url}{joiner}{serialized}")
    } else {
        format!("{url}?{serialized}")
    }
}

/// Substitute `{name}` placeholders left to right from `values`. Placeholders
/// without a value are left in place; the text after the last one is kept
/// verbatim.
#[must_use]
pub fn expand_path(template: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut last = 0;
    for placeholder in PLACEHOLDER.find_iter(template) {
        out.push_str(&template[last..placeholder.start()]);
        match values.next() {
            Some(value) => out.push_str(value),
            None => out.push_str(placeholder.as_str()),
        }
        last = placeholder.end();
    }
    out.push_str(&template[last..]);
    out
}

/// Relative URLs get one leading slash, no trailing slash and no whitespace.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    if is_absolute_url(url) {
        return url.to_string();
    }
    let compact: String = url.chars().filter(|c| !c.is_whitespace()).collect();
    let trimmed = compact.trim_matches('/');
    format!("/{trimmed}")
}

/// Final request URL: normalised, templated, then with the query appended.
#[must_use]
pub fn resolve_url(request: &RequestDescriptor) -> String {
    let mut url = normalize_url(&request.url);
    if let Some(values) = &request.path_params {
        url = expand_path(&url, values);
    }
    if let Some(query) = &request.query {
        url = append_query(&url, &serialize(query));
    }
    url
}
