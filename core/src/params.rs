//! Parameter resolution for intercepted requests.
//!
//! Four sources feed one `ParameterMap`, applied in increasing precedence
//! so later sources overwrite earlier ones on key collision:
//!
//! 1. path parameters bound by the matched pattern (always strings)
//! 2. query string pairs (strings)
//! 3. the request body, for non-read-only methods: JSON object entries keep
//!    their JSON type, form pairs are strings
//! 4. out-of-band metadata attached by the caller (values as attached)

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::http::HttpRequest;
use crate::pattern::PathParams;

/// Merged request parameters handed to a route handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(Map<String, Value>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The value as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The value as an integer, if it is a JSON number that fits in `i64`.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    fn extend<K: Into<String>>(&mut self, entries: impl IntoIterator<Item = (K, Value)>) {
        for (key, value) in entries {
            self.0.insert(key.into(), value);
        }
    }
}

/// Renders as a JSON object.
impl fmt::Display for ParameterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// Merge every parameter source for `request` into one map.
pub fn resolve(path_params: &PathParams, request: &HttpRequest) -> ParameterMap {
    let mut params = ParameterMap::new();

    params.extend(
        path_params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone()))),
    );

    if let Some(query) = request.query() {
        params.extend(form_pairs(query.as_bytes()));
    }

    if !request.method.is_read_only() {
        if let Some(body) = request.body.as_deref().filter(|body| !body.is_empty()) {
            params.extend(body_params(request.header("content-type"), body));
        }
    }

    params.extend(
        request
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    params
}

fn form_pairs(input: &[u8]) -> Vec<(String, Value)> {
    url::form_urlencoded::parse(input)
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}

fn body_params(content_type: Option<&str>, body: &[u8]) -> Vec<(String, Value)> {
    let media_type = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());

    match media_type.as_deref() {
        Some("application/x-www-form-urlencoded") => form_pairs(body),
        Some(media) if media == "application/json" || media.ends_with("+json") => {
            json_object(body)
        }
        None => json_object(body),
        Some(_) => Vec::new(),
    }
}

fn json_object(body: &[u8]) -> Vec<(String, Value)> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => Vec::new(),
    }
}
