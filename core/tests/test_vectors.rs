//! Verify pattern matching and parameter precedence against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector names its inputs and the exact parameter map expected.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use pretender_core::params;
use pretender_core::{HttpMethod, HttpRequest, PathParams, PathPattern};
use serde_json::Value;

fn to_path_params(value: &Value) -> PathParams {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[test]
fn matching_test_vectors() {
    let raw = include_str!("../test-vectors/matching.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let pattern = PathPattern::parse(case["pattern"].as_str().unwrap()).unwrap();
        let bound = pattern.matches(case["path"].as_str().unwrap());

        match &case["params"] {
            Value::Null => assert!(bound.is_none(), "{name}: expected no match"),
            expected => {
                let bound = bound.unwrap_or_else(|| panic!("{name}: expected a match"));
                assert_eq!(bound, to_path_params(expected), "{name}: params");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Precedence
// ---------------------------------------------------------------------------

#[test]
fn precedence_test_vectors() {
    let raw = include_str!("../test-vectors/precedence.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method: HttpMethod = case["method"].as_str().unwrap().parse().unwrap();
        let mut request = HttpRequest::new(method, case["url"].as_str().unwrap());

        if let Some(body) = case.get("json_body") {
            request = request.with_json(body).unwrap();
        }
        if let Some(metadata) = case.get("metadata").and_then(Value::as_object) {
            for (key, value) in metadata {
                request = request.with_metadata(key.clone(), value.clone());
            }
        }

        let resolved = params::resolve(&to_path_params(&case["path_params"]), &request);
        let resolved = serde_json::to_value(&resolved).unwrap();
        assert_eq!(resolved, case["expected"], "{name}: parameters");
    }
}
