//! Verify raw response parsing against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector gives the transport's raw text and the expected trimmed raw,
//! header lines and content. The same vectors run through a dispatcher with
//! a canned transport so the full dispatch path is covered too.

use dispatch_core::{
    Dispatcher, OptionOverrides, Request, Response, Transport, TransportOutput,
};

struct Canned(String);

impl Transport for Canned {
    fn execute(&self, _request: &Request) -> TransportOutput {
        TransportOutput::ok(self.0.clone())
    }
}

fn strings(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn cases() -> Vec<serde_json::Value> {
    let raw = include_str!("../../test-vectors/parse.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn check(name: &str, response: &Response, case: &serde_json::Value) {
    assert_eq!(response.raw, case["expected_raw"].as_str().unwrap(), "{name}: raw");
    assert_eq!(response.headers, strings(&case["expected_headers"]), "{name}: headers");
    assert_eq!(response.content, case["expected_content"].as_str().unwrap(), "{name}: content");
    assert!(response.error.is_empty(), "{name}: error");
}

#[test]
fn parse_test_vectors() {
    for case in cases() {
        let name = case["name"].as_str().unwrap();
        let response = Response::from_raw(case["raw"].as_str().unwrap(), "");
        check(name, &response, &case);
    }
}

#[test]
fn dispatch_test_vectors() {
    for case in cases() {
        let name = case["name"].as_str().unwrap();
        let transport = Canned(case["raw"].as_str().unwrap().to_string());
        let response = Dispatcher::with_transport(transport)
            .dispatch("http://localhost:3000/", "GET", None, &[], &OptionOverrides::default())
            .unwrap();
        check(name, &response, &case);
    }
}
