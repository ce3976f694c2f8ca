//! Request and response types that cross the transport boundary.
//!
//! # Design
//! These are plain data. `Dispatcher` validates caller input into a `Request`,
//! hands it to a `Transport`, and turns the transport's raw text into a
//! `Response`. All fields are owned so values can cross the FFI boundary
//! without lifetime concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::TransportOptions;

/// HTTP method accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Trim and upper-case `input`, then match it against the four supported
    /// methods.
    pub fn normalize(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a payload; GET and DELETE ignore one.
    pub fn takes_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-supplied request body.
///
/// Only `Text` can be sent. `Structured` exists so callers holding a JSON
/// value get an `InvalidBody` error instead of a silent serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Structured(serde_json::Value),
}

impl Body {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Structured(_) => None,
        }
    }

    /// True for an empty string and for structured values that carry
    /// nothing: null, false, zero, `""`, `"0"`, and empty arrays or objects.
    pub fn is_blank(&self) -> bool {
        match self {
            Body::Text(text) => text.is_empty(),
            Body::Structured(value) => match value {
                serde_json::Value::Null => true,
                serde_json::Value::Bool(b) => !b,
                serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
                serde_json::Value::String(s) => s.is_empty() || s == "0",
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
            },
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Structured(value)
    }
}

/// A validated request ready for a `Transport`.
///
/// The payload is carried in `options.post_fields`, where the method layer
/// put it, so a user override can still replace it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<String>,
    pub options: TransportOptions,
}

impl Request {
    /// The verb that goes on the wire: an explicit custom verb wins, then
    /// POST if the options ask for a submission, otherwise GET.
    pub fn verb(&self) -> &str {
        if let Some(custom) = self.options.custom_request.as_deref() {
            return custom;
        }
        if self.options.post || self.options.post_fields.is_some() {
            return "POST";
        }
        "GET"
    }

    pub fn payload(&self) -> Option<&str> {
        self.options.post_fields.as_deref()
    }
}

/// Result of one dispatch.
///
/// `error` is empty unless the transport failed. `headers` and `content` are
/// only filled when `raw` splits into more than three CRLF lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub raw: String,
    pub headers: Vec<String>,
    pub content: String,
    pub error: String,
}

impl Response {
    pub fn is_transport_error(&self) -> bool {
        !self.error.is_empty()
    }
}
