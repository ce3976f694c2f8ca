//! Transport options and the override layers merged on top of them.
//!
//! # Design
//! `TransportOptions` is the fully resolved, immutable configuration one
//! request runs with. `OptionOverrides` is a sparse layer over it: every
//! field is optional and only the present ones replace the value below.
//! A request resolves as `defaults -> method layer -> user layer`, so user
//! overrides win over both the defaults and the method-specific settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::Method;

/// Request timeout applied when nothing overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved configuration for a single transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Verify the server's TLS certificate chain.
    pub verify_peer: bool,
    /// Prefix the returned raw text with the status line and headers.
    pub include_header: bool,
    /// Buffer the response and return it; when off it goes to stdout.
    pub return_transfer: bool,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub follow_location: bool,
    /// Only consulted when `follow_location` is set.
    pub max_redirects: u32,
    pub post: bool,
    pub custom_request: Option<String>,
    pub post_fields: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            verify_peer: false,
            include_header: true,
            return_transfer: true,
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: None,
            follow_location: false,
            max_redirects: 5,
            post: false,
            custom_request: None,
            post_fields: None,
        }
    }
}

impl TransportOptions {
    /// Apply every field present in `overrides`, keeping the rest.
    pub fn layer(mut self, overrides: &OptionOverrides) -> Self {
        if let Some(v) = overrides.verify_peer {
            self.verify_peer = v;
        }
        if let Some(v) = overrides.include_header {
            self.include_header = v;
        }
        if let Some(v) = overrides.return_transfer {
            self.return_transfer = v;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = non_zero_secs(secs);
        }
        if let Some(secs) = overrides.connect_timeout_secs {
            self.connect_timeout = non_zero_secs(secs);
        }
        if let Some(v) = overrides.follow_location {
            self.follow_location = v;
        }
        if let Some(v) = overrides.max_redirects {
            self.max_redirects = v;
        }
        if let Some(v) = overrides.post {
            self.post = v;
        }
        if let Some(v) = &overrides.custom_request {
            self.custom_request = Some(v.clone());
        }
        if let Some(v) = &overrides.post_fields {
            self.post_fields = Some(v.clone());
        }
        self
    }
}

/// Zero seconds means no timeout.
fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// A sparse set of option overrides.
///
/// Deserializes from JSON such as `{"verify_peer": true, "timeout_secs": 2}`.
/// Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_peer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_transfer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_location: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_redirects: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_fields: Option<String>,
}

impl OptionOverrides {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The layer a method contributes before user overrides are applied.
    ///
    /// PUT and DELETE go out as a custom verb since the transport only has a
    /// native notion of GET and POST.
    pub fn for_method(method: Method, body: Option<&str>) -> Self {
        match method {
            Method::Get => Self::default(),
            Method::Post => Self {
                post: Some(true),
                post_fields: body.map(str::to_string),
                ..Self::default()
            },
            Method::Put => Self {
                custom_request: Some("PUT".to_string()),
                post_fields: body.map(str::to_string),
                ..Self::default()
            },
            Method::Delete => Self {
                custom_request: Some("DELETE".to_string()),
                ..Self::default()
            },
        }
    }
}
