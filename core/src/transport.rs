//! The transport seam and its ureq-backed implementation.
//!
//! # Design
//! A `Transport` executes one `Request` and reports what happened as plain
//! text: the raw response (status line, headers, blank line, body) and an
//! error string. It never returns `Err`; failures land in
//! `TransportOutput::error` so the dispatcher can still build a `Response`.
//! Tests substitute their own `Transport` to run without a network.

use std::io::Write;

use ureq::http;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::http::Request;
use crate::options::TransportOptions;

/// Executes a prepared request.
pub trait Transport {
    fn execute(&self, request: &Request) -> TransportOutput;
}

/// What a transport hands back: raw response text and an error message,
/// either of which may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOutput {
    pub raw: String,
    pub error: String,
}

impl TransportOutput {
    pub fn ok(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            error: String::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            raw: String::new(),
            error: error.into(),
        }
    }
}

/// Blocking transport built on `ureq`.
///
/// Each call builds its own agent from the request's options and drops it
/// before returning, so no connection outlives the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &Request) -> TransportOutput {
        let text = match round_trip(request) {
            Ok(text) => text,
            Err(error) => return TransportOutput::failed(error),
        };

        if request.options.return_transfer {
            return TransportOutput::ok(text);
        }

        let mut stdout = std::io::stdout().lock();
        match stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            Ok(()) => TransportOutput::default(),
            Err(e) => TransportOutput::failed(e.to_string()),
        }
    }
}

fn agent(options: &TransportOptions) -> Agent {
    let max_redirects = if options.follow_location {
        options.max_redirects
    } else {
        0
    };
    Agent::config_builder()
        .http_status_as_error(false)
        .allow_non_standard_methods(true)
        .timeout_global(options.timeout)
        .timeout_connect(options.connect_timeout)
        .max_redirects(max_redirects)
        .tls_config(
            TlsConfig::builder()
                .disable_verification(!options.verify_peer)
                .build(),
        )
        .build()
        .new_agent()
}

/// Send the request and render the response as raw text.
fn round_trip(request: &Request) -> Result<String, String> {
    let agent = agent(&request.options);

    let mut builder = http::Request::builder()
        .method(request.verb())
        .uri(request.uri.as_str());
    for line in &request.headers {
        match line.split_once(':') {
            Some((name, value)) => builder = builder.header(name.trim(), value.trim()),
            None => tracing::warn!(header = %line, "skipping header line without a colon"),
        }
    }

    let mut response = match request.payload() {
        Some(payload) => {
            let req = builder.body(payload.to_string()).map_err(|e| e.to_string())?;
            agent.run(req)
        }
        None => {
            let req = builder.body(()).map_err(|e| e.to_string())?;
            agent.run(req)
        }
    }
    .map_err(|e| e.to_string())?;

    tracing::debug!(status = %response.status(), uri = %request.uri, "response received");

    // No size cap, and bytes that are not UTF-8 are replaced rather than
    // failing the exchange.
    let bytes = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(|e| e.to_string())?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    if !request.options.include_header {
        return Ok(body);
    }

    let mut raw = format!("{:?} {}\r\n", response.version(), response.status());
    for (name, value) in response.headers() {
        raw.push_str(name.as_str());
        raw.push_str(": ");
        raw.push_str(&String::from_utf8_lossy(value.as_bytes()));
        raw.push_str("\r\n");
    }
    raw.push_str("\r\n");
    raw.push_str(&body);
    Ok(raw)
}
