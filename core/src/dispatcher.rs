//! Validates caller input, layers options, and runs one request.
//!
//! # Design
//! `Dispatcher` holds only immutable defaults and a transport, so it carries
//! no state between calls and concurrent calls are independent. `prepare`
//! does all validation and merging without touching the network; `dispatch`
//! adds the transport round-trip and response parsing on top.

use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::http::{Body, Method, Request, Response};
use crate::options::{OptionOverrides, TransportOptions};
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Dispatcher<T = UreqTransport> {
    transport: T,
    defaults: TransportOptions,
    default_headers: Vec<String>,
}

impl Dispatcher<UreqTransport> {
    pub fn new() -> Self {
        Self::with_transport(UreqTransport)
    }
}

impl Default for Dispatcher<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            defaults: TransportOptions::default(),
            default_headers: Vec::new(),
        }
    }

    /// Replace the base options every request starts from.
    pub fn with_defaults(mut self, defaults: TransportOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Header lines sent ahead of the caller's own on every request.
    pub fn with_default_headers(mut self, headers: Vec<String>) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn defaults(&self) -> &TransportOptions {
        &self.defaults
    }

    /// Validate input and resolve the request without any network activity.
    pub fn prepare(
        &self,
        uri: &str,
        method: &str,
        body: Option<&Body>,
        headers: &[String],
        overrides: &OptionOverrides,
    ) -> Result<Request, DispatchError> {
        let method = Method::normalize(method).ok_or_else(|| DispatchError::InvalidMethod {
            method: method.trim().to_ascii_uppercase(),
            uri: uri.to_string(),
        })?;

        let invalid_body = || DispatchError::InvalidBody {
            method: method.to_string(),
            uri: uri.to_string(),
        };

        // A non-blank structured body is rejected whatever the method.
        if body.is_some_and(|b| b.as_text().is_none() && !b.is_blank()) {
            return Err(invalid_body());
        }

        let payload = if method.takes_body() {
            Some(body.and_then(Body::as_text).ok_or_else(invalid_body)?)
        } else {
            None
        };

        let options = self
            .defaults
            .clone()
            .layer(&OptionOverrides::for_method(method, payload))
            .layer(overrides);

        let mut merged = self.default_headers.clone();
        merged.extend_from_slice(headers);

        debug!(%method, uri, headers = merged.len(), "request prepared");
        Ok(Request {
            method,
            uri: uri.to_string(),
            headers: merged,
            options,
        })
    }

    /// Run one request and parse what comes back.
    ///
    /// Only input validation returns `Err`. A transport failure produces an
    /// `Ok(Response)` whose `error` field is non-empty.
    pub fn dispatch(
        &self,
        uri: &str,
        method: &str,
        body: Option<&Body>,
        headers: &[String],
        overrides: &OptionOverrides,
    ) -> Result<Response, DispatchError> {
        let request = self.prepare(uri, method, body, headers, overrides)?;
        debug!(verb = request.verb(), uri, timeout = ?request.options.timeout, "dispatching");

        let output = self.transport.execute(&request);
        if !output.error.is_empty() {
            warn!(verb = request.verb(), uri, error = %output.error, "transport failed");
        }
        Ok(Response::from_raw(&output.raw, output.error))
    }
}

/// Dispatch through a default `Dispatcher` backed by `UreqTransport`.
pub fn dispatch(
    uri: &str,
    method: &str,
    body: Option<&Body>,
    headers: &[String],
    overrides: &OptionOverrides,
) -> Result<Response, DispatchError> {
    Dispatcher::new().dispatch(uri, method, body, headers, overrides)
}
