//! Error types for the request dispatcher.
//!
//! # Design
//! Only input validation surfaces as an `Err`. Both variants are raised before
//! any network activity. Transport failures (DNS, refused connections,
//! timeouts, TLS) are not errors at this level: they are captured as text in
//! `Response::error` and the caller inspects that field.

use thiserror::Error;

/// Errors returned by `Dispatcher::prepare` and `Dispatcher::dispatch`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The method did not normalize to GET, POST, PUT or DELETE.
    #[error("'{method}' is not a valid HTTP method for request to {uri}")]
    InvalidMethod { method: String, uri: String },

    /// A POST or PUT was given no body, or a body that is not a string.
    #[error("invalid body for request '{method} {uri}'")]
    InvalidBody { method: String, uri: String },
}
