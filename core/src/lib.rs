//! Single-request HTTP dispatcher with a raw response parser.
//!
//! # Overview
//! `dispatch` validates a method and body, layers transport options
//! (defaults, then method-specific settings, then caller overrides), sends one
//! blocking request, and splits the raw header+body text into a `Response`
//! with `raw`, `headers`, `content` and `error` fields.
//!
//! # Design
//! - Invalid input is an `Err(DispatchError)` raised before any network
//!   activity. Transport failures are data: they fill `Response::error`.
//! - `Transport` is the I/O seam. `UreqTransport` is the default; tests and
//!   hosts that do their own I/O plug in something else, or call
//!   `Response::from_raw` on text they fetched themselves.
//! - `Dispatcher` is stateless apart from immutable defaults, so it can be
//!   shared across threads.

pub mod dispatcher;
pub mod error;
pub mod http;
pub mod options;
pub mod parse;
pub mod transport;

pub use dispatcher::{dispatch, Dispatcher};
pub use error::DispatchError;
pub use http::{Body, Method, Request, Response};
pub use options::{OptionOverrides, TransportOptions, DEFAULT_TIMEOUT};
pub use parse::{parse_lines, trim_raw};
pub use transport::{Transport, TransportOutput, UreqTransport};
