//! C-ABI wrapper around `dispatch-core`.
//!
//! # Overview
//! Exposes request dispatch and raw response parsing through `extern "C"`
//! functions so any language with a C FFI can send a request, or parse text
//! it fetched itself, without linking to Rust types directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Validation failures come back as an `FfiDispatchResult` error code.
//!   Transport failures come back as `Ok` with `FfiResponse::error` set, the
//!   same split the core makes.
//! - The C caller owns all returned pointers and must call the matching
//!   `dispatch_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::str::Utf8Error;

use dispatch_core::{Body, OptionOverrides, Response};

use types::*;

/// Borrow a non-null C string as UTF-8.
fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, Utf8Error> {
    unsafe { CStr::from_ptr(ptr) }.to_str()
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Send one request and parse the response.
///
/// `uri` and `method` are required. `body` may be null (no body).
/// `headers` points to `headers_len` header lines such as
/// `"Content-Type: application/json"`; it may be null when `headers_len` is 0.
/// `options_json` may be null (no overrides) or a JSON object of option
/// overrides, e.g. `{"timeout_secs": 2, "verify_peer": true}`.
///
/// The caller must free the result with `dispatch_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_call(
    uri: *const c_char,
    method: *const c_char,
    body: *const c_char,
    headers: *const *const c_char,
    headers_len: u32,
    options_json: *const c_char,
) -> *mut FfiDispatchResult {
    catch_unwind(|| {
        if uri.is_null() {
            return FfiDispatchResult::null_arg("uri");
        }
        if method.is_null() {
            return FfiDispatchResult::null_arg("method");
        }
        if headers.is_null() && headers_len > 0 {
            return FfiDispatchResult::null_arg("headers");
        }
        let Ok(uri) = read_str(uri) else {
            return FfiDispatchResult::invalid_utf8("uri");
        };
        let Ok(method) = read_str(method) else {
            return FfiDispatchResult::invalid_utf8("method");
        };

        let body = if body.is_null() {
            None
        } else {
            match read_str(body) {
                Ok(text) => Some(Body::from(text)),
                Err(_) => return FfiDispatchResult::invalid_utf8("body"),
            }
        };

        let mut lines = Vec::with_capacity(headers_len as usize);
        for i in 0..headers_len as usize {
            let line = unsafe { *headers.add(i) };
            if line.is_null() {
                return FfiDispatchResult::null_arg("headers");
            }
            match read_str(line) {
                Ok(text) => lines.push(text.to_string()),
                Err(_) => return FfiDispatchResult::invalid_utf8("headers"),
            }
        }

        let overrides = if options_json.is_null() {
            OptionOverrides::default()
        } else {
            let Ok(json) = read_str(options_json) else {
                return FfiDispatchResult::invalid_utf8("options_json");
            };
            match OptionOverrides::from_json(json) {
                Ok(overrides) => overrides,
                Err(e) => return FfiDispatchResult::invalid_options(e),
            }
        };

        match dispatch_core::dispatch(uri, method, body.as_ref(), &lines, &overrides) {
            Ok(response) => FfiDispatchResult::ok(response),
            Err(e) => FfiDispatchResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiDispatchResult::panic("panic in dispatch_call"))
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Parse raw response text the caller fetched with its own transport.
///
/// `error` may be null (no transport error). Returns null if `raw` is null or
/// either string is not UTF-8. The caller must free the result with
/// `dispatch_free_response`.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_parse_raw(raw: *const c_char, error: *const c_char) -> *mut FfiResponse {
    catch_unwind(|| {
        if raw.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(raw) = read_str(raw) else {
            return std::ptr::null_mut();
        };
        let error = if error.is_null() {
            ""
        } else {
            match read_str(error) {
                Ok(e) => e,
                Err(_) => return std::ptr::null_mut(),
            }
        };
        FfiResponse::from_core(Response::from_raw(raw, error))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiDispatchResult` returned by `dispatch_call`, including the
/// response it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_free_result(result: *mut FfiDispatchResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        FfiResponse::free(result.response);
    });
}

/// Free an `FfiResponse` returned by `dispatch_parse_raw`. Safe to call with
/// null. Do not call this on the response inside an `FfiDispatchResult`.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_free_response(response: *mut FfiResponse) {
    let _ = catch_unwind(|| FfiResponse::free(response));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn dispatch_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
