//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String` and a pointer plus length instead of
//! `Vec`. Conversion and release helpers live here to keep `lib.rs` focused
//! on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use dispatch_core::{DispatchError, Response};

/// Convert to an owned C string, dropping interior NUL bytes that a raw
/// response body may contain.
pub(crate) fn c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default().into_raw()
        }
    }
}

/// Free a C string produced by `c_string`. Safe with null.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A parsed response exposed to C.
///
/// `headers` points to `headers_len` C strings, or is null when there are
/// none. `error` is an empty string unless the transport failed.
#[repr(C)]
pub struct FfiResponse {
    pub raw: *mut c_char,
    pub headers: *mut *mut c_char,
    pub headers_len: u32,
    pub content: *mut c_char,
    pub error: *mut c_char,
}

impl FfiResponse {
    /// Convert a core `Response` into a heap-allocated `FfiResponse`.
    pub(crate) fn from_core(response: Response) -> *mut Self {
        let headers_len = response.headers.len() as u32;
        let headers = if response.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let lines: Box<[*mut c_char]> = response.headers.into_iter().map(c_string).collect();
            Box::into_raw(lines) as *mut *mut c_char
        };

        Box::into_raw(Box::new(FfiResponse {
            raw: c_string(response.raw),
            headers,
            headers_len,
            content: c_string(response.content),
            error: c_string(response.error),
        }))
    }

    /// Release a response created by `from_core`. Safe with null.
    pub(crate) fn free(response: *mut Self) {
        if response.is_null() {
            return;
        }
        let response = unsafe { Box::from_raw(response) };
        free_c_string(response.raw);
        free_c_string(response.content);
        free_c_string(response.error);
        if !response.headers.is_null() && response.headers_len > 0 {
            let lines = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    response.headers,
                    response.headers_len as usize,
                ))
            };
            for line in lines.iter() {
                free_c_string(*line);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiDispatchResult`.
///
/// A transport failure is not an error code: the call returns `Ok` and the
/// message is in `FfiResponse::error`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidMethod = 1,
    InvalidBody = 2,
    InvalidOptions = 3,
    NullArg = 4,
    InvalidUtf8 = 5,
    Panic = 6,
}

/// Result envelope for `dispatch_call`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `response`
/// points to the parsed response. On failure `error_message` is a
/// human-readable C string and `response` is null.
#[repr(C)]
pub struct FfiDispatchResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub response: *mut FfiResponse,
}

impl FfiDispatchResult {
    pub(crate) fn ok(response: Response) -> *mut Self {
        Box::into_raw(Box::new(FfiDispatchResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            response: FfiResponse::from_core(response),
        }))
    }

    fn failed(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiDispatchResult {
            error_code,
            error_message: c_string(msg),
            response: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: DispatchError) -> *mut Self {
        let code = match err {
            DispatchError::InvalidMethod { .. } => FfiErrorCode::InvalidMethod,
            DispatchError::InvalidBody { .. } => FfiErrorCode::InvalidBody,
        };
        Self::failed(code, err.to_string())
    }

    pub(crate) fn invalid_options(err: serde_json::Error) -> *mut Self {
        Self::failed(FfiErrorCode::InvalidOptions, format!("invalid options: {err}"))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failed(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        Self::failed(FfiErrorCode::InvalidUtf8, format!("argument is not UTF-8: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failed(FfiErrorCode::Panic, msg.to_string())
    }
}
