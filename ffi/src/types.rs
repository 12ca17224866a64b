//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Structured payloads (analysis results,
//! resource lists, action plans) cross as JSON text so hosts can decode them
//! with their own JSON tooling. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use berani_core::{ApiError, BeraniClient, HttpMethod, Reply, ReplyOrigin};

/// Opaque handle to a `BeraniClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiBeraniClient {
    pub(crate) inner: BeraniClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NUL bytes
/// are dropped rather than truncating the text.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let mut s = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// Where the text in an `FfiReply` came from.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiReplyOrigin {
    Remote = 0,
    Fallback = 1,
}

/// Result of `berani_generate_report` / `berani_send_message`.
///
/// `text` is always set. `url` is the endpoint that answered and is null
/// for fallback replies; `fallback_reason` is `no_base_url`,
/// `all_not_found` or `failed` for fallback replies and null otherwise.
#[repr(C)]
pub struct FfiReply {
    pub text: *mut c_char,
    pub origin: FfiReplyOrigin,
    pub url: *mut c_char,
    pub fallback_reason: *mut c_char,
    pub attempts: u32,
}

impl FfiReply {
    pub(crate) fn from_core(reply: Reply) -> *mut Self {
        let attempts = reply.attempts.len() as u32;
        let (origin, url, fallback_reason) = match reply.origin {
            ReplyOrigin::Remote { url } => (FfiReplyOrigin::Remote, c_string(url), std::ptr::null_mut()),
            ReplyOrigin::Fallback(reason) => (
                FfiReplyOrigin::Fallback,
                std::ptr::null_mut(),
                c_string(reason.label()),
            ),
        };
        Box::into_raw(Box::new(FfiReply {
            text: c_string(reply.text),
            origin,
            url,
            fallback_reason,
            attempts,
        }))
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `berani_build_*` functions. The C caller executes the request
/// and passes the response back through `berani_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: berani_core::HttpRequest) -> *mut Self {
        let url = c_string(req.url);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `berani_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Transport = 3,
    Deserialization = 4,
    Serialization = 5,
    InvalidInput = 6,
    Config = 7,
    Panic = 8,
    NullArg = 9,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `json`
/// holds the parsed payload re-serialized as JSON.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `json` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

impl FfiResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, http_status: u16, json: *mut c_char) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message,
            http_status,
            json,
        }))
    }

    /// Build a success result carrying `value` as JSON text.
    pub(crate) fn ok_json<T: serde::Serialize>(value: &T) -> *mut Self {
        match serde_json::to_string(value) {
            Ok(json) => Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, c_string(json)),
            Err(e) => Self::from_error(ApiError::Serialization(e.to_string())),
        }
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::NotFound => (FfiErrorCode::NotFound, 404u16),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            ApiError::InvalidInput(_) => (FfiErrorCode::InvalidInput, 0),
            ApiError::Config(_) => (FfiErrorCode::Config, 0),
        };
        Self::boxed(error_code, c_string(err.to_string()), http_status, std::ptr::null_mut())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, c_string(msg), 0, std::ptr::null_mut())
    }
}
