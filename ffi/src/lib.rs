//! C-ABI wrapper around `berani-core`.
//!
//! # Overview
//! Exposes the resilient report/chat client, the screenshot analysis
//! request builders and parsers, and the text helpers through `extern "C"`
//! functions so the mobile hosts can call them without linking against
//! serde or an HTTP stack of their own.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `berani_generate_report` / `berani_send_message` perform the network
//!   round-trips themselves and always produce an `FfiReply`.
//! - Analysis is host-does-IO: `berani_build_*` returns an `FfiHttpRequest`,
//!   the host executes it and hands the response to `berani_parse_*`, which
//!   answers with an `FfiResult` envelope carrying JSON text.
//! - The C caller owns all returned pointers and must call the matching
//!   `berani_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use berani_core::client::Reply;
use berani_core::probe::FallbackReason;
use berani_core::{
    fallback, plans, redact, AnalyzeRequest, BeraniClient, ChatMessage, ChatPayload,
    ClientConfig, HttpResponse, Lang, ReplyOrigin, ReportPayload, Scenario,
};

use types::*;

/// Borrow a C string as `&str`; null and invalid UTF-8 both read as `None`.
fn opt_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `BeraniClient`.
///
/// A null `base_url` means no backend is configured and every call answers
/// with the offline fallback. `report_path` and `chat_path` may be null (no
/// override). Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `berani_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_client_new(
    base_url: *const c_char,
    report_path: *const c_char,
    chat_path: *const c_char,
) -> *mut FfiBeraniClient {
    catch_unwind(|| {
        let base = opt_str(base_url).unwrap_or("");
        let mut config = ClientConfig::new(base);
        if let Some(path) = opt_str(report_path) {
            config = config.with_report_path(path);
        }
        if let Some(path) = opt_str(chat_path) {
            config = config.with_chat_path(path);
        }
        let client = FfiBeraniClient {
            inner: BeraniClient::new(config),
        };
        Box::into_raw(Box::new(client))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `berani_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn berani_client_free(client: *mut FfiBeraniClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Report and chat
// ---------------------------------------------------------------------------

/// Reply assembled locally when the client itself panicked mid-probe.
fn panic_reply(text: String) -> Reply {
    Reply {
        text,
        origin: ReplyOrigin::Fallback(FallbackReason::Failed {
            last_error: "internal panic".to_string(),
        }),
        attempts: Vec::new(),
    }
}

/// Generate an incident report from `payload_json`, an object with
/// `category`, `dateISO`, `timeISO`, `locationText` and `description`.
///
/// Null or unparsable JSON is treated as an empty report. Returns null only
/// if `client` is null. Free the reply with `berani_free_reply`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_generate_report(
    client: *const FfiBeraniClient,
    payload_json: *const c_char,
) -> *mut FfiReply {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let payload: ReportPayload = opt_str(payload_json)
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();
        let reply = catch_unwind(AssertUnwindSafe(|| client.inner.generate_report(&payload)))
            .unwrap_or_else(|_| panic_reply(fallback::report(&payload)));
        FfiReply::from_core(reply)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Send the conversation in `messages_json` to the assistant.
///
/// Accepts either a bare array of `{role, content}` messages or an object
/// `{"messages": [...]}`. Null or unparsable JSON is treated as an empty
/// conversation. Returns null only if `client` is null. Free the reply with
/// `berani_free_reply`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_send_message(
    client: *const FfiBeraniClient,
    messages_json: *const c_char,
) -> *mut FfiReply {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let payload = opt_str(messages_json).map(parse_chat).unwrap_or_default();
        let reply = catch_unwind(AssertUnwindSafe(|| client.inner.send_message(&payload)))
            .unwrap_or_else(|_| panic_reply(fallback::chat(&payload)));
        FfiReply::from_core(reply)
    }))
    .unwrap_or(std::ptr::null_mut())
}

fn parse_chat(json: &str) -> ChatPayload {
    if let Ok(messages) = serde_json::from_str::<Vec<ChatMessage>>(json) {
        return ChatPayload::new(messages);
    }
    serde_json::from_str(json).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Screenshot analysis: build request
// ---------------------------------------------------------------------------

/// Build the `POST /analyze` request for a screenshot data URL.
///
/// `lang` is `EN`, `MS`, `ZH` or `TA` (case-insensitive); null or unknown
/// means `EN`. Returns null if `client` or `image_data_url` is null, if the
/// client has no base URL, or if the data URL fails validation. Free with
/// `berani_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_build_analyze(
    client: *const FfiBeraniClient,
    image_data_url: *const c_char,
    lang: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(image) = opt_str(image_data_url) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let lang = opt_str(lang).map(Lang::parse).unwrap_or_default();
        let request = client
            .inner
            .analysis_client()
            .and_then(|analysis| analysis.build_analyze(&AnalyzeRequest::new(image, lang)));
        match request {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build the `GET /resources` request. Returns null if `client` is null or
/// has no base URL.
#[unsafe(no_mangle)]
pub extern "C" fn berani_build_resources(client: *const FfiBeraniClient) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.analysis_client() {
            Ok(analysis) => FfiHttpRequest::from_core(analysis.build_resources()),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Screenshot analysis: parse response
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = opt_str(resp.body).unwrap_or("").to_string();
    HttpResponse::new(resp.status, body)
}

/// Parse the response to an analyze request.
///
/// On success `json` holds the analysis object with every field present.
#[unsafe(no_mangle)]
pub extern "C" fn berani_parse_analyze(
    client: *const FfiBeraniClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let parsed = client
            .inner
            .analysis_client()
            .and_then(|analysis| analysis.parse_analyze(ffi_response_to_core(resp)));
        match parsed {
            Ok(analysis) => FfiResult::ok_json(&analysis),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in berani_parse_analyze"))
}

/// Parse the response to a resources request.
///
/// On success `json` holds an array of `{name, type, value, notes}`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_parse_resources(
    client: *const FfiBeraniClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let parsed = client
            .inner
            .analysis_client()
            .and_then(|analysis| analysis.parse_resources(ffi_response_to_core(resp)));
        match parsed {
            Ok(resources) => FfiResult::ok_json(&resources),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in berani_parse_resources"))
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Replace email addresses and long phone numbers in `text`.
///
/// Returns null if `text` is null. Free with `berani_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_redact(text: *const c_char) -> *mut c_char {
    catch_unwind(|| match opt_str(text) {
        Some(text) => c_string(redact::redact_identifiers(text)),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Map a free-form scenario label to its canonical key, e.g. `money_moved`.
///
/// Null input maps to `other`. Free with `berani_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_normalize_scenario(label: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let scenario = opt_str(label).map(Scenario::normalize).unwrap_or(Scenario::Other);
        c_string(scenario.key())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The local action plan for a scenario label, as a JSON object.
///
/// Null input yields the `other` plan. Free with `berani_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn berani_action_plan(label: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let plan = plans::action_plan_for(opt_str(label).unwrap_or(""));
        match serde_json::to_string(&plan) {
            Ok(json) => c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiReply`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn berani_free_reply(reply: *mut FfiReply) {
    if reply.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let reply = unsafe { Box::from_raw(reply) };
        free_c_string(reply.text);
        free_c_string(reply.url);
        free_c_string(reply.fallback_reason);
    });
}

/// Free an `FfiHttpRequest` returned by any `berani_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn berani_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiResult` returned by any `berani_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn berani_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.json);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn berani_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
