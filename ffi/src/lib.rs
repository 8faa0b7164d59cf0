//! C-ABI wrapper around `posts-core`.
//!
//! # Overview
//! Lets a native mobile host (Kotlin/Swift through JNI or a C bridge) reuse
//! the core's request building and response decoding while keeping the HTTP
//! stack on the host side: build the request, execute it natively, pass the
//! status and body back, read the decoded posts.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The C caller owns all returned pointers and must release them with the
//!   matching `posts_free_*` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use posts_core::HttpResponse;

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8.
/// The caller must free the returned pointer with `posts_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_new(base_url: *const c_char) -> *mut FfiPostsClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(url) = unsafe { CStr::from_ptr(base_url) }.to_str() else {
            return std::ptr::null_mut();
        };
        let client = posts_core::PostsClient::new(url);
        Box::into_raw(Box::new(FfiPostsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client bound to the public posts endpoint.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_default() -> *mut FfiPostsClient {
    catch_unwind(|| {
        let client = posts_core::PostsClient::default();
        Box::into_raw(Box::new(FfiPostsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_free(client: *mut FfiPostsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Build the list-posts request.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `posts_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_build_list_posts(client: *const FfiPostsClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_posts())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Convert the host's response to a core `HttpResponse`. A null body is
/// treated as empty; a non-UTF-8 body is lossily converted and will then
/// fail to decode.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_string_lossy()
            .into_owned()
    };
    HttpResponse::new(resp.status, body)
}

/// Decode the host's response to a list-posts request.
///
/// Always returns a result; free it with `posts_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_parse_list_posts(
    client: *const FfiPostsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPostsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPostsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPostsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_list_posts(ffi_response_to_core(resp)) {
            Ok(posts) => FfiPostsResult::ok_posts(posts),
            Err(e) => FfiPostsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_parse_list_posts"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `posts_build_list_posts`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        for header in reclaim_slice(req.headers, req.headers_len) {
            free_c_string(header.key);
            free_c_string(header.value);
        }
    });
}

/// Free a result returned by `posts_parse_list_posts`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_result(result: *mut FfiPostsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if !result.posts.is_null() {
            let list = unsafe { Box::from_raw(result.posts) };
            for post in reclaim_slice(list.items, list.len) {
                post.free_fields();
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
