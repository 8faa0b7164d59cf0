//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! for strings, pointer plus length for sequences, explicit enum
//! discriminants. Arrays are handed out as boxed slices so they can be
//! reclaimed with the exact length they were created with.

use std::ffi::CString;
use std::os::raw::c_char;

use posts_core::{ApiError, ErrorKind, HttpMethod, Post};

/// Opaque handle to a `PostsClient`.
pub struct FfiPostsClient {
    pub(crate) inner: posts_core::PostsClient,
}

/// Copy `s` into a heap C string. Interior NULs are dropped, since C can't
/// represent them.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let cleaned = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

/// Reclaim a string produced by [`c_string`]. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Leak `items` as a pointer to `len` elements; empty yields null.
pub(crate) fn leak_slice<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len();
    (Box::into_raw(items.into_boxed_slice()) as *mut T, len)
}

/// Take back a slice leaked by [`leak_slice`].
pub(crate) fn reclaim_slice<T>(ptr: *mut T, len: usize) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request for the C host to execute.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: posts_core::HttpRequest) -> *mut Self {
        let headers = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = leak_slice(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), c_string),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The host's HTTP response. Read but never freed by this library.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    HttpStatus = 2,
    Decode = 3,
    Panic = 4,
    NullArg = 5,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Network => FfiErrorCode::Network,
            ErrorKind::HttpStatus => FfiErrorCode::HttpStatus,
            ErrorKind::Decode => FfiErrorCode::Decode,
        }
    }
}

/// A single post exposed to C.
#[repr(C)]
pub struct FfiPost {
    pub id: i32,
    pub user_id: i32,
    pub title: *mut c_char,
    pub body: *mut c_char,
}

impl FfiPost {
    fn from_core(post: Post) -> Self {
        FfiPost {
            id: post.id,
            user_id: post.user_id,
            title: c_string(post.title),
            body: c_string(post.body),
        }
    }

    pub(crate) fn free_fields(&self) {
        free_c_string(self.title);
        free_c_string(self.body);
    }
}

#[repr(C)]
pub struct FfiPostList {
    pub items: *mut FfiPost,
    pub len: usize,
}

/// Result envelope for `posts_parse_list_posts`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `posts`
/// points to the list. On failure `posts` is null and `error_message` is a
/// display string; `http_status` is set for `HttpStatus` errors.
#[repr(C)]
pub struct FfiPostsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub posts: *mut FfiPostList,
}

impl FfiPostsResult {
    pub(crate) fn ok_posts(posts: Vec<Post>) -> *mut Self {
        let (items, len) = leak_slice(posts.into_iter().map(FfiPost::from_core).collect());
        let list = Box::into_raw(Box::new(FfiPostList { items, len }));
        Box::into_raw(Box::new(FfiPostsResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            posts: list,
        }))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let http_status = match &err {
            ApiError::HttpStatus { status, .. } => *status,
            _ => 0,
        };
        Self::failure(err.kind().into(), err.to_string(), http_status)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"), 0)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string(), 0)
    }

    fn failure(error_code: FfiErrorCode, message: String, http_status: u16) -> *mut Self {
        Box::into_raw(Box::new(FfiPostsResult {
            error_code,
            error_message: c_string(message),
            http_status,
            posts: std::ptr::null_mut(),
        }))
    }
}
