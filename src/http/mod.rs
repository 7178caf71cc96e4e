// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the bypass interceptor
//!
//! Provides the request/response value types the interceptor chain operates
//! on and a lightweight reqwest-backed client the chain terminates at.
//! Cookie headers are rendered by this crate, never by the underlying
//! client: recovered session cookies come from the browser engine's ambient
//! store, and letting a client-owned jar compete with them is exactly the
//! interoperability failure the bypass exists to avoid.

mod client;
pub mod cookie;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use cookie::CookieSet;
pub use request::Request;
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const ACCEPT_LANGUAGE: &str = "accept-language";
    pub const ACCEPT_ENCODING: &str = "accept-encoding";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const REFERER: &str = "referer";
}
