// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ambient cookie store access
//!
//! The ambient store is the platform-managed cookie jar the browser engine
//! writes into while a page runs. It is a separate world from the HTTP
//! client's cookie handling; the solver only ever reads it.

use dashmap::DashMap;
use url::Url;

use crate::http::cookie::CookieSet;

/// Read access to the cookie jar tied to the browser engine
///
/// `cookie_header` returns the raw semicolon-separated `name=value` string
/// for a URL, exactly as a `cookie` request header would carry it, or `None`
/// when the store holds nothing for that URL.
pub trait AmbientCookieStore: Send + Sync {
    /// Raw cookie string for a URL
    fn cookie_header(&self, url: &Url) -> Option<String>;
}

/// In-memory ambient store keyed by host
///
/// Backs engine adapters whose platform surfaces cookies programmatically
/// (CDP `Network.getCookies`, embedded runtimes) and the crate's tests.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: DashMap<String, String>,
}

impl MemoryCookieStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw cookie string for a host
    pub fn set_raw(&self, host: impl Into<String>, raw: impl Into<String>) {
        self.cookies.insert(host.into(), raw.into());
    }

    /// Insert or replace a single cookie for a host
    pub fn insert(&self, host: &str, name: &str, value: &str) {
        let mut set = self
            .cookies
            .get(host)
            .map(|raw| CookieSet::parse(raw.value()))
            .unwrap_or_default();
        set.insert(name, value);
        self.cookies.insert(host.to_string(), set.to_header_value());
    }

    /// Remove all cookies for a host
    pub fn clear_host(&self, host: &str) {
        self.cookies.remove(host);
    }

    /// Remove everything
    pub fn clear(&self) {
        self.cookies.clear();
    }
}

impl AmbientCookieStore for MemoryCookieStore {
    fn cookie_header(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        self.cookies.get(host).map(|raw| raw.value().clone())
    }
}
