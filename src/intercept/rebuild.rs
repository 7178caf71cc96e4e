// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request rebuilding
//!
//! Once a host's challenge is solved, outgoing requests are rebuilt to look
//! like they come from the browser that passed it: the recovered cookie set
//! is merged into the cookie header and the engine's user agent replaces
//! the client's own.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{HeaderValue, USER_AGENT};

use crate::error::Result;
use crate::http::cookie::CookieSet;
use crate::http::{headers, HttpClient, Request, Response};

/// User agent recovered from the browser engine during a successful solve
///
/// Shared between the solver (writer) and the rebuilder (reader). Empty
/// until the first solve; last solve wins.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIdentity {
    inner: Arc<RwLock<Option<String>>>,
}

impl ResolvedIdentity {
    /// Create an unresolved identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the engine's user agent
    pub fn record(&self, user_agent: impl Into<String>) {
        *self.inner.write() = Some(user_agent.into());
    }

    /// The recovered user agent, if any solve has completed
    pub fn user_agent(&self) -> Option<String> {
        self.inner.read().clone()
    }

    /// Check whether a user agent has been recovered
    pub fn is_resolved(&self) -> bool {
        self.inner.read().is_some()
    }
}

/// Rebuilds requests with recovered session state and sends them
#[derive(Clone)]
pub struct RequestRebuilder {
    client: HttpClient,
    identity: ResolvedIdentity,
}

impl RequestRebuilder {
    /// Create a rebuilder sending through `client`
    pub fn new(client: HttpClient, identity: ResolvedIdentity) -> Self {
        Self { client, identity }
    }

    /// The shared identity cell
    pub fn identity(&self) -> &ResolvedIdentity {
        &self.identity
    }

    /// Send `request` with the recovered cookie set merged in
    ///
    /// The cookie header combines `cookies` with any caller-attached
    /// cookies; on name collision the recovered value wins, since it
    /// represents the verified session. The response is returned unchanged.
    pub async fn proceed(&self, mut request: Request, cookies: &CookieSet) -> Result<Response> {
        if let Some(user_agent) = self.identity.user_agent() {
            if let Ok(value) = HeaderValue::try_from(user_agent.as_str()) {
                request.headers.insert(USER_AGENT, value);
            }
        }

        let merged = cookies.merge_over(&request.cookies);
        if !merged.is_empty() {
            if let Ok(value) = HeaderValue::try_from(merged.to_header_value()) {
                request.headers.insert(headers::COOKIE, value);
            }
        }

        self.client.execute(request).await
    }
}
