// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Challenge solver
//!
//! Drives the browser engine through a challenge page until the marker
//! cookie shows up in the ambient store, then replays the request with the
//! recovered session state. The ambient store is checked before navigating
//! (the marker may survive from an earlier page run), on every observed
//! sub-request (so navigation ends the moment the challenge passes), and
//! once more after navigation ends however it ends.

use std::sync::Arc;

use url::Url;

use super::cache::ClearanceCache;
use super::config::BypassConfig;
use super::rebuild::RequestRebuilder;
use crate::browser::{AmbientCookieStore, BrowserEngine, ObserverVerdict, SubRequestObserver};
use crate::error::Result;
use crate::http::cookie::CookieSet;
use crate::http::{Request, Response};

/// One solve attempt's lifecycle. Terminal states are `Solved` and
/// `Failed`; a later cache-missing request to the same host starts a fresh
/// attempt at `NoCookie`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolveState {
    NoCookie,
    Navigating,
    Solved,
    Failed,
}

/// Orchestrates the browser engine to pass a challenge
pub struct ChallengeSolver {
    engine: Arc<dyn BrowserEngine>,
    ambient: Arc<dyn AmbientCookieStore>,
    cache: Arc<ClearanceCache>,
    rebuilder: RequestRebuilder,
    config: Arc<BypassConfig>,
}

impl ChallengeSolver {
    /// Create a solver writing into `cache` and replaying via `rebuilder`
    pub fn new(
        engine: Arc<dyn BrowserEngine>,
        ambient: Arc<dyn AmbientCookieStore>,
        cache: Arc<ClearanceCache>,
        rebuilder: RequestRebuilder,
        config: Arc<BypassConfig>,
    ) -> Self {
        Self {
            engine,
            ambient,
            cache,
            rebuilder,
            config,
        }
    }

    /// Try to pass the challenge guarding `request`
    ///
    /// `Ok(Some(response))` is the rebuilt request's response after a
    /// successful solve. `Ok(None)` means no solve: the navigation ended
    /// (load finish, timeout, or engine abort) without the marker cookie
    /// ever appearing. Transport errors from the rebuilt request propagate
    /// unchanged.
    pub async fn attempt_bypass(&self, request: &Request) -> Result<Option<Response>> {
        let Some(host) = request.host().map(str::to_string) else {
            return Ok(None);
        };
        let mut state = SolveState::NoCookie;

        // Fast path: the marker may already sit in the ambient store from
        // an earlier page run
        if !self.try_resolve_from_store(&request.url, &host) {
            self.advance(&mut state, SolveState::Navigating, &host);
            self.run_navigation(request, &host).await;
            self.try_resolve_from_store(&request.url, &host);
        }

        let Some(cookies) = self.cache.get(&host) else {
            self.advance(&mut state, SolveState::Failed, &host);
            return Ok(None);
        };
        self.advance(&mut state, SolveState::Solved, &host);

        if let Some(user_agent) = self.engine.user_agent().await {
            self.rebuilder.identity().record(user_agent);
        }
        tracing::debug!(url = %request.url, "challenge bypass succeeded");
        self.rebuilder
            .proceed(request.clone(), &cookies)
            .await
            .map(Some)
    }

    /// Run one bounded navigation; the solve outcome is whatever the
    /// ambient store holds afterwards
    async fn run_navigation(&self, request: &Request, host: &str) {
        tracing::debug!(host = %host, url = %request.url, "loading browser engine to solve challenge");
        let navigation = self.config.navigation(request.url.clone());
        let observer = self.marker_observer(request.url.clone());

        match self.engine.navigate(navigation, observer).await {
            Ok(handle) => match handle.wait(self.config.solve_timeout).await {
                Ok(end) => tracing::debug!(host = %host, end = ?end, "navigation ended"),
                Err(e) if e.is_timeout() => {
                    tracing::debug!(host = %host, "navigation timed out without a solve")
                }
                Err(e) => tracing::debug!(host = %host, error = %e, "navigation aborted"),
            },
            Err(e) => tracing::debug!(host = %host, error = %e, "engine failed to start navigation"),
        }
    }

    /// Check the ambient store for the marker; on a hit, parse and cache
    ///
    /// The containment check runs on the raw cookie string, before parsing.
    fn try_resolve_from_store(&self, url: &Url, host: &str) -> bool {
        let Some(raw) = self.ambient.cookie_header(url) else {
            return false;
        };
        if !raw.contains(self.config.marker_cookie.as_str()) {
            return false;
        }
        self.cache.put(host, CookieSet::parse(&raw));
        true
    }

    /// Observer that ends navigation as soon as the marker appears
    fn marker_observer(&self, url: Url) -> SubRequestObserver {
        let ambient = self.ambient.clone();
        let marker = self.config.marker_cookie.clone();
        Arc::new(move |_sub_request: &Url| match ambient.cookie_header(&url) {
            Some(raw) if raw.contains(marker.as_str()) => ObserverVerdict::Complete,
            _ => ObserverVerdict::Continue,
        })
    }

    fn advance(&self, state: &mut SolveState, next: SolveState, host: &str) {
        tracing::trace!(host = %host, from = ?state, to = ?next, "solve state");
        *state = next;
    }
}
