// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bypass configuration

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::browser::{CookieAccess, Navigation};

lazy_static! {
    /// Matches every URL; the default observer pattern
    static ref MATCH_ALL: Regex = Regex::new(".").expect("static pattern");
}

/// Default marker cookie name
pub const DEFAULT_MARKER_COOKIE: &str = "cf_clearance";

/// Configuration for the challenge bypass
#[derive(Debug, Clone)]
pub struct BypassConfig {
    /// Cookie name whose presence means the challenge was passed
    pub marker_cookie: String,
    /// Upper bound on one solve attempt; expiry counts as no-solve
    pub solve_timeout: Duration,
    /// Sub-request patterns reported to the marker observer
    pub observe: Vec<Regex>,
    /// Early-exit pattern for the navigation. `None` lets the challenge
    /// script run to completion, which is what challenge pages expect.
    pub early_exit: Option<Regex>,
    /// Force a user agent during navigation. `None` keeps the engine's
    /// stock agent; challenge heuristics tend to reject anything else.
    pub user_agent: Option<String>,
}

impl Default for BypassConfig {
    fn default() -> Self {
        Self {
            marker_cookie: DEFAULT_MARKER_COOKIE.to_string(),
            solve_timeout: Duration::from_secs(60),
            observe: vec![MATCH_ALL.clone()],
            early_exit: None,
            user_agent: None,
        }
    }
}

impl BypassConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker cookie name
    pub fn marker_cookie(mut self, name: impl Into<String>) -> Self {
        self.marker_cookie = name.into();
        self
    }

    /// Set the solve timeout
    pub fn solve_timeout(mut self, timeout: Duration) -> Self {
        self.solve_timeout = timeout;
        self
    }

    /// Set the observe patterns
    pub fn observe(mut self, patterns: Vec<Regex>) -> Self {
        self.observe = patterns;
        self
    }

    /// Set an early-exit pattern
    pub fn early_exit(mut self, pattern: Regex) -> Self {
        self.early_exit = Some(pattern);
        self
    }

    /// Force a navigation user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the navigation descriptor for a challenge solve
    ///
    /// Cookie visibility is always [`CookieAccess::Ambient`]: the challenge
    /// script writes its marker into the platform store, and a client-owned
    /// jar would never see it.
    pub fn navigation(&self, url: Url) -> Navigation {
        let mut navigation = Navigation::new(url)
            .cookie_access(CookieAccess::Ambient)
            .observe(self.observe.clone());
        if let Some(ref pattern) = self.early_exit {
            navigation = navigation.early_exit(pattern.clone());
        }
        if let Some(ref user_agent) = self.user_agent {
            navigation = navigation.user_agent(user_agent.clone());
        }
        navigation
    }
}
