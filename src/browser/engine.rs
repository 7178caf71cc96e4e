// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser engine capability trait and navigation types

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::sync::oneshot;
use url::Url;

use crate::error::{Error, Result};

/// How the engine should resolve cookies while the page runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieAccess {
    /// The platform-managed store tied to the engine. Challenge scripts set
    /// their marker there, so this is the only mode the solver uses.
    #[default]
    Ambient,
    /// A jar owned by the HTTP client. Kept for engine adapters that proxy
    /// page traffic through the client; cookie writes are not visible to
    /// the ambient store in this mode.
    ClientManaged,
}

/// Verdict returned by a sub-request observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverVerdict {
    /// Keep the navigation running
    Continue,
    /// End the navigation now; the handle resolves with
    /// [`NavigationEnd::ObserverSignalled`]
    Complete,
}

/// Callback invoked for every sub-request whose URL matches an observe
/// pattern
pub type SubRequestObserver = Arc<dyn Fn(&Url) -> ObserverVerdict + Send + Sync>;

/// Descriptor for one navigation
#[derive(Debug, Clone)]
pub struct Navigation {
    /// Page to load
    pub url: Url,
    /// End the navigation early when a loaded URL matches. `None` lets the
    /// page script run to completion.
    pub early_exit: Option<Regex>,
    /// Force a user agent. `None` keeps the engine's stock agent.
    pub user_agent: Option<String>,
    /// Cookie visibility mode
    pub cookie_access: CookieAccess,
    /// URL patterns whose sub-requests are reported to the observer
    pub observe: Vec<Regex>,
}

impl Navigation {
    /// Create a navigation with default settings
    pub fn new(url: Url) -> Self {
        Self {
            url,
            early_exit: None,
            user_agent: None,
            cookie_access: CookieAccess::default(),
            observe: Vec::new(),
        }
    }

    /// Set an early-exit pattern
    pub fn early_exit(mut self, pattern: Regex) -> Self {
        self.early_exit = Some(pattern);
        self
    }

    /// Force a user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the cookie visibility mode
    pub fn cookie_access(mut self, access: CookieAccess) -> Self {
        self.cookie_access = access;
        self
    }

    /// Set the observe patterns
    pub fn observe(mut self, patterns: Vec<Regex>) -> Self {
        self.observe = patterns;
        self
    }

    /// Check whether a sub-request URL should be reported to the observer
    pub fn observes(&self, url: &Url) -> bool {
        self.observe.iter().any(|p| p.is_match(url.as_str()))
    }
}

/// Why a navigation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEnd {
    /// The observer returned [`ObserverVerdict::Complete`]
    ObserverSignalled,
    /// The page's own load finished (or matched the early-exit pattern)
    LoadFinished,
}

/// Engine-side half of a navigation: pushes the single completion signal
pub struct NavigationSignal {
    tx: oneshot::Sender<NavigationEnd>,
}

impl NavigationSignal {
    /// Signal that the navigation ended. A dropped signal (engine abort)
    /// surfaces to the waiter as a navigation error.
    pub fn complete(self, end: NavigationEnd) {
        let _ = self.tx.send(end);
    }
}

/// Caller-side half of a navigation: awaits completion with a bounded wait
pub struct NavigationHandle {
    rx: oneshot::Receiver<NavigationEnd>,
    url: Url,
}

impl NavigationHandle {
    /// Create a connected signal/handle pair for a navigation to `url`
    pub fn channel(url: Url) -> (NavigationSignal, NavigationHandle) {
        let (tx, rx) = oneshot::channel();
        (NavigationSignal { tx }, NavigationHandle { rx, url })
    }

    /// URL the navigation was started for
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Wait for the navigation to end, at most `timeout`
    pub async fn wait(self, timeout: Duration) -> Result<NavigationEnd> {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(end)) => Ok(end),
            Ok(Err(_)) => Err(Error::navigation(format!(
                "engine aborted navigation to {}",
                self.url
            ))),
            Err(_) => Err(Error::timeout_with_url(
                "challenge navigation",
                timeout.as_millis() as u64,
                self.url.as_str(),
            )),
        }
    }
}

/// Capability interface over a browser-automation backend
///
/// Implementations run the page however they like (WebView, CDP session,
/// embedded runtime). The contract: invoke the observer for each matching
/// sub-request, end the navigation when it returns
/// [`ObserverVerdict::Complete`] or when the page load finishes, and resolve
/// the returned handle exactly once.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// The engine's own user agent string, if it exposes one
    async fn user_agent(&self) -> Option<String>;

    /// Start a navigation and return its completion handle
    async fn navigate(
        &self,
        navigation: Navigation,
        observer: SubRequestObserver,
    ) -> Result<NavigationHandle>;
}
