// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Tiirikka - Transparent Challenge Bypass
//!
//! An HTTP interceptor that defeats bot-challenge checkpoints without the
//! calling code ever noticing them. When a server fronts its content with a
//! scripted challenge, Tiirikka runs the page in a pluggable browser
//! backend, waits for the marker cookie that proves the challenge passed,
//! and replays requests with the recovered session state.
//!
//! ## Features
//!
//! - Transparent: install once in the request chain, issue ordinary requests
//! - Cached clearance: each host is solved once per process, then replayed
//! - Single-flight: concurrent first requests to a host share one solve
//! - Bounded solves: a navigation that never produces the marker degrades
//!   to an unmodified passthrough within a configurable timeout
//! - Pluggable backend: any engine that can run a page behind the
//!   [`BrowserEngine`] trait (WebView, CDP, embedded runtime)
//! - Identity replay: the engine's user agent is reused so follow-up
//!   traffic resembles the browser that passed the challenge
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiirikka::{
//!     AmbientCookieStore, BrowserEngine, BypassConfig, ChallengeInterceptor,
//!     HttpClient, InterceptorChain, Request,
//! };
//!
//! # async fn demo(
//! #     engine: Arc<dyn BrowserEngine>,
//! #     ambient: Arc<dyn AmbientCookieStore>,
//! # ) -> tiirikka::Result<()> {
//! let client = HttpClient::new()?;
//! let mut chain = InterceptorChain::new(client.clone());
//! chain.add(ChallengeInterceptor::new(
//!     client,
//!     engine,
//!     ambient,
//!     BypassConfig::default(),
//! ));
//!
//! let response = chain.execute(Request::get("https://site.example/")?).await?;
//! println!("{}", response.text_lossy());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod error;
pub mod http;
pub mod intercept;

// Re-exports for convenience

// Interception
pub use intercept::{
    BypassConfig, ChallengeInterceptor, ChallengeSolver, Chain, ClearanceCache, ClearanceEntry,
    Interceptor, InterceptorChain, RequestRebuilder, ResolvedIdentity,
};

// Browser seams
pub use browser::{
    AmbientCookieStore, BrowserEngine, CookieAccess, MemoryCookieStore, Navigation, NavigationEnd,
    NavigationHandle, NavigationSignal, ObserverVerdict, SubRequestObserver,
};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{CookieSet, HttpClient, HttpClientConfig, Request, Response};

/// Tiirikka version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
