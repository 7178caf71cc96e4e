// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser-automation seams
//!
//! The bypass core never talks to a concrete automation backend. It drives
//! a [`BrowserEngine`] capability trait and reads cookies through an
//! [`AmbientCookieStore`]. Adapters for real engines (WebView, CDP, an
//! embedded runtime) live outside this crate.

mod cookies;
mod engine;

pub use cookies::{AmbientCookieStore, MemoryCookieStore};
pub use engine::{
    BrowserEngine, CookieAccess, Navigation, NavigationEnd, NavigationHandle, NavigationSignal,
    ObserverVerdict, SubRequestObserver,
};
