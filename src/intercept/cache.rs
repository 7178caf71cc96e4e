// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Clearance cache
//!
//! Host -> cookie-set mapping for solved challenges. Entries are written
//! only by the solver and replaced wholesale on every re-solve. Nothing is
//! ever expired: a clearance is assumed valid until the process exits,
//! which is a known limitation of the marker-cookie scheme. Callers that
//! learn a clearance went stale can `remove` the host to force a re-solve.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::error::Result;
use crate::http::cookie::CookieSet;

/// A solved host's recovered cookies
#[derive(Debug, Clone, Serialize)]
pub struct ClearanceEntry {
    /// Cookies recovered from the ambient store at solve time
    pub cookies: CookieSet,
    /// When the solve completed
    pub solved_at: DateTime<Utc>,
}

/// Per-interceptor cache of solved hosts
///
/// One explicit instance per interceptor; share an `Arc` across
/// interceptors to pool their clearances.
#[derive(Debug, Default)]
pub struct ClearanceCache {
    entries: DashMap<String, ClearanceEntry>,
}

impl ClearanceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cookie set for a host
    pub fn get(&self, host: &str) -> Option<CookieSet> {
        self.entries.get(host).map(|e| e.value().cookies.clone())
    }

    /// Get the full entry for a host, including the solve timestamp
    pub fn entry(&self, host: &str) -> Option<ClearanceEntry> {
        self.entries.get(host).map(|e| e.value().clone())
    }

    /// Store the cookie set for a host, replacing any previous entry
    pub fn put(&self, host: impl Into<String>, cookies: CookieSet) {
        self.entries.insert(
            host.into(),
            ClearanceEntry {
                cookies,
                solved_at: Utc::now(),
            },
        );
    }

    /// Drop a host's entry
    pub fn remove(&self, host: &str) {
        self.entries.remove(host);
    }

    /// Drop everything
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of solved hosts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no host has been solved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Solved host names
    pub fn hosts(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Export all entries as JSON, keyed by host
    pub fn to_json(&self) -> Result<String> {
        let snapshot: std::collections::BTreeMap<String, ClearanceEntry> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        Ok(serde_json::to_string(&snapshot)?)
    }
}
