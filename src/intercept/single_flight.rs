// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-host solve coordination
//!
//! Two concurrent requests to the same unresolved host must not trigger two
//! navigations. Each host gets one async mutex; cache-missing flows acquire
//! it before solving and re-check the cache afterwards, so the second flow
//! finds the first flow's cookies instead of starting its own browser run.
//! Flight locks are never evicted: one small mutex per distinct host, the
//! same unbounded-hosts assumption the cache itself makes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-host flight locks
#[derive(Debug, Default)]
pub(crate) struct HostFlights {
    flights: DashMap<String, Arc<Mutex<()>>>,
}

impl HostFlights {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Acquire the flight lock for a host
    ///
    /// The returned guard is held for the duration of a solve attempt;
    /// holders of other hosts' locks are unaffected.
    pub(crate) async fn acquire(&self, host: &str) -> OwnedMutexGuard<()> {
        let flight = self
            .flights
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        flight.lock_owned().await
    }
}
