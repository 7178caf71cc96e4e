// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie set parsing and rendering
//!
//! A [`CookieSet`] is the name/value view of one host's cookies, parsed from
//! a raw `cookie` header string as the ambient store reports it. Attributes
//! (path, expiry, flags) are not part of this view; the raw string carries
//! none and the bypass never needs them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cookie name -> value mapping scoped to one host
///
/// Entries are kept sorted by name so header rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieSet {
    entries: BTreeMap<String, String>,
}

impl CookieSet {
    /// Create an empty cookie set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw `"name=value; name2=value2"` cookie string
    ///
    /// Pairs are split on `;`, then each pair on its first `=`. Entries with
    /// a blank name or blank value after trimming are dropped. Values may
    /// contain `=` and are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    None
                } else {
                    Some((name.to_string(), value.to_string()))
                }
            })
            .collect();
        Self { entries }
    }

    /// Build a cookie set from name/value pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    /// Insert a cookie, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Get a cookie value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check whether a cookie name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cookies in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over name/value pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as a `cookie` header value (`"a=1; b=2"`)
    pub fn to_header_value(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Merge caller-attached cookies under this set
    ///
    /// On name collision the entry from `self` wins: these are the verified
    /// session cookies and must not be shadowed by stale caller state.
    pub fn merge_over<'a, I>(&self, caller: I) -> CookieSet
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut entries: BTreeMap<String, String> = caller
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in &self.entries {
            entries.insert(name.clone(), value.clone());
        }
        CookieSet { entries }
    }
}

impl FromIterator<(String, String)> for CookieSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
