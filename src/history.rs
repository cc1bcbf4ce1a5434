//! Bounded per-key observation history.
//!
//! Every detector baselines against a rolling window of recent samples:
//! newest at the front, capped at `max_history` entries, oldest evicted
//! from the back. Keys are opaque -- a prefix string, an ASN, an RPKI
//! repository name, or an address family. Keys are never removed for the
//! life of the process; ASN/prefix cardinality is large but finite and
//! slow-changing, so the window cap alone bounds memory per key.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Address family partition for DFZ route counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    V6,
    V4,
}

impl AddressFamily {
    /// Classify a prefix in CIDR notation. Anything carrying the IPv6
    /// separator pattern is v6, everything else v4.
    pub fn of_prefix(prefix: &str) -> AddressFamily {
        if prefix.contains("::/") {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::V6 => write!(f, "IPv6"),
            AddressFamily::V4 => write!(f, "IPv4"),
        }
    }
}

/// A sliding window of numeric samples per key, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct History<K: Eq + Hash + Serialize> {
    windows: HashMap<K, VecDeque<u64>>,
    #[serde(skip)]
    cap: usize,
}

impl<K: Eq + Hash + Serialize> History<K> {
    pub fn new(cap: usize) -> Self {
        Self {
            windows: HashMap::new(),
            cap,
        }
    }

    /// Push a new sample for `key` to the front of its window, evicting the
    /// oldest sample once the window exceeds its cap. An unseen key starts
    /// with a singleton window.
    pub fn record(&mut self, key: K, value: u64) {
        let window = self.windows.entry(key).or_default();
        window.push_front(value);
        if window.len() > self.cap {
            window.pop_back();
        }
    }

    /// Current window for `key`, newest first. Empty for unseen keys.
    pub fn window(&self, key: &K) -> impl Iterator<Item = u64> + '_ {
        self.windows.get(key).into_iter().flatten().copied()
    }

    /// Newest sample for `key`, if any.
    pub fn latest(&self, key: &K) -> Option<u64> {
        self.windows.get(key).and_then(|w| w.front().copied())
    }

    /// Arithmetic mean over the current window. `None` for unseen keys;
    /// once `record` has run for a key the window is never empty.
    pub fn average(&self, key: &K) -> Option<f64> {
        let window = self.windows.get(key)?;
        if window.is_empty() {
            return None;
        }
        Some(window.iter().sum::<u64>() as f64 / window.len() as f64)
    }

    /// Iterate all tracked keys with their windows, newest-first samples.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &VecDeque<u64>)> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
