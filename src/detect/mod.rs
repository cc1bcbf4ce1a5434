//! Anomaly detection over the rolling histories.
//!
//! Each detector compares the newest snapshot against its per-key baseline
//! and emits plain-text reasons. Severity lives entirely in the weighting
//! table keyed by [`Category`], never in the reason itself.

pub mod atlas;
pub mod bgp;
pub mod dns;
pub mod rpki;

use serde::Serialize;
use std::collections::BTreeMap;

/// The fixed detector categories. Declaration order is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Origins,
    Prefixes,
    DnsRoot,
    AtlasConnected,
    InvalidRoa,
    TotalRoa,
    Dfz,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Origins,
        Category::Prefixes,
        Category::DnsRoot,
        Category::AtlasConnected,
        Category::InvalidRoa,
        Category::TotalRoa,
        Category::Dfz,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Origins => "origins",
            Category::Prefixes => "prefixes",
            Category::DnsRoot => "dns_root",
            Category::AtlasConnected => "atlas_connected",
            Category::InvalidRoa => "invalid_roa",
            Category::TotalRoa => "total_roa",
            Category::Dfz => "dfz",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One cycle's reasons, grouped by category. A category whose provider
/// failed to supply data is simply absent (zero reasons).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReasonSet {
    groups: BTreeMap<Category, Vec<String>>,
}

impl ReasonSet {
    pub fn set(&mut self, category: Category, reasons: Vec<String>) {
        if !reasons.is_empty() {
            self.groups.insert(category, reasons);
        }
    }

    pub fn get(&self, category: Category) -> &[String] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, category: Category) -> usize {
        self.get(category).len()
    }

    /// Total reason count across all categories.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Non-empty categories in fixed declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL
            .iter()
            .filter_map(|c| self.groups.get(c).map(|r| (*c, r.as_slice())))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Round to one decimal place, matching the percentage formatting used in
/// reason text.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
