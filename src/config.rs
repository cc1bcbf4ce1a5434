//! Immutable runtime configuration.
//!
//! All knobs are read once at startup (defaults, optionally overridden by a
//! TOML file) and passed by reference into the engine and detectors. Nothing
//! mutates a `Config` after construction.

use crate::detect::Category;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-category weighting applied to reason counts when scoring a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub origins: f64,
    pub prefixes: f64,
    pub dns_root: f64,
    pub atlas_connected: f64,
    pub invalid_roa: f64,
    pub total_roa: f64,
    pub dfz: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            origins: 0.1,
            prefixes: 0.2,
            dns_root: 10.0,
            atlas_connected: 1.0,
            invalid_roa: 1.0,
            total_roa: 5.0,
            dfz: 1.0,
        }
    }
}

impl Weights {
    pub fn for_category(&self, category: Category) -> f64 {
        match category {
            Category::Origins => self.origins,
            Category::Prefixes => self.prefixes,
            Category::DnsRoot => self.dns_root,
            Category::AtlasConnected => self.atlas_connected,
            Category::InvalidRoa => self.invalid_roa,
            Category::TotalRoa => self.total_roa,
            Category::Dfz => self.dfz,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples retained per tracked key. 24 at 30min updates is 12hrs.
    pub max_history: usize,
    /// Seconds between evaluation cycles.
    pub update_frequency: u64,

    /// DFZ route-count change (%) before alerting, per address family.
    pub dfz_threshold: f64,
    /// Per-ASN prefix-count decrease (%) before alerting.
    pub bgp_prefix_threshold: f64,
    /// RIPE Atlas probes failing to reach a root server (%) before alerting.
    pub dns_root_fail_threshold: f64,
    /// RIPE Atlas probes disconnected (%) before alerting.
    pub atlas_probe_threshold: f64,
    /// Published RPKI ROA decrease (%) before alerting.
    pub total_roa_threshold: f64,

    pub weights: Weights,

    pub bgp_enabled: bool,
    pub rpki_enabled: bool,
    pub atlas_enabled: bool,

    pub bgp_table_url: String,
    pub rpki_status_url: String,
    pub atlas_api_url: String,

    /// Directory the flat output files are overwritten in.
    pub output_dir: PathBuf,
    pub write_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_history: 24,
            update_frequency: 1800,
            dfz_threshold: 1.0,
            bgp_prefix_threshold: 85.0,
            dns_root_fail_threshold: 20.0,
            atlas_probe_threshold: 10.0,
            total_roa_threshold: 90.0,
            weights: Weights::default(),
            bgp_enabled: true,
            rpki_enabled: true,
            atlas_enabled: true,
            bgp_table_url: "https://bgp.tools/table.jsonl".to_string(),
            rpki_status_url: "https://rpki-validator.ripe.net/api/v1/status".to_string(),
            atlas_api_url: "https://atlas.ripe.net/api/v2/measurements/".to_string(),
            output_dir: PathBuf::from("data"),
            write_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. Missing keys fall back to the
    /// defaults, so a partial file is fine.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(cfg)
    }

    /// The baseline window expressed in hours, used in reason text.
    pub fn window_hours(&self) -> f64 {
        (self.max_history as u64 * self.update_frequency) as f64 / 3600.0
    }
}
