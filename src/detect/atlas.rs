//! RIPE Atlas probe-population connectivity check. Stateless.

use crate::collect::atlas::ProbeStatus;
use crate::config::Config;
use tracing::debug;

/// Flag a disconnect rate above `atlas_probe_threshold` percent across the
/// recently active probe population. An empty population counts as fully
/// connected.
pub fn check_probes(cfg: &Config, status: &ProbeStatus) -> Vec<String> {
    let mut reasons = Vec::new();

    let total = status.connected.len() + status.disconnected.len();
    let rate = if total == 0 {
        debug!("no RIPE Atlas probes to check");
        0.0
    } else {
        status.disconnected.len() as f64 / total as f64 * 100.0
    };

    if rate > cfg.atlas_probe_threshold {
        let reason = format!("{rate}% of recently active RIPE Atlas probes are disconnected");
        debug!(category = "atlas_connected", %reason);
        reasons.push(reason);
    }

    reasons
}
