//! RPKI detectors: invalid-ROA and total-ROA anomalies per repository.

use crate::config::Config;
use crate::history::History;
use std::collections::HashMap;
use tracing::debug;

/// Record the latest invalid-ROA count per repository and flag any increase
/// above the rolling baseline. No percentage threshold here; this is the
/// most sensitive detector, offset by its low weight.
pub fn check_invalids(
    cfg: &Config,
    history: &mut History<String>,
    invalid_roa: &HashMap<String, u64>,
) -> Vec<String> {
    let mut reasons = Vec::new();

    for (repo, &count) in invalid_roa {
        history.record(repo.clone(), count);
    }

    for (repo, window) in history.iter() {
        let latest = match window.front() {
            Some(&v) => v,
            None => continue,
        };
        let avg = window.iter().sum::<u64>() as f64 / window.len() as f64;

        if latest as f64 > avg {
            let reason = format!(
                "{latest} RPKI ROAs from {repo} have invalid routes being advertised to the DFZ, \
                 which is more than the {}hrs average of {}",
                cfg.window_hours(),
                avg.floor() as u64
            );
            debug!(category = "invalid_roa", %reason);
            reasons.push(reason);
        }
    }

    reasons
}

/// Record the latest total published ROA count per repository and flag any
/// repository whose count collapsed by more than `total_roa_threshold`
/// percent, signalling a possible repository outage. A zero average is
/// treated as 100% (no anomaly).
pub fn check_totals(
    cfg: &Config,
    history: &mut History<String>,
    total_roa: &HashMap<String, u64>,
) -> Vec<String> {
    let mut reasons = Vec::new();

    for (repo, &count) in total_roa {
        history.record(repo.clone(), count);
    }

    for (repo, window) in history.iter() {
        let latest = match window.front() {
            Some(&v) => v,
            None => continue,
        };
        let avg = window.iter().sum::<u64>() / window.len() as u64;
        let pct = if avg == 0 {
            100.0
        } else {
            latest as f64 / avg as f64 * 100.0
        };

        if 100.0 - pct > cfg.total_roa_threshold {
            let reason = format!(
                "{repo} has decreased published ROAs by {pct:.1}%, from an average of {avg} to {latest}"
            );
            debug!(category = "total_roa", %reason);
            reasons.push(reason);
        }
    }

    reasons
}
