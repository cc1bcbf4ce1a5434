//! DNS root-server reachability check. Stateless: each cycle's RIPE Atlas
//! measurement results stand on their own, no history involved.

use crate::collect::atlas::RootDnsSnapshot;
use crate::config::Config;
use crate::detect::round1;
use crate::history::AddressFamily;
use tracing::debug;

/// Flag root servers that more than `dns_root_fail_threshold` percent of
/// probes failed to get a SOA response from, per address family. Roots with
/// zero reporting probes are skipped.
pub fn check_roots(cfg: &Config, snapshot: &RootDnsSnapshot) -> Vec<String> {
    let mut reasons = Vec::new();

    for (family, roots) in [
        (AddressFamily::V6, &snapshot.v6),
        (AddressFamily::V4, &snapshot.v4),
    ] {
        for (root, check) in roots {
            if check.total == 0 {
                continue;
            }
            let percent_failed = round1(check.failed.len() as f64 / check.total as f64 * 100.0);
            if percent_failed > cfg.dns_root_fail_threshold {
                let reason = format!(
                    "{percent_failed}% of RIPE Atlas Probes failed to get a response from {root} over {family}"
                );
                debug!(category = "dns_root", %reason);
                reasons.push(reason);
            }
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::atlas::RootCheck;
    use std::collections::HashMap;

    fn root(total: usize, failed: usize) -> RootCheck {
        RootCheck {
            total,
            failed: (0..failed as u64).collect(),
        }
    }

    #[test]
    fn failing_root_is_flagged_per_family() {
        let cfg = Config::default();
        let snapshot = RootDnsSnapshot {
            v6: HashMap::from([("k.root-servers.net".to_string(), root(100, 30))]),
            v4: HashMap::from([("k.root-servers.net".to_string(), root(100, 5))]),
        };
        let reasons = check_roots(&cfg, &snapshot);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("IPv6"));
        assert!(reasons[0].contains("30%"));
    }

    #[test]
    fn zero_probe_root_is_skipped() {
        let cfg = Config::default();
        let snapshot = RootDnsSnapshot {
            v6: HashMap::from([("m.root-servers.net".to_string(), root(0, 0))]),
            v4: HashMap::new(),
        };
        assert!(check_roots(&cfg, &snapshot).is_empty());
    }
}
