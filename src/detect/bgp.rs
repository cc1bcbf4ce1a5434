//! BGP table detectors: origin-count, prefix-count, and DFZ-size anomalies.

use crate::config::Config;
use crate::detect::round1;
use crate::history::{AddressFamily, History};
use std::collections::HashMap;
use tracing::debug;

/// Record the latest origin-AS count per prefix and flag prefixes whose
/// newest count deviates from their baseline.
///
/// An increase above a near-single-origin baseline (`avg < 2`) looks like a
/// hijack; multi-origin anycast prefixes are excluded by that guard. A
/// collapse to fewer than 2 origins on a prefix that usually has more than 5
/// looks like an anycast withdrawal.
pub fn check_origins(
    cfg: &Config,
    history: &mut History<String>,
    origins: &HashMap<String, u64>,
) -> Vec<String> {
    let mut reasons = Vec::new();

    for (prefix, &count) in origins {
        history.record(prefix.clone(), count);
    }

    for (prefix, window) in history.iter() {
        let latest = match window.front() {
            Some(&v) => v,
            None => continue,
        };
        let avg = window.iter().sum::<u64>() as f64 / window.len() as f64;

        if latest as f64 > avg && avg < 2.0 {
            let reason = format!(
                "{prefix} is being originated by {latest} ASNs, this is above the {}hrs average of {}",
                cfg.window_hours(),
                avg.floor() as u64
            );
            debug!(category = "origins", %reason);
            reasons.push(reason);
        }

        if latest < 2 && avg > 5.0 {
            let reason = format!(
                "{prefix} is being originated by {latest} ASNs, this is below the {}hrs average of {}",
                cfg.window_hours(),
                avg.floor() as u64
            );
            debug!(category = "origins", %reason);
            reasons.push(reason);
        }
    }

    reasons
}

/// Record the latest advertised-prefix count per ASN and flag ASNs whose
/// newest count dropped by more than `bgp_prefix_threshold` percent against
/// their baseline. A zero baseline is skipped rather than alerted on.
pub fn check_prefixes(
    cfg: &Config,
    history: &mut History<u32>,
    prefixes: &HashMap<u32, u64>,
) -> Vec<String> {
    let mut reasons = Vec::new();

    for (&asn, &count) in prefixes {
        history.record(asn, count);
    }

    for (&asn, window) in history.iter() {
        let latest = match window.front() {
            Some(&v) => v,
            None => continue,
        };
        let avg = window.iter().sum::<u64>() as f64 / window.len() as f64;
        if avg == 0.0 {
            continue;
        }

        let percent_drop = 100 - (latest as f64 / avg * 100.0).round() as i64;
        if percent_drop as f64 > cfg.bgp_prefix_threshold {
            let reason = format!(
                "AS{asn} is originating only {latest} prefixes, {percent_drop}% fewer than their {}hrs average of {}",
                cfg.window_hours(),
                avg.ceil() as u64
            );
            debug!(category = "prefixes", %reason);
            reasons.push(reason);
        }
    }

    reasons
}

/// Track the total number of routes in the v4 and v6 DFZ and flag either
/// family moving more than `dfz_threshold` percent off its baseline.
/// Families are evaluated independently, so a cycle can emit 0, 1, or 2
/// reasons.
pub fn check_dfz<'a>(
    cfg: &Config,
    history: &mut History<AddressFamily>,
    prefixes: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let mut v6_count = 0u64;
    let mut v4_count = 0u64;
    for prefix in prefixes {
        match AddressFamily::of_prefix(prefix) {
            AddressFamily::V6 => v6_count += 1,
            AddressFamily::V4 => v4_count += 1,
        }
    }

    history.record(AddressFamily::V6, v6_count);
    history.record(AddressFamily::V4, v4_count);

    let mut reasons = Vec::new();
    for family in [AddressFamily::V6, AddressFamily::V4] {
        let (latest, avg) = match (history.latest(&family), history.average(&family)) {
            (Some(l), Some(a)) => (l, a),
            _ => continue,
        };
        if avg == 0.0 {
            continue;
        }

        let pct = round1(latest as f64 / avg * 100.0);
        let reason = if pct - 100.0 > cfg.dfz_threshold {
            Some(format!(
                "The {family} DFZ has increased by {}% from the {}hrs average {} to {latest} routes",
                round1(pct - 100.0),
                cfg.window_hours(),
                avg as u64
            ))
        } else if 100.0 - pct > cfg.dfz_threshold {
            Some(format!(
                "The {family} DFZ has decreased by {}% from the {}hrs average {} to {latest} routes",
                round1(100.0 - pct),
                cfg.window_hours(),
                avg as u64
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!(category = "dfz", %reason);
            reasons.push(reason);
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    fn seeded<K: Clone + Eq + std::hash::Hash + serde::Serialize>(
        key: K,
        samples: &[u64],
    ) -> History<K> {
        let mut h = History::new(24);
        // oldest first so the window ends up newest-first
        for &v in samples {
            h.record(key.clone(), v);
        }
        h
    }

    #[test]
    fn origin_increase_over_single_origin_baseline_is_flagged() {
        let cfg = cfg();
        let mut history = seeded("192.0.2.0/24".to_string(), &[1, 1, 1]);
        let snapshot = HashMap::from([("192.0.2.0/24".to_string(), 3u64)]);
        let reasons = check_origins(&cfg, &mut history, &snapshot);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("192.0.2.0/24"));
        assert!(reasons[0].contains("above"));
    }

    #[test]
    fn anycast_prefix_is_excluded_by_average_guard() {
        let cfg = cfg();
        let mut history = seeded("198.51.100.0/24".to_string(), &[5, 5, 5]);
        let snapshot = HashMap::from([("198.51.100.0/24".to_string(), 6u64)]);
        let reasons = check_origins(&cfg, &mut history, &snapshot);
        assert!(reasons.is_empty());
    }

    #[test]
    fn anycast_collapse_is_flagged() {
        let cfg = cfg();
        let mut history = seeded("198.51.100.0/24".to_string(), &[9, 9, 9, 9, 9]);
        let snapshot = HashMap::from([("198.51.100.0/24".to_string(), 1u64)]);
        let reasons = check_origins(&cfg, &mut history, &snapshot);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("below"));
    }

    #[test]
    fn prefix_count_collapse_is_flagged() {
        let cfg = cfg();
        let mut history = seeded(64512u32, &[1000, 1000, 1000]);
        let snapshot = HashMap::from([(64512u32, 50u64)]);
        // avg = 3050/4 = 762.5, latest/avg = 6.6%, drop = 93% > 85
        let reasons = check_prefixes(&cfg, &mut history, &snapshot);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("AS64512"));
    }

    #[test]
    fn steady_prefix_count_is_quiet() {
        let cfg = cfg();
        let mut history = seeded(64512u32, &[1000, 1000, 1000]);
        let snapshot = HashMap::from([(64512u32, 950u64)]);
        let reasons = check_prefixes(&cfg, &mut history, &snapshot);
        assert!(reasons.is_empty());
    }

    #[test]
    fn dfz_growth_below_threshold_is_quiet() {
        // 23 cycles at 900k routes, then 905k: +0.5% against the window
        // average, under the 1% default threshold.
        let cfg = cfg();
        let mut history = History::new(24);
        for _ in 0..23 {
            history.record(AddressFamily::V4, 900_000);
        }
        history.record(AddressFamily::V4, 905_000);
        let avg = history.average(&AddressFamily::V4).unwrap();
        let pct = round1(905_000f64 / avg * 100.0);
        assert!(pct - 100.0 < cfg.dfz_threshold);
    }

    #[test]
    fn dfz_increase_and_decrease_are_flagged_per_family() {
        let mut cfg = cfg();
        cfg.dfz_threshold = 1.0;
        let mut history = History::new(24);
        for _ in 0..23 {
            history.record(AddressFamily::V6, 1000);
            history.record(AddressFamily::V4, 1000);
        }
        // next cycle: v6 grows 5%, v4 shrinks 5%
        let mut prefixes: Vec<String> = Vec::new();
        for i in 0..1050 {
            prefixes.push(format!("2001:db8:{i:x}::/48"));
        }
        for i in 0..950 {
            prefixes.push(format!("10.{}.{}.0/24", i / 256, i % 256));
        }
        let reasons = check_dfz(&cfg, &mut history, prefixes.iter().map(String::as_str));
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].contains("IPv6") && reasons[0].contains("increased"));
        assert!(reasons[1].contains("IPv4") && reasons[1].contains("decreased"));
    }
}
