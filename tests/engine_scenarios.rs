//! End-to-end engine scenarios: multi-cycle histories driven through
//! `Engine::evaluate` with hand-built provider snapshots.

use howfucked::collect::atlas::{ProbeStatus, RootCheck, RootDnsSnapshot};
use howfucked::collect::bgp::BgpSnapshot;
use howfucked::collect::rpki::RpkiSnapshot;
use howfucked::collect::CycleInputs;
use howfucked::config::Config;
use howfucked::detect::Category;
use howfucked::engine::Engine;
use howfucked::score::Status;
use std::collections::HashMap;
use std::sync::Arc;

fn engine() -> Engine {
    Engine::new(Arc::new(Config::default()))
}

fn bgp_cycle(origins: &[(&str, u64)], prefixes: &[(u32, u64)]) -> CycleInputs {
    CycleInputs {
        bgp: Some(BgpSnapshot {
            origins_per_prefix: origins.iter().map(|(p, n)| (p.to_string(), *n)).collect(),
            prefixes_per_asn: prefixes.iter().copied().collect(),
        }),
        ..Default::default()
    }
}

fn rpki_cycle(invalid: &[(&str, u64)], total: &[(&str, u64)]) -> CycleInputs {
    CycleInputs {
        rpki: Some(RpkiSnapshot {
            invalid_roa: invalid.iter().map(|(r, n)| (r.to_string(), *n)).collect(),
            total_roa: total.iter().map(|(r, n)| (r.to_string(), *n)).collect(),
        }),
        ..Default::default()
    }
}

#[test]
fn hijack_suspicion_fires_only_for_near_single_origin_prefixes() {
    let mut engine = engine();

    // P settles at one origin, Q is anycast with five
    for _ in 0..3 {
        let report = engine.evaluate(&bgp_cycle(
            &[("203.0.113.0/24", 1), ("198.51.100.0/24", 5)],
            &[],
        ));
        assert_eq!(report.reasons.count(Category::Origins), 0);
    }

    // both gain an origin; only P is suspicious
    let report = engine.evaluate(&bgp_cycle(
        &[("203.0.113.0/24", 3), ("198.51.100.0/24", 6)],
        &[],
    ));
    let origins = report.reasons.get(Category::Origins);
    assert_eq!(origins.len(), 1);
    assert!(origins[0].contains("203.0.113.0/24"));
}

#[test]
fn prefix_withdrawal_takes_hold_against_the_rolling_average() {
    let mut engine = engine();
    for _ in 0..5 {
        engine.evaluate(&bgp_cycle(&[], &[(64512, 1000)]));
    }
    let report = engine.evaluate(&bgp_cycle(&[], &[(64512, 50)]));
    let prefixes = report.reasons.get(Category::Prefixes);
    assert_eq!(prefixes.len(), 1);
    assert!(prefixes[0].contains("AS64512"));
}

#[test]
fn roa_outage_scenario_crosses_the_ninety_percent_threshold() {
    let mut engine = engine();
    for _ in 0..3 {
        let report = engine.evaluate(&rpki_cycle(&[("R", 0)], &[("R", 1000)]));
        assert_eq!(report.status, Status::Baseline);
    }

    let report = engine.evaluate(&rpki_cycle(&[("R", 0)], &[("R", 50)]));
    assert_eq!(report.reasons.count(Category::TotalRoa), 1);
    // one total_roa reason at weight 5 is the >0 tier
    assert_eq!(report.status, Status::JustABit);
    assert!((report.metrics.weighted - 5.0).abs() < 1e-9);
}

#[test]
fn invalid_roa_rise_is_flagged_immediately() {
    let mut engine = engine();
    engine.evaluate(&rpki_cycle(&[("R", 4)], &[("R", 1000)]));
    engine.evaluate(&rpki_cycle(&[("R", 4)], &[("R", 1000)]));
    let report = engine.evaluate(&rpki_cycle(&[("R", 9)], &[("R", 1005)]));
    assert_eq!(report.reasons.count(Category::InvalidRoa), 1);
}

#[test]
fn combined_atlas_trouble_stacks_weights() {
    let mut engine = engine();
    let failing = RootCheck {
        total: 100,
        failed: (0..30).collect(),
    };
    let inputs = CycleInputs {
        dns_roots: Some(RootDnsSnapshot {
            v6: HashMap::from([("k.root-servers.net".to_string(), failing.clone())]),
            v4: HashMap::new(),
        }),
        probes: Some(ProbeStatus {
            connected: (0..70).collect(),
            disconnected: (70..100).collect(),
        }),
        ..Default::default()
    };
    let report = engine.evaluate(&inputs);
    // dns_root 1*10 + atlas_connected 1*1 = 11, the >10 tier
    assert_eq!(report.metrics.unweighted, 2);
    assert_eq!(report.status, Status::Somewhat);
}

#[test]
fn recovery_returns_to_baseline_as_the_window_refills() {
    let mut engine = engine();
    for _ in 0..3 {
        engine.evaluate(&rpki_cycle(&[("R", 2)], &[("R", 1000)]));
    }
    let spiked = engine.evaluate(&rpki_cycle(&[("R", 10)], &[("R", 1000)]));
    assert_eq!(spiked.reasons.count(Category::InvalidRoa), 1);

    // back to two invalids: 2 is below the inflated average, so quiet
    let recovered = engine.evaluate(&rpki_cycle(&[("R", 2)], &[("R", 1000)]));
    assert_eq!(recovered.reasons.count(Category::InvalidRoa), 0);
    assert_eq!(recovered.status, Status::Baseline);
}
