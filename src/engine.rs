//! Cycle orchestration: owns the long-lived histories, runs the detectors
//! over one cycle's inputs, scores and classifies the result.
//!
//! `Engine::evaluate` is the whole core -- deterministic over its inputs
//! apart from appending to the histories. The serve loop around it handles
//! cadence, output writing, and publishing to the API.

use crate::api::state::AppState;
use crate::collect::{CycleInputs, Providers};
use crate::config::Config;
use crate::detect::{self, Category, ReasonSet};
use crate::history::{AddressFamily, History};
use crate::output;
use crate::score::{self, Metrics, Status};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// The rolling baselines, one store per stateful detector. They live for
/// the whole process and are only ever appended to.
pub struct Histories {
    pub origins: History<String>,
    pub prefixes: History<u32>,
    pub rpki_invalid: History<String>,
    pub rpki_total: History<String>,
    pub dfz: History<AddressFamily>,
}

impl Histories {
    fn new(max_history: usize) -> Self {
        Self {
            origins: History::new(max_history),
            prefixes: History::new(max_history),
            rpki_invalid: History::new(max_history),
            rpki_total: History::new(max_history),
            dfz: History::new(max_history),
        }
    }
}

/// One cycle's complete outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub status: Status,
    pub reasons: ReasonSet,
    pub metrics: Metrics,
    /// Machine-readable snapshot: history contents plus status and metrics.
    pub results: serde_json::Value,
    pub checked_at: DateTime<Utc>,
}

pub struct Engine {
    cfg: Arc<Config>,
    histories: Histories,
}

impl Engine {
    pub fn new(cfg: Arc<Config>) -> Self {
        let histories = Histories::new(cfg.max_history);
        Self { cfg, histories }
    }

    /// Evaluate one cycle: update every category's baseline from the inputs
    /// it received, collect reasons, score, classify. Categories without
    /// input contribute zero reasons.
    pub fn evaluate(&mut self, inputs: &CycleInputs) -> CycleReport {
        let cfg = &self.cfg;
        let mut reasons = ReasonSet::default();

        if let Some(bgp) = &inputs.bgp {
            reasons.set(
                Category::Origins,
                detect::bgp::check_origins(cfg, &mut self.histories.origins, &bgp.origins_per_prefix),
            );
            reasons.set(
                Category::Prefixes,
                detect::bgp::check_prefixes(cfg, &mut self.histories.prefixes, &bgp.prefixes_per_asn),
            );
            reasons.set(
                Category::Dfz,
                detect::bgp::check_dfz(cfg, &mut self.histories.dfz, bgp.prefixes()),
            );
        }

        if let Some(rpki) = &inputs.rpki {
            reasons.set(
                Category::InvalidRoa,
                detect::rpki::check_invalids(cfg, &mut self.histories.rpki_invalid, &rpki.invalid_roa),
            );
            reasons.set(
                Category::TotalRoa,
                detect::rpki::check_totals(cfg, &mut self.histories.rpki_total, &rpki.total_roa),
            );
        }

        if let Some(dns_roots) = &inputs.dns_roots {
            reasons.set(Category::DnsRoot, detect::dns::check_roots(cfg, dns_roots));
        }

        if let Some(probes) = &inputs.probes {
            reasons.set(
                Category::AtlasConnected,
                detect::atlas::check_probes(cfg, probes),
            );
        }

        let metrics = score::score(&reasons, &cfg.weights);
        let status = Status::classify(metrics.weighted);
        let results = self.results_snapshot(inputs, status, metrics);

        CycleReport {
            status,
            reasons,
            metrics,
            results,
            checked_at: Utc::now(),
        }
    }

    /// The nested results document mirroring the history stores, in the
    /// shape the website consumes.
    fn results_snapshot(&self, inputs: &CycleInputs, status: Status, metrics: Metrics) -> serde_json::Value {
        let mut results = json!({
            "status": status,
            "metrics": metrics,
        });

        if inputs.bgp.is_some() {
            results["bgp"] = json!({
                "origins": &self.histories.origins,
                "prefixes": &self.histories.prefixes,
            });
        }
        if inputs.rpki.is_some() {
            results["rpki"] = json!({
                "invalid_roa": &self.histories.rpki_invalid,
                "total_roa": &self.histories.rpki_total,
            });
        }
        if let Some(dns_roots) = &inputs.dns_roots {
            results["atlas"] = json!({ "dns_roots": dns_roots });
        }

        results
    }
}

/// The monitor loop: one cycle every `update_frequency` seconds, adjusted
/// by the measured cycle duration, strictly serial. Runs until the process
/// exits; nothing inside a cycle is fatal.
pub async fn run(cfg: Arc<Config>, state: AppState) -> Result<()> {
    let providers = Providers::new(&cfg)?;
    let mut engine = Engine::new(cfg.clone());
    let interval = Duration::from_secs(cfg.update_frequency);

    loop {
        let before = Instant::now();
        let inputs = providers.gather(&cfg).await;
        let report = engine.evaluate(&inputs);
        let duration = before.elapsed();

        info!(
            status = %report.status,
            weighted = report.metrics.weighted,
            unweighted = report.metrics.unweighted,
            duration_secs = duration.as_secs(),
            "cycle complete"
        );

        if cfg.write_enabled {
            if let Err(err) = output::write_all(&cfg.output_dir, &report, duration) {
                error!(error = %err, "failed to write output files");
            }
        }

        state.publish(report, duration).await;

        if duration < interval {
            tokio::time::sleep(interval - duration).await;
        }
    }
}
