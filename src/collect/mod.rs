//! Data providers -- the external measurement sources a cycle consumes.
//!
//! Providers are fallible by design: a provider that cannot deliver this
//! cycle logs a warning and its category is skipped, never aborting the
//! cycle.

pub mod atlas;
pub mod bgp;
pub mod rpki;

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// User-Agent sent with every upstream request.
pub const USER_AGENT: &str = "howfuckedistheinternet.com";

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A source of one category's raw snapshot.
#[async_trait]
pub trait Provider: Send + Sync {
    type Snapshot;

    fn name(&self) -> &'static str;

    async fn collect(&self) -> Result<Self::Snapshot, CollectError>;
}

/// Run a provider, degrading a failure to `None` for this cycle.
pub async fn try_collect<P: Provider>(provider: &P) -> Option<P::Snapshot> {
    match provider.collect().await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!(provider = provider.name(), error = %err, "collection failed, skipping this cycle");
            None
        }
    }
}

/// Everything the detectors consume in one cycle. `None` means the category
/// is disabled or its provider failed.
#[derive(Debug, Default)]
pub struct CycleInputs {
    pub bgp: Option<bgp::BgpSnapshot>,
    pub rpki: Option<rpki::RpkiSnapshot>,
    pub dns_roots: Option<atlas::RootDnsSnapshot>,
    pub probes: Option<atlas::ProbeStatus>,
}

/// The full provider set, sharing one HTTP client.
pub struct Providers {
    bgp: bgp::BgpTableProvider,
    rpki: rpki::RpkiStatusProvider,
    roots: atlas::RootDnsProvider,
    probes: atlas::ProbeStatusProvider,
}

impl Providers {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            bgp: bgp::BgpTableProvider::new(client.clone(), cfg.bgp_table_url.clone()),
            rpki: rpki::RpkiStatusProvider::new(client.clone(), cfg.rpki_status_url.clone()),
            roots: atlas::RootDnsProvider::new(client.clone(), cfg.atlas_api_url.clone()),
            probes: atlas::ProbeStatusProvider::new(client, cfg.atlas_api_url.clone()),
        })
    }

    /// Fetch the enabled categories for one cycle.
    pub async fn gather(&self, cfg: &Config) -> CycleInputs {
        let mut inputs = CycleInputs::default();
        if cfg.bgp_enabled {
            inputs.bgp = try_collect(&self.bgp).await;
        }
        if cfg.rpki_enabled {
            inputs.rpki = try_collect(&self.rpki).await;
        }
        if cfg.atlas_enabled {
            inputs.dns_roots = try_collect(&self.roots).await;
            inputs.probes = try_collect(&self.probes).await;
        }
        inputs
    }
}
