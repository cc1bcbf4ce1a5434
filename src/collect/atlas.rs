//! RIPE Atlas measurements: root-server DNS reachability and the built-in
//! probe connection measurement.

use super::{CollectError, Provider};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// The built-in connection measurement reporting probe connect/disconnect
/// events.
const CONNECTION_MEASUREMENT_ID: u64 = 7000;

/// Measurement IDs for the root-server DNSoUDP SOA checks, IPv4.
const V4_ROOT_MEASUREMENTS: [(u64, &str); 13] = [
    (10009, "a.root-servers.net"),
    (10010, "b.root-servers.net"),
    (10011, "c.root-servers.net"),
    (10012, "d.root-servers.net"),
    (10013, "e.root-servers.net"),
    (10004, "f.root-servers.net"),
    (10014, "g.root-servers.net"),
    (10015, "h.root-servers.net"),
    (10005, "i.root-servers.net"),
    (10016, "j.root-servers.net"),
    (10001, "k.root-servers.net"),
    (10008, "l.root-servers.net"),
    (10009, "m.root-servers.net"),
];

/// Measurement IDs for the root-server DNSoUDP SOA checks, IPv6.
const V6_ROOT_MEASUREMENTS: [(u64, &str); 13] = [
    (10509, "a.root-servers.net"),
    (10510, "b.root-servers.net"),
    (10511, "c.root-servers.net"),
    (10512, "d.root-servers.net"),
    (10513, "e.root-servers.net"),
    (10504, "f.root-servers.net"),
    (10514, "g.root-servers.net"),
    (10515, "h.root-servers.net"),
    (10505, "i.root-servers.net"),
    (10516, "j.root-servers.net"),
    (10501, "k.root-servers.net"),
    (10508, "l.root-servers.net"),
    (10506, "m.root-servers.net"),
];

/// One probe's latest result for a measurement. Only the fields the checks
/// read; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct MeasurementResult {
    #[serde(default)]
    pub(crate) prb_id: Option<u64>,
    #[serde(default)]
    pub(crate) error: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) event: Option<String>,
}

/// Reachability numbers for one root server: how many probes reported, and
/// which of them failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootCheck {
    pub total: usize,
    pub failed: Vec<u64>,
}

/// Per-family root-server reachability. A root whose measurement fetch
/// failed this cycle is absent from its map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootDnsSnapshot {
    pub v6: HashMap<String, RootCheck>,
    pub v4: HashMap<String, RootCheck>,
}

/// Probe ids partitioned by their latest connection event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeStatus {
    pub connected: Vec<u64>,
    pub disconnected: Vec<u64>,
}

pub(crate) fn root_check(results: &[MeasurementResult]) -> RootCheck {
    RootCheck {
        total: results.len(),
        failed: results
            .iter()
            .filter(|r| r.error.is_some())
            .filter_map(|r| r.prb_id)
            .collect(),
    }
}

pub(crate) fn partition_events(results: &[MeasurementResult]) -> ProbeStatus {
    let mut status = ProbeStatus::default();
    for result in results {
        let Some(id) = result.prb_id else { continue };
        match result.event.as_deref() {
            Some("connect") => status.connected.push(id),
            Some("disconnect") => status.disconnected.push(id),
            _ => {}
        }
    }
    status
}

async fn fetch_results(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
) -> Result<Vec<MeasurementResult>, CollectError> {
    let url = format!("{base_url}{id}/latest/");
    Ok(client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?)
}

pub struct RootDnsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RootDnsProvider {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn fetch_family(&self, measurements: &[(u64, &'static str)]) -> HashMap<String, RootCheck> {
        let fetches = measurements.iter().map(|&(id, server)| async move {
            (server, fetch_results(&self.client, &self.base_url, id).await)
        });

        let mut roots = HashMap::new();
        for (server, result) in join_all(fetches).await {
            match result {
                Ok(results) => {
                    roots.insert(server.to_string(), root_check(&results));
                }
                // A single unreachable measurement drops that root only
                Err(err) => warn!(%server, error = %err, "failed to fetch root DNS measurement"),
            }
        }
        roots
    }
}

#[async_trait]
impl Provider for RootDnsProvider {
    type Snapshot = RootDnsSnapshot;

    fn name(&self) -> &'static str {
        "root_dns"
    }

    async fn collect(&self) -> Result<RootDnsSnapshot, CollectError> {
        Ok(RootDnsSnapshot {
            v6: self.fetch_family(&V6_ROOT_MEASUREMENTS).await,
            v4: self.fetch_family(&V4_ROOT_MEASUREMENTS).await,
        })
    }
}

pub struct ProbeStatusProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ProbeStatusProvider {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl Provider for ProbeStatusProvider {
    type Snapshot = ProbeStatus;

    fn name(&self) -> &'static str {
        "probe_status"
    }

    async fn collect(&self) -> Result<ProbeStatus, CollectError> {
        let url = format!("{}{}/latest", self.base_url, CONNECTION_MEASUREMENT_ID);
        let results: Vec<MeasurementResult> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(partition_events(&results))
    }
}
