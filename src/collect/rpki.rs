//! RPKI ROA validation counts from the Routinator status API.

use super::{CollectError, Provider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    repositories: HashMap<String, RepoCounts>,
}

#[derive(Debug, Deserialize)]
struct RepoCounts {
    #[serde(rename = "validROAs")]
    valid_roas: f64,
    #[serde(rename = "invalidROAs")]
    invalid_roas: f64,
}

/// Per-repository invalid and total (valid + invalid) ROA counts.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RpkiSnapshot {
    pub invalid_roa: HashMap<String, u64>,
    pub total_roa: HashMap<String, u64>,
}

pub(crate) fn snapshot_from(response: StatusResponse) -> RpkiSnapshot {
    let mut snapshot = RpkiSnapshot::default();
    for (repo, counts) in response.repositories {
        snapshot
            .invalid_roa
            .insert(repo.clone(), counts.invalid_roas as u64);
        snapshot
            .total_roa
            .insert(repo, (counts.valid_roas + counts.invalid_roas) as u64);
    }
    snapshot
}

pub struct RpkiStatusProvider {
    client: reqwest::Client,
    url: String,
}

impl RpkiStatusProvider {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Provider for RpkiStatusProvider {
    type Snapshot = RpkiSnapshot;

    fn name(&self) -> &'static str {
        "rpki_status"
    }

    async fn collect(&self) -> Result<RpkiSnapshot, CollectError> {
        let response: StatusResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot_from(response))
    }
}
