//! BGP/DFZ table snapshot from the bgp.tools line-delimited JSON export.

use super::{CollectError, Provider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One route entry from the table export. Only the fields the engine
/// aggregates on; everything else in the line is ignored.
#[derive(Debug, Deserialize)]
struct TableEntry {
    #[serde(rename = "CIDR")]
    cidr: String,
    #[serde(rename = "ASN")]
    asn: u32,
}

/// Per-cycle aggregates derived from the full table.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BgpSnapshot {
    /// Distinct announcing origins per prefix (entry count per CIDR).
    pub origins_per_prefix: HashMap<String, u64>,
    /// Announced prefixes per ASN (entry count per origin).
    pub prefixes_per_asn: HashMap<u32, u64>,
}

impl BgpSnapshot {
    /// The set of observed prefixes, for the DFZ address-family partition.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.origins_per_prefix.keys().map(String::as_str)
    }
}

/// Parse the line-delimited export, stopping at the first undecodable line
/// (the feed terminates with a bare newline).
pub(crate) fn parse_table(text: &str) -> BgpSnapshot {
    let mut snapshot = BgpSnapshot::default();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: TableEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(_) => break,
        };
        *snapshot.prefixes_per_asn.entry(entry.asn).or_default() += 1;
        *snapshot.origins_per_prefix.entry(entry.cidr).or_default() += 1;
    }
    snapshot
}

pub struct BgpTableProvider {
    client: reqwest::Client,
    url: String,
}

impl BgpTableProvider {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Provider for BgpTableProvider {
    type Snapshot = BgpSnapshot;

    fn name(&self) -> &'static str {
        "bgp_table"
    }

    async fn collect(&self) -> Result<BgpSnapshot, CollectError> {
        let text = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_table(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lines_aggregate_per_prefix_and_asn() {
        let text = concat!(
            r#"{"CIDR":"192.0.2.0/24","ASN":64512,"Hits":100}"#,
            "\n",
            r#"{"CIDR":"192.0.2.0/24","ASN":64513,"Hits":90}"#,
            "\n",
            r#"{"CIDR":"198.51.100.0/24","ASN":64512,"Hits":80}"#,
            "\n",
            r#"{"CIDR":"2001:db8::/32","ASN":64514,"Hits":70}"#,
            "\n",
        );
        let snapshot = parse_table(text);
        assert_eq!(snapshot.origins_per_prefix["192.0.2.0/24"], 2);
        assert_eq!(snapshot.origins_per_prefix["198.51.100.0/24"], 1);
        assert_eq!(snapshot.prefixes_per_asn[&64512], 2);
        assert_eq!(snapshot.prefixes_per_asn[&64514], 1);
        assert_eq!(snapshot.prefixes().count(), 3);
    }

    #[test]
    fn parsing_stops_at_the_first_bad_line() {
        let text = concat!(
            r#"{"CIDR":"192.0.2.0/24","ASN":64512}"#,
            "\n",
            "not json\n",
            r#"{"CIDR":"198.51.100.0/24","ASN":64513}"#,
            "\n",
        );
        let snapshot = parse_table(text);
        assert_eq!(snapshot.origins_per_prefix.len(), 1);
    }
}
