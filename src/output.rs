//! Flat-file outputs, overwritten in place each cycle. The website serves
//! these directly: the status line, the reasons list as an HTML fragment,
//! a timestamp/duration pair, and the full results document.

use crate::engine::CycleReport;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const STATUS_FILE: &str = "status.txt";
pub const WHY_FILE: &str = "why.txt";
pub const TIMESTAMP_FILE: &str = "timestamp.txt";
pub const RESULTS_FILE: &str = "results.json";

/// Write all four output files for a completed cycle.
pub fn write_all(dir: &Path, report: &CycleReport, duration: Duration) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    write_status(dir, report)?;
    write_why(dir, report)?;
    write_timestamp(dir, duration)?;
    write_results(dir, report)?;
    Ok(())
}

fn write_status(dir: &Path, report: &CycleReport) -> Result<()> {
    fs::write(dir.join(STATUS_FILE), format!("{}\n", report.status)).context("writing status file")
}

/// Reasons as an HTML fragment: a heading per non-empty category, reasons
/// in lexicographic order underneath.
fn write_why(dir: &Path, report: &CycleReport) -> Result<()> {
    let mut body = String::new();
    for (category, reasons) in report.reasons.iter() {
        body.push_str(&format!("<h4>{category}:</h4>\n"));
        body.push_str("<ul class=\"why-list\">\n");
        let mut sorted: Vec<&String> = reasons.iter().collect();
        sorted.sort();
        for reason in sorted {
            body.push_str(&format!("<li><var>{reason}</var>\n"));
        }
        body.push_str("</ul>");
    }
    fs::write(dir.join(WHY_FILE), body).context("writing why file")
}

fn write_timestamp(dir: &Path, duration: Duration) -> Result<()> {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    fs::write(
        dir.join(TIMESTAMP_FILE),
        format!("{}\n{}\n", stamp.replace('T', " "), duration.as_secs()),
    )
    .context("writing timestamp file")
}

fn write_results(dir: &Path, report: &CycleReport) -> Result<()> {
    let doc = serde_json::to_string(&report.results).context("serializing results")?;
    fs::write(dir.join(RESULTS_FILE), doc).context("writing results file")
}
