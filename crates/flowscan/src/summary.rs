//! Batch summary statistics over a set of records.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::Serialize;

use crate::record::ConnectionRecord;

const TOP_N: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_records: u64,
    pub total_bytes: u64,
    pub protocols: BTreeMap<String, u64>,
    pub rate_categories: BTreeMap<String, u64>,
    pub classifications: BTreeMap<String, u64>,
    pub top_sources: Vec<(String, u64)>,
    pub top_destinations: Vec<(String, u64)>,
    pub top_destination_ports: Vec<(u16, u64)>,
    pub max_uptime: u64,
    pub avg_uptime: f64,
    pub max_bytes: u64,
    pub flagged: u64,
    pub offloaded: u64,
    /// Share of total bytes carried by flagged records, in [0, 1]
    pub flagged_bytes_share: f64,
    pub offloaded_bytes_share: f64,
}

/// Most frequent keys, ties broken by key.
fn top<K: Ord + Clone + Hash>(counts: HashMap<K, u64>) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

impl BatchSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionRecord>,
    {
        let mut summary = Self::default();
        let mut sources: HashMap<String, u64> = HashMap::new();
        let mut destinations: HashMap<String, u64> = HashMap::new();
        let mut ports: HashMap<u16, u64> = HashMap::new();
        let mut uptime_sum: u128 = 0;
        let mut flagged_bytes: u64 = 0;
        let mut offloaded_bytes: u64 = 0;

        for record in records {
            summary.total_records += 1;
            summary.total_bytes = summary.total_bytes.saturating_add(record.bytes);
            summary.max_uptime = summary.max_uptime.max(record.uptime);
            summary.max_bytes = summary.max_bytes.max(record.bytes);
            uptime_sum += record.uptime as u128;

            *summary.protocols.entry(record.protocol.to_string()).or_default() += 1;
            *summary
                .rate_categories
                .entry(record.metrics.rate_category.as_str().to_string())
                .or_default() += 1;
            *summary
                .classifications
                .entry(record.metrics.classification.label().to_string())
                .or_default() += 1;

            *sources.entry(record.source.address.clone()).or_default() += 1;
            *destinations.entry(record.destination.address.clone()).or_default() += 1;
            if let Some(port) = record.destination.port {
                *ports.entry(port).or_default() += 1;
            }

            if record.profile.elephant_flagged {
                summary.flagged += 1;
                flagged_bytes = flagged_bytes.saturating_add(record.bytes);
            }
            if record.profile.offloaded {
                summary.offloaded += 1;
                offloaded_bytes = offloaded_bytes.saturating_add(record.bytes);
            }
        }

        if summary.total_records > 0 {
            summary.avg_uptime = uptime_sum as f64 / summary.total_records as f64;
        }
        summary.flagged_bytes_share = share(flagged_bytes, summary.total_bytes);
        summary.offloaded_bytes_share = share(offloaded_bytes, summary.total_bytes);
        summary.top_sources = top(sources);
        summary.top_destinations = top(destinations);
        summary.top_destination_ports = top(ports);
        summary
    }
}
