use std::borrow::Borrow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::ConnectionRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Uptime,
    #[default]
    Bytes,
    Rate,
    /// Combined score
    #[serde(alias = "score")]
    Both,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Uptime => "uptime",
            SortKey::Bytes => "bytes",
            SortKey::Rate => "rate",
            SortKey::Both => "both",
        }
    }

    /// Descending order for this key. Zero-duration records sort after every
    /// rated record under [`SortKey::Rate`].
    pub fn compare(&self, a: &ConnectionRecord, b: &ConnectionRecord) -> Ordering {
        match self {
            SortKey::Uptime => b.uptime.cmp(&a.uptime),
            SortKey::Bytes => b.bytes.cmp(&a.bytes),
            SortKey::Rate => a
                .metrics
                .zero_duration
                .cmp(&b.metrics.zero_duration)
                .then_with(|| b.metrics.rate_mbps.total_cmp(&a.metrics.rate_mbps)),
            SortKey::Both => b.metrics.combined_score.total_cmp(&a.metrics.combined_score),
        }
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uptime" => Ok(SortKey::Uptime),
            "bytes" => Ok(SortKey::Bytes),
            "rate" => Ok(SortKey::Rate),
            "both" | "score" => Ok(SortKey::Both),
            other => Err(ConfigError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Stable descending sort; ties keep their input order.
pub fn sort_records<R: Borrow<ConnectionRecord>>(records: &mut [R], key: SortKey) {
    records.sort_by(|a, b| {
        let (a, b): (&ConnectionRecord, &ConnectionRecord) = (a.borrow(), b.borrow());
        key.compare(a, b)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::record;
    use crate::metrics::MetricDeriver;
    use proptest::prelude::*;

    fn tagged(rows: &[(u64, u64)]) -> Vec<ConnectionRecord> {
        let mut records: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(i, &(uptime, bytes))| {
                let mut r = record(uptime, bytes);
                r.connection_id = Some(i.to_string());
                r
            })
            .collect();
        MetricDeriver::default().derive(&mut records);
        records
    }

    fn ids(records: &[&ConnectionRecord]) -> Vec<String> {
        records.iter().filter_map(|r| r.connection_id.clone()).collect()
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("Both".parse::<SortKey>().unwrap(), SortKey::Both);
        assert_eq!("bytes".parse::<SortKey>().unwrap(), SortKey::Bytes);
        assert!(matches!("size".parse::<SortKey>(), Err(ConfigError::UnknownSortKey(k)) if k == "size"));
    }

    #[test]
    fn test_sort_descending_and_stable() {
        let records = tagged(&[(10, 5), (30, 5), (20, 9), (30, 1)]);
        let mut view: Vec<&ConnectionRecord> = records.iter().collect();

        sort_records(&mut view, SortKey::Uptime);
        assert_eq!(ids(&view), vec!["1", "3", "2", "0"]);

        sort_records(&mut view, SortKey::Bytes);
        // 1 and 0 tie on bytes; previous order (1 before 0) is kept
        assert_eq!(ids(&view), vec!["2", "1", "0", "3"]);
    }

    #[test]
    fn test_rate_sort_puts_zero_duration_last() {
        let records = tagged(&[(0, 1_000_000), (10, 10), (10, 100), (0, 5)]);
        let mut view: Vec<&ConnectionRecord> = records.iter().collect();
        sort_records(&mut view, SortKey::Rate);
        assert_eq!(ids(&view), vec!["2", "1", "0", "3"]);
    }

    #[test]
    fn test_sort_owned_records() {
        let mut records = tagged(&[(1, 1), (2, 2)]);
        sort_records(&mut records, SortKey::Both);
        assert_eq!(records[0].connection_id.as_deref(), Some("1"));
    }

    proptest! {
        #[test]
        fn prop_sort_is_stable(rows in prop::collection::vec((0u64..5, 0u64..5), 0..30), key in 0usize..4) {
            let key = [SortKey::Uptime, SortKey::Bytes, SortKey::Rate, SortKey::Both][key];
            let records = tagged(&rows);
            let mut view: Vec<&ConnectionRecord> = records.iter().collect();
            sort_records(&mut view, key);

            for pair in view.windows(2) {
                let order = key.compare(pair[0], pair[1]);
                prop_assert_ne!(order, Ordering::Greater);
                if order == Ordering::Equal {
                    let a: usize = pair[0].connection_id.as_deref().unwrap_or("0").parse().unwrap();
                    let b: usize = pair[1].connection_id.as_deref().unwrap_or("0").parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
