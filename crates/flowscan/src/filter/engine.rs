use std::cell::Cell;

use serde::Serialize;

use crate::record::ConnectionRecord;

/// A single, independent test on a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    MinUptimeHours(f64),
    /// MiB
    MinMegabytes(f64),
    MinRateMbps(f64),
    /// An elephant flag is in effect
    ElephantFlagged,
    Offloaded,
}

impl Predicate {
    #[inline]
    pub fn matches(&self, record: &ConnectionRecord) -> bool {
        match self {
            Predicate::MinUptimeHours(min) => record.uptime_hours() >= *min,
            Predicate::MinMegabytes(min) => record.megabytes() >= *min,
            Predicate::MinRateMbps(min) => record.metrics.rate_mbps >= *min,
            Predicate::ElephantFlagged => record.profile.elephant_flagged,
            Predicate::Offloaded => record.profile.offloaded,
        }
    }
}

/// Per-engine counters. An engine lives for one query on one thread.
#[derive(Debug, Default)]
pub struct FilterStats {
    pub records_scanned: Cell<u64>,
    pub records_matched: Cell<u64>,
}

/// Read-only copy of [`FilterStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSnapshot {
    pub scanned: u64,
    pub matched: u64,
}

/// Three predicate groups:
///
/// - `narrow`: all must hold (candidate set)
/// - `thresholds`: all must hold, unless...
/// - `admit`: any one admits the record regardless of thresholds
///
/// Each group is order-independent.
#[derive(Debug, Default)]
pub struct FilterEngine {
    narrow: Vec<Predicate>,
    thresholds: Vec<Predicate>,
    admit: Vec<Predicate>,
    stats: FilterStats,
}

impl FilterEngine {
    pub fn new(narrow: Vec<Predicate>, thresholds: Vec<Predicate>, admit: Vec<Predicate>) -> Self {
        Self {
            narrow,
            thresholds,
            admit,
            stats: FilterStats::default(),
        }
    }

    #[inline]
    pub fn should_include(&self, record: &ConnectionRecord) -> bool {
        self.stats.records_scanned.set(self.stats.records_scanned.get() + 1);

        let include = self.narrow.iter().all(|p| p.matches(record))
            && (self.thresholds.iter().all(|p| p.matches(record))
                || self.admit.iter().any(|p| p.matches(record)));

        if include {
            self.stats.records_matched.set(self.stats.records_matched.get() + 1);
        }

        include
    }

    pub fn stats(&self) -> FilterSnapshot {
        FilterSnapshot {
            scanned: self.stats.records_scanned.get(),
            matched: self.stats.records_matched.get(),
        }
    }
}
