use serde::Serialize;
use tracing::debug;

use super::engine::{FilterEngine, FilterSnapshot, Predicate};
use super::sort::{sort_records, SortKey};
use crate::conf::QueryConfig;
use crate::error::ConfigError;
use crate::record::ConnectionRecord;

/// Candidate set before thresholds apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    #[default]
    All,
    FlagsOnly,
    OffloadedOnly,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::All => "all",
            QueryMode::FlagsOnly => "flags-only",
            QueryMode::OffloadedOnly => "offloaded-only",
        }
    }
}

/// A validated query. Build it with [`Query::from_config`] before reading any
/// input.
#[derive(Debug, Clone)]
pub struct Query {
    mode: QueryMode,
    narrow: Vec<Predicate>,
    thresholds: Vec<Predicate>,
    admit: Vec<Predicate>,
    sort: SortKey,
    limit: Option<usize>,
}

impl Query {
    pub fn from_config(config: &QueryConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mode = match (config.flags_only, config.offloaded_only) {
            (true, true) => return Err(ConfigError::ConflictingModes),
            (true, false) => QueryMode::FlagsOnly,
            (false, true) => QueryMode::OffloadedOnly,
            (false, false) => QueryMode::All,
        };

        let narrow = match mode {
            QueryMode::All => vec![],
            QueryMode::FlagsOnly => vec![Predicate::ElephantFlagged],
            QueryMode::OffloadedOnly => vec![Predicate::Offloaded],
        };

        let thresholds = vec![
            Predicate::MinUptimeHours(config.min_uptime_hours),
            Predicate::MinMegabytes(config.min_mb),
            Predicate::MinRateMbps(config.min_rate_mbps),
        ];

        let mut admit = Vec::new();
        if config.include_flags {
            admit.push(Predicate::ElephantFlagged);
        }
        if config.include_offloaded {
            admit.push(Predicate::Offloaded);
        }

        Ok(Self {
            mode,
            narrow,
            thresholds,
            admit,
            sort: config.sort,
            limit: config.limit,
        })
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Filter, then sort the matches. Records must already carry derived
    /// metrics.
    pub fn run<'a>(&self, records: &'a [ConnectionRecord]) -> QueryResult<'a> {
        let engine = FilterEngine::new(self.narrow.clone(), self.thresholds.clone(), self.admit.clone());

        let mut matches: Vec<&ConnectionRecord> = records.iter().filter(|r| engine.should_include(r)).collect();
        sort_records(&mut matches, self.sort);

        let stats = engine.stats();
        debug!(
            mode = self.mode.as_str(),
            sort = self.sort.as_str(),
            scanned = stats.scanned,
            matched = stats.matched,
            "query finished"
        );

        QueryResult {
            matches,
            limit: self.limit,
            stats,
        }
    }
}

/// Sorted matches plus a limited view.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    matches: Vec<&'a ConnectionRecord>,
    limit: Option<usize>,
    stats: FilterSnapshot,
}

impl<'a> QueryResult<'a> {
    /// Every match, sorted.
    pub fn all(&self) -> &[&'a ConnectionRecord] {
        &self.matches
    }

    /// The first `limit` matches.
    pub fn top(&self) -> &[&'a ConnectionRecord] {
        let n = self.limit.map_or(self.matches.len(), |l| l.min(self.matches.len()));
        &self.matches[..n]
    }

    pub fn stats(&self) -> FilterSnapshot {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
