use serde::Serialize;

use super::model::{FailureKind, ParseStrategy};

/// Extraction counters for one run.
///
/// Owned by the [`super::extractor::Records`] iterator that fills it; never
/// shared between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub blocks_seen: u64,
    pub parsed: u64,
    pub structural_failures: u64,
    pub format_failures: u64,
    /// Records located by the strict template
    pub template_matches: u64,
    /// Records located by the scanner after the template rejected the block
    pub scan_fallbacks: u64,
    /// Records located by the scanner when it is the only strategy
    pub scan_matches: u64,
}

impl ParseStats {
    #[inline]
    pub fn record_block(&mut self) {
        self.blocks_seen += 1;
    }

    #[inline]
    pub fn record_parse(&mut self, strategy: ParseStrategy, fell_back: bool) {
        self.parsed += 1;
        match (strategy, fell_back) {
            (ParseStrategy::Template, _) => self.template_matches += 1,
            (ParseStrategy::Scan, true) => self.scan_fallbacks += 1,
            (ParseStrategy::Scan, false) => self.scan_matches += 1,
        }
    }

    #[inline]
    pub fn record_failure(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::Structural => self.structural_failures += 1,
            FailureKind::Format => self.format_failures += 1,
        }
    }

    pub fn failed(&self) -> u64 {
        self.structural_failures + self.format_failures
    }

    /// Parsed share of attempted blocks; 1.0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        let attempts = self.parsed + self.failed();
        if attempts > 0 {
            self.parsed as f64 / attempts as f64
        } else {
            1.0
        }
    }
}
