use tracing::{debug, info, trace};

use super::block::BlockSplitter;
use super::build::build_record;
use super::formats::{ScanLocator, TemplateLocator};
use super::model::{ParseError, ParseMode, RawBlock};
use super::stats::ParseStats;
use super::traits::FieldLocator;
use crate::conf::ParseConfig;
use crate::error::AnalyzeError;
use crate::flags::FlagAnalyzer;
use crate::record::ConnectionRecord;

/// Runs the configured locators over each block, in order.
///
/// A template mismatch hands the block to the next locator; any other failure
/// skips the block and is counted.
pub struct RecordExtractor {
    locators: Vec<Box<dyn FieldLocator>>,
    analyzer: FlagAnalyzer,
}

impl RecordExtractor {
    pub fn new(config: &ParseConfig) -> Self {
        let locators: Vec<Box<dyn FieldLocator>> = match config.mode {
            ParseMode::Template => vec![Box::new(TemplateLocator)],
            ParseMode::Scan => vec![Box::new(ScanLocator)],
            // Order matters: strict first, permissive fallback
            ParseMode::Auto => vec![Box::new(TemplateLocator), Box::new(ScanLocator)],
        };

        Self {
            locators,
            analyzer: FlagAnalyzer::new(config.in_effect_rule),
        }
    }

    pub fn with_analyzer(mut self, analyzer: FlagAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Lazily extract records; failures are skipped and counted in
    /// [`Records::stats`].
    pub fn records<'a>(&'a self, input: &'a str) -> Records<'a> {
        Records {
            extractor: self,
            blocks: BlockSplitter::new(input),
            stats: ParseStats::default(),
        }
    }

    /// Extract every record. Fails only when no block produced a record.
    pub fn extract(&self, input: &str) -> Result<Extraction, AnalyzeError> {
        let mut iter = self.records(input);
        let records: Vec<ConnectionRecord> = iter.by_ref().collect();
        let stats = iter.stats();

        info!(
            blocks = stats.blocks_seen,
            parsed = stats.parsed,
            failed = stats.failed(),
            fallbacks = stats.scan_fallbacks,
            in_effect_rule = self.analyzer.rule().as_str(),
            "extraction finished"
        );

        if records.is_empty() {
            return Err(AnalyzeError::EmptyInput {
                blocks_seen: stats.blocks_seen,
                failed: stats.failed(),
            });
        }

        Ok(Extraction { records, stats })
    }

    fn extract_block(&self, block: &RawBlock<'_>, stats: &mut ParseStats) -> Option<ConnectionRecord> {
        let last = self.locators.len().saturating_sub(1);

        for (index, locator) in self.locators.iter().enumerate() {
            let result = locator
                .locate(block)
                .and_then(|fields| build_record(fields, &self.analyzer));

            match result {
                Ok(record) => {
                    stats.record_parse(locator.strategy(), index > 0);
                    return Some(record);
                }
                Err(ParseError::TemplateMismatch { line, reason }) if index < last => {
                    trace!(line, %reason, "template mismatch, falling back");
                }
                Err(e) => {
                    debug!(line = block.line, strategy = locator.strategy().as_str(), error = %e, "skipping block");
                    stats.record_failure(e.kind());
                    return None;
                }
            }
        }
        None
    }
}

/// Lazy record iterator with its own counters.
pub struct Records<'a> {
    extractor: &'a RecordExtractor,
    blocks: BlockSplitter<'a>,
    stats: ParseStats,
}

impl Records<'_> {
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

impl Iterator for Records<'_> {
    type Item = ConnectionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let block = self.blocks.next()?;
            self.stats.record_block();
            if let Some(record) = self.extractor.extract_block(&block, &mut self.stats) {
                return Some(record);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<ConnectionRecord>,
    pub stats: ParseStats,
}
