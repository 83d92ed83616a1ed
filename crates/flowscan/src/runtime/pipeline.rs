//! Pipeline: extract → derive → query, single-threaded.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::conf::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::filter::{Query, QueryResult};
use crate::metrics::{BatchMaxima, MetricDeriver};
use crate::parser::{ParseStats, RecordExtractor};
use crate::record::ConnectionRecord;

/// Read the whole input once. Invalid UTF-8 is replaced, not rejected.
pub fn load_input(path: &Path) -> Result<String, AnalyzeError> {
    let raw = fs::read(path).map_err(|e| AnalyzeError::io(path, e))?;
    let text = match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), "input is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(text)
}

/// Records with derived metrics, ready to query.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<ConnectionRecord>,
    pub parse_stats: ParseStats,
    pub maxima: BatchMaxima,
    query: Query,
}

impl Analysis {
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn run_query(&self) -> QueryResult<'_> {
        self.query.run(&self.records)
    }
}

/// Validate the configuration, then extract and derive. Configuration
/// errors surface before the input is touched.
pub fn analyze(input: &str, config: &AnalyzerConfig) -> Result<Analysis, AnalyzeError> {
    config.validate()?;
    let query = Query::from_config(&config.query)?;

    let extraction = RecordExtractor::new(&config.parse).extract(input)?;
    let mut records = extraction.records;

    let maxima = MetricDeriver::new(config.classify, config.score).derive(&mut records);
    info!(records = records.len(), "metrics derived");

    Ok(Analysis {
        records,
        parse_stats: extraction.stats,
        maxima,
        query,
    })
}
