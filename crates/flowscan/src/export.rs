//! Export-ready rows and the JSON report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AnalyzeError;
use crate::parser::units::{format_bytes, format_duration, format_rate};
use crate::parser::ParseStats;
use crate::record::ConnectionRecord;
use crate::summary::BatchSummary;

/// One record flattened for display or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub protocol: String,
    pub source: String,
    pub destination: String,
    pub uptime: String,
    pub bytes: String,
    pub rate: String,
    pub flags: String,
    pub classification: String,
    pub connection_id: Option<String>,
    pub uptime_seconds: u64,
    pub byte_count: u64,
    pub rate_mbps: f64,
    pub rate_category: String,
    pub combined_score: f64,
}

impl ExportRow {
    pub fn from_record(record: &ConnectionRecord) -> Self {
        let rate = if record.metrics.zero_duration {
            "n/a".to_string()
        } else {
            format_rate(record.metrics.rate_mbps)
        };

        Self {
            protocol: record.protocol.to_string(),
            source: record.source.to_string(),
            destination: record.destination.to_string(),
            uptime: format_duration(record.uptime),
            bytes: format_bytes(record.bytes),
            rate,
            flags: record.flags_text.clone(),
            classification: record.metrics.classification.label().to_string(),
            connection_id: record.connection_id.clone(),
            uptime_seconds: record.uptime,
            byte_count: record.bytes,
            rate_mbps: record.metrics.rate_mbps,
            rate_category: record.metrics.rate_category.as_str().to_string(),
            combined_score: record.metrics.combined_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub generated_at: DateTime<Utc>,
    pub source_file: Option<String>,
    pub parse_stats: ParseStats,
    pub matched: usize,
    pub summary: BatchSummary,
    pub rows: Vec<ExportRow>,
}

impl ExportReport {
    pub fn new<'a, I>(source_file: Option<&Path>, parse_stats: ParseStats, matches: I) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionRecord> + Clone,
    {
        let rows: Vec<ExportRow> = matches.clone().into_iter().map(ExportRow::from_record).collect();
        Self {
            generated_at: Utc::now(),
            source_file: source_file.map(|p| p.display().to_string()),
            parse_stats,
            matched: rows.len(),
            summary: BatchSummary::from_records(matches),
            rows,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), AnalyzeError> {
        let file = File::create(path).map_err(|e| AnalyzeError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| AnalyzeError::io(path, e))?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "export written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::ElephantSubtype;
    use crate::metrics::test_support::record;
    use crate::metrics::MetricDeriver;

    fn records() -> Vec<ConnectionRecord> {
        let mut records = vec![record(6_920_640, 141_519_172_403), record(0, 10)];
        records[0].flags_text = "UIO N1* N3*".into();
        records[0].profile.elephant_subtype = Some(ElephantSubtype::N3);
        records[0].profile.elephant_flagged = true;
        MetricDeriver::default().derive(&mut records);
        records
    }

    #[test]
    fn test_export_row_strings() {
        let records = records();
        let row = ExportRow::from_record(&records[0]);
        assert_eq!(row.protocol, "TCP");
        assert_eq!(row.source, "10.0.0.1:40000");
        assert_eq!(row.uptime, "80.1d");
        assert_eq!(row.bytes, "131.8GB");
        assert_eq!(row.rate, "156.0Kbps");
        assert_eq!(row.flags, "UIO N1* N3*");
        assert_eq!(row.classification, "flagged-N3");

        assert_eq!(ExportRow::from_record(&records[1]).rate, "n/a");
    }

    #[test]
    fn test_write_json_report() {
        let records = records();
        let report = ExportReport::new(None, ParseStats::default(), records.iter());
        assert_eq!(report.matched, 2);
        assert_eq!(report.summary.flagged, 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        report.write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["matched"], 2);
        assert_eq!(value["rows"][0]["classification"], "flagged-N3");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_write_json_unwritable_path() {
        let report = ExportReport::new(None, ParseStats::default(), std::iter::empty());
        let dir = tempfile::tempdir().unwrap();
        let err = report.write_json(&dir.path().join("missing").join("out.json")).unwrap_err();
        assert!(matches!(err, AnalyzeError::Io { .. }));
    }
}
