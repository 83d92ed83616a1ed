//! Run: one analysis from CLI arguments to output.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use super::cli::Cli;
use super::pipeline::{analyze, load_input};
use super::render;
use crate::conf::AnalyzerConfig;
use crate::export::ExportReport;
use crate::summary::BatchSummary;

pub fn run(cli: &Cli, config: &AnalyzerConfig) -> Result<()> {
    let input = load_input(&cli.file).with_context(|| format!("failed to read {}", cli.file.display()))?;
    let analysis = analyze(&input, config).with_context(|| format!("failed to analyze {}", cli.file.display()))?;
    let result = analysis.run_query();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.quiet {
        render::write_parse_stats(&mut out, &analysis.parse_stats)?;
    }
    render::write_table(&mut out, analysis.query(), &result)?;
    if cli.summary {
        render::write_summary(&mut out, &BatchSummary::from_records(result.all().iter().copied()))?;
    }
    out.flush()?;

    if let Some(path) = &cli.export {
        ExportReport::new(Some(&cli.file), analysis.parse_stats, result.all().iter().copied())
            .write_json(path)
            .with_context(|| format!("failed to export to {}", path.display()))?;
    }

    info!(matched = result.len(), "done");
    Ok(())
}
