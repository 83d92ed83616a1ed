//! Render: plain-text console output.

use std::io::{self, Write};

use crate::export::ExportRow;
use crate::filter::{Query, QueryResult};
use crate::metrics::RateCategory;
use crate::parser::units::{format_bytes, format_duration};
use crate::parser::ParseStats;
use crate::summary::BatchSummary;

const RULE_WIDTH: usize = 118;

pub fn write_parse_stats<W: Write>(out: &mut W, stats: &ParseStats) -> io::Result<()> {
    writeln!(
        out,
        "Parsed {} of {} blocks ({:.1}% success): {} structural, {} format failures; {} template, {} scan fallback",
        stats.parsed,
        stats.blocks_seen,
        stats.success_rate() * 100.0,
        stats.structural_failures,
        stats.format_failures,
        stats.template_matches,
        stats.scan_fallbacks,
    )
}

pub fn write_table<W: Write>(out: &mut W, query: &Query, result: &QueryResult<'_>) -> io::Result<()> {
    let top = result.top();
    let limit = match query.limit() {
        Some(limit) => format!("limit {}", limit),
        None => "no limit".to_string(),
    };
    writeln!(
        out,
        "Elephant flows: {} matched ({}), sorted by {}, showing {} ({})",
        result.len(),
        query.mode().as_str(),
        query.sort_key().as_str(),
        top.len(),
        limit,
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{:<4} {:<5} {:<28} {:<28} {:>8} {:>9} {:>11} {:<12} {}",
        "#", "PROTO", "SOURCE", "DESTINATION", "UPTIME", "BYTES", "RATE", "CLASS", "FLAGS"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for (i, record) in top.iter().enumerate() {
        let row = ExportRow::from_record(record);
        writeln!(
            out,
            "{:<4} {:<5} {:<28} {:<28} {:>8} {:>9} {:>11} {:<12} {}",
            i + 1,
            row.protocol,
            row.source,
            row.destination,
            row.uptime,
            row.bytes,
            row.rate,
            row.classification,
            row.flags,
        )?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Summary")?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "Records:          {}", summary.total_records)?;
    writeln!(out, "Total bytes:      {}", format_bytes(summary.total_bytes))?;
    writeln!(out, "Max uptime:       {}", format_duration(summary.max_uptime))?;
    writeln!(out, "Avg uptime:       {}", format_duration(summary.avg_uptime.round() as u64))?;
    writeln!(out, "Max bytes:        {}", format_bytes(summary.max_bytes))?;
    writeln!(
        out,
        "Flagged:          {} ({:.1}% of bytes)",
        summary.flagged,
        summary.flagged_bytes_share * 100.0
    )?;
    writeln!(
        out,
        "Offloaded:        {} ({:.1}% of bytes)",
        summary.offloaded,
        summary.offloaded_bytes_share * 100.0
    )?;

    let sections: [(&str, Vec<(String, u64)>); 5] = [
        ("Protocols", summary.protocols.iter().map(|(k, v)| (k.clone(), *v)).collect()),
        // Every band, slowest first, including empty ones
        (
            "Rate categories",
            RateCategory::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), summary.rate_categories.get(c.as_str()).copied().unwrap_or(0)))
                .collect(),
        ),
        ("Classifications", summary.classifications.iter().map(|(k, v)| (k.clone(), *v)).collect()),
        ("Top sources", summary.top_sources.clone()),
        ("Top destinations", summary.top_destinations.clone()),
    ];
    for (title, entries) in sections {
        writeln!(out, "{}:", title)?;
        for (key, count) in entries {
            writeln!(out, "  {:<24} {}", key, count)?;
        }
    }

    writeln!(out, "Top destination ports:")?;
    for (port, count) in &summary.top_destination_ports {
        writeln!(out, "  {:<24} {}", port, count)?;
    }
    Ok(())
}
