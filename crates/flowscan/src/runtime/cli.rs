use std::path::PathBuf;

use clap::Parser;

use crate::conf::AnalyzerConfig;
use crate::filter::SortKey;
use crate::parser::ParseMode;

#[derive(Debug, Parser)]
#[command(
    name = "flowscan",
    about = "Find elephant flows in ASA `show conn detail` output",
    version
)]
pub struct Cli {
    /// Connection table dump to analyze
    #[arg(short, long)]
    pub file: PathBuf,

    /// TOML config file (default: $FLOWSCAN_CONFIG_FILE or ./flowscan.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum uptime in hours
    #[arg(long)]
    pub min_hours: Option<f64>,

    /// Minimum volume in MB (MiB)
    #[arg(long)]
    pub min_mb: Option<f64>,

    /// Minimum average rate in Mbps
    #[arg(long)]
    pub min_rate: Option<f64>,

    /// Only connections with an elephant flag in effect
    #[arg(long)]
    pub flags_only: bool,

    /// Only offloaded connections
    #[arg(long)]
    pub offloaded_only: bool,

    /// Also admit flagged connections that miss the thresholds
    #[arg(long)]
    pub include_flags: bool,

    /// Also admit offloaded connections that miss the thresholds
    #[arg(long)]
    pub include_offloaded: bool,

    /// Sort key: uptime, bytes, rate or both
    #[arg(short, long)]
    pub sort: Option<SortKey>,

    /// Rows to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Field location strategy: template, scan or auto
    #[arg(long)]
    pub parse_mode: Option<ParseMode>,

    /// Write every match to a JSON report
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Print batch summary statistics
    #[arg(long)]
    pub summary: bool,

    /// Only print the result table
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// CLI flags override the loaded configuration.
    pub fn apply(&self, config: &mut AnalyzerConfig) {
        let query = &mut config.query;
        if let Some(hours) = self.min_hours {
            query.min_uptime_hours = hours;
        }
        if let Some(mb) = self.min_mb {
            query.min_mb = mb;
        }
        if let Some(rate) = self.min_rate {
            query.min_rate_mbps = rate;
        }
        query.flags_only |= self.flags_only;
        query.offloaded_only |= self.offloaded_only;
        query.include_flags |= self.include_flags;
        query.include_offloaded |= self.include_offloaded;
        if let Some(sort) = self.sort {
            query.sort = sort;
        }
        if let Some(limit) = self.limit {
            query.limit = Some(limit);
        }
        if let Some(mode) = self.parse_mode {
            config.parse.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "flowscan", "--file", "conns.txt", "--min-rate", "1.5", "--sort", "rate", "--parse-mode", "scan",
            "--flags-only", "--limit", "3",
        ])
        .unwrap();

        let mut config = AnalyzerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.query.min_rate_mbps, 1.5);
        assert_eq!(config.query.sort, SortKey::Rate);
        assert_eq!(config.query.limit, Some(3));
        assert!(config.query.flags_only);
        assert_eq!(config.parse.mode, ParseMode::Scan);
        assert_eq!(config.query.min_mb, 0.0);
    }

    #[test]
    fn test_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["flowscan", "-f", "x", "--sort", "size"]).is_err());
    }

    #[test]
    fn test_cli_does_not_clear_config_switches() {
        let cli = Cli::try_parse_from(["flowscan", "-f", "x"]).unwrap();
        let mut config = AnalyzerConfig::default();
        config.query.include_flags = true;
        cli.apply(&mut config);
        assert!(config.query.include_flags);
        assert_eq!(config.query.limit, Some(20));
    }
}
