//! Model: AnalyzerConfig and its sections.

use serde::{Deserialize, Serialize};

use crate::filter::SortKey;
use crate::flags::InEffectRule;
use crate::parser::ParseMode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub parse: ParseConfig,
    pub query: QueryConfig,
    pub classify: ClassifyConfig,
    pub score: ScoreWeights,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub mode: ParseMode,
    pub in_effect_rule: InEffectRule,
}

/// Query thresholds and output shape. Thresholds are inclusive (`>=`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub min_uptime_hours: f64,
    pub min_mb: f64,
    pub min_rate_mbps: f64,
    pub flags_only: bool,
    pub offloaded_only: bool,
    pub include_flags: bool,
    pub include_offloaded: bool,
    pub sort: SortKey,
    /// Rows in the limited view; `None` shows every match
    pub limit: Option<usize>,
}

/// Thresholds for the classification ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    pub high_rate_mbps: f64,
    pub traditional_min_hours: f64,
    /// MiB
    pub traditional_min_mb: f64,
}

/// Combined-score weights; must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub uptime: f64,
    pub bytes: f64,
    pub rate: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_uptime_hours: 0.0,
            min_mb: 0.0,
            min_rate_mbps: 0.0,
            flags_only: false,
            offloaded_only: false,
            include_flags: false,
            include_offloaded: false,
            sort: SortKey::Bytes,
            limit: Some(20),
        }
    }
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            high_rate_mbps: 100.0,
            traditional_min_hours: 24.0,
            traditional_min_mb: 1000.0,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            uptime: 0.25,
            bytes: 0.25,
            rate: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ────────────────────────────────────────────────

    #[test]
    fn test_query_config_defaults() {
        let q = QueryConfig::default();
        assert_eq!(q.min_uptime_hours, 0.0);
        assert_eq!(q.sort, SortKey::Bytes);
        assert_eq!(q.limit, Some(20));
        assert!(!q.flags_only && !q.offloaded_only);
    }

    #[test]
    fn test_classify_and_score_defaults() {
        let c = ClassifyConfig::default();
        assert_eq!(c.high_rate_mbps, 100.0);
        assert_eq!(c.traditional_min_hours, 24.0);
        assert_eq!(c.traditional_min_mb, 1000.0);

        let w = ScoreWeights::default();
        assert_eq!(w.uptime + w.bytes + w.rate, 1.0);
    }

    #[test]
    fn test_parse_config_defaults() {
        let p = ParseConfig::default();
        assert_eq!(p.mode, ParseMode::Auto);
        assert_eq!(p.in_effect_rule, InEffectRule::Marker);
    }

    // ── Serialization ───────────────────────────────────────────

    #[test]
    fn test_config_toml_round_trip() {
        let cfg = AnalyzerConfig::default();
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let back: AnalyzerConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_config_deserialize_partial_toml() {
        let toml_str = r#"
            [parse]
            mode = "scan"

            [query]
            min_rate_mbps = 5.5
            sort = "both"
        "#;
        let cfg: AnalyzerConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.parse.mode, ParseMode::Scan);
        assert_eq!(cfg.parse.in_effect_rule, InEffectRule::Marker); // default
        assert_eq!(cfg.query.min_rate_mbps, 5.5);
        assert_eq!(cfg.query.sort, SortKey::Both);
        assert_eq!(cfg.query.limit, Some(20)); // default
        assert_eq!(cfg.classify, ClassifyConfig::default());
    }

    #[test]
    fn test_config_toml_accepts_aliases() {
        let cfg: AnalyzerConfig = toml::from_str("[parse]\nmode = \"strict\"\n[query]\nsort = \"score\"\n").unwrap();
        assert_eq!(cfg.parse.mode, ParseMode::Template);
        assert_eq!(cfg.query.sort, SortKey::Both);

        let cfg: AnalyzerConfig = toml::from_str("[parse]\nmode = \"permissive\"\n").unwrap();
        assert_eq!(cfg.parse.mode, ParseMode::Scan);
        assert_eq!(cfg.parse.mode, "permissive".parse::<ParseMode>().unwrap());
    }

    #[test]
    fn test_config_rejects_unknown_sort_in_toml() {
        let result: Result<AnalyzerConfig, _> = toml::from_str("[query]\nsort = \"size\"\n");
        assert!(result.is_err());
    }
}
