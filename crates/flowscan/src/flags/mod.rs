//! Flag Analyzer
//!
//! Turns the raw ASA flag string (`UIO N1* N3*`) into an ordered token list and
//! a [`FlagProfile`]. Interpretation goes through [`FlagTable`]; the in-effect
//! rule decides whether elephant tokens need the `*` marker to count.

mod table;

pub use table::{FlagEntry, FlagMeaning, FlagTable};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Elephant-flow flavour, ordered from least to most specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElephantSubtype {
    N3,
    N4,
    N5,
    N6,
}

impl ElephantSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElephantSubtype::N3 => "N3",
            ElephantSubtype::N4 => "N4",
            ElephantSubtype::N5 => "N5",
            ElephantSubtype::N6 => "N6",
        }
    }
}

impl fmt::Display for ElephantSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flag symbol plus its `*` in-effect marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FlagToken {
    pub symbol: String,
    pub in_effect: bool,
}

impl fmt::Display for FlagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_effect {
            write!(f, "{}*", self.symbol)
        } else {
            f.write_str(&self.symbol)
        }
    }
}

/// Split a flag string into tokens.
///
/// `N<digit>` and `Z<digit>` are two-character tokens, every other
/// character is its own token. A leading `-` (no flags) is dropped and
/// whitespace or commas only separate.
pub fn tokenize(text: &str) -> Vec<FlagToken> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('-').unwrap_or(trimmed);

    let chars: Vec<char> = trimmed.chars().collect();
    let mut tokens: Vec<FlagToken> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        if c == '*' {
            // A marker only binds to a token it directly follows.
            let follows_token = i > 0 && !(chars[i - 1].is_whitespace() || chars[i - 1] == ',');
            if let Some(last) = tokens.last_mut().filter(|_| follows_token) {
                last.in_effect = true;
            }
            i += 1;
            continue;
        }

        let paired = matches!(c, 'N' | 'Z') && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        let symbol: String = if paired {
            chars[i..i + 2].iter().collect()
        } else {
            c.to_string()
        };
        i += symbol.chars().count();
        tokens.push(FlagToken { symbol, in_effect: false });
    }

    tokens
}

/// When an elephant token counts as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InEffectRule {
    /// Only `*`-marked elephant tokens are active
    #[default]
    Marker,
    /// Any elephant token present is active
    Presence,
}

impl InEffectRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            InEffectRule::Marker => "marker",
            InEffectRule::Presence => "presence",
        }
    }
}

impl FromStr for InEffectRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marker" => Ok(InEffectRule::Marker),
            "presence" => Ok(InEffectRule::Presence),
            other => Err(ConfigError::UnknownInEffectRule(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagProfile {
    pub elephant_flagged: bool,
    pub elephant_subtype: Option<ElephantSubtype>,
    pub offloaded: bool,
    pub connection_up: bool,
    pub initiator_data: bool,
    pub responder_data: bool,
    pub preserve_connection_enabled: bool,
    pub preserve_connection_in_effect: bool,
    /// Elephant tokens present but not active under the rule
    pub negotiated_elephant: bool,
    /// Tokens absent from the lookup table, in input order
    pub unknown: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FlagAnalyzer {
    table: FlagTable,
    rule: InEffectRule,
}

impl FlagAnalyzer {
    pub fn new(rule: InEffectRule) -> Self {
        Self { table: FlagTable::new(), rule }
    }

    /// Extend the lookup table.
    pub fn with_entry(mut self, symbol: &str, meaning: FlagMeaning, description: &'static str) -> Self {
        self.table.insert(symbol, meaning, description);
        self
    }

    pub fn rule(&self) -> InEffectRule {
        self.rule
    }

    pub fn describe(&self, symbol: &str) -> Option<&'static str> {
        self.table.get(symbol).map(|entry| entry.description)
    }

    pub fn analyze(&self, tokens: &[FlagToken]) -> FlagProfile {
        let mut profile = FlagProfile::default();

        for token in tokens {
            let Some(entry) = self.table.get(&token.symbol) else {
                profile.unknown.push(token.symbol.clone());
                continue;
            };

            match entry.meaning {
                FlagMeaning::Elephant(subtype) => {
                    let active = match self.rule {
                        InEffectRule::Marker => token.in_effect,
                        InEffectRule::Presence => true,
                    };
                    if active {
                        profile.elephant_subtype = profile.elephant_subtype.max(Some(subtype));
                    } else {
                        profile.negotiated_elephant = true;
                    }
                }
                FlagMeaning::Offloaded => profile.offloaded = true,
                FlagMeaning::PreserveEnabled => profile.preserve_connection_enabled = true,
                FlagMeaning::PreserveInEffect => profile.preserve_connection_in_effect = true,
                FlagMeaning::ConnectionUp => profile.connection_up = true,
                FlagMeaning::InitiatorData => profile.initiator_data = true,
                FlagMeaning::ResponderData => profile.responder_data = true,
                FlagMeaning::Informational => {}
            }
        }

        profile.elephant_flagged = profile.elephant_subtype.is_some();
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn symbols(tokens: &[FlagToken]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    // ── Tokenizer ───────────────────────────────────────────────────

    #[test]
    fn test_tokenize_plain() {
        assert_eq!(symbols(&tokenize("UIO N1N3")), vec!["U", "I", "O", "N1", "N3"]);
        assert_eq!(symbols(&tokenize("- N1")), vec!["N1"]);
        assert_eq!(symbols(&tokenize("-o")), vec!["o"]);
        assert!(tokenize("-").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_markers() {
        assert_eq!(symbols(&tokenize("UIO N1* N3*")), vec!["U", "I", "O", "N1*", "N3*"]);
        assert_eq!(symbols(&tokenize("N2*N3*")), vec!["N2*", "N3*"]);
        assert_eq!(symbols(&tokenize("* U")), vec!["U"]);
        assert_eq!(symbols(&tokenize("U *")), vec!["U"]);
    }

    #[test]
    fn test_tokenize_two_character_tokens() {
        assert_eq!(symbols(&tokenize("Z1 Z N")), vec!["Z1", "Z", "N"]);
        assert_eq!(symbols(&tokenize("N12")), vec!["N1", "2"]);
    }

    // ── Analyzer ────────────────────────────────────────────────────

    #[test]
    fn test_marker_rule_requires_star() {
        let analyzer = FlagAnalyzer::default();
        let profile = analyzer.analyze(&tokenize("UIO N1N3"));
        assert!(!profile.elephant_flagged);
        assert!(profile.negotiated_elephant);
        assert!(profile.connection_up && profile.initiator_data && profile.responder_data);
        assert!(profile.preserve_connection_enabled);

        let profile = analyzer.analyze(&tokenize("UIO N1* N3*"));
        assert!(profile.elephant_flagged);
        assert_eq!(profile.elephant_subtype, Some(ElephantSubtype::N3));
        assert!(!profile.negotiated_elephant);
    }

    #[test]
    fn test_presence_rule() {
        let analyzer = FlagAnalyzer::new(InEffectRule::Presence);
        let profile = analyzer.analyze(&tokenize("N1N3"));
        assert_eq!(profile.elephant_subtype, Some(ElephantSubtype::N3));
    }

    #[test]
    fn test_most_specific_subtype_wins() {
        let analyzer = FlagAnalyzer::default();
        let profile = analyzer.analyze(&tokenize("N5* N3* N4*"));
        assert_eq!(profile.elephant_subtype, Some(ElephantSubtype::N5));
    }

    #[test]
    fn test_offloaded_and_unknown() {
        let analyzer = FlagAnalyzer::default();
        let profile = analyzer.analyze(&tokenize("-o"));
        assert!(profile.offloaded);
        assert!(profile.unknown.is_empty());

        let profile = analyzer.analyze(&tokenize("U N9 %"));
        assert_eq!(profile.unknown, vec!["N9".to_string(), "%".to_string()]);
        assert!(profile.connection_up);
    }

    #[test]
    fn test_with_entry_extends_table() {
        let analyzer = FlagAnalyzer::default().with_entry("N7", FlagMeaning::Offloaded, "future offload");
        assert!(analyzer.analyze(&tokenize("N7")).offloaded);
        assert_eq!(analyzer.describe("N7"), Some("future offload"));
        assert_eq!(analyzer.describe("o"), Some("offloaded"));
    }

    #[test]
    fn test_in_effect_rule_from_str() {
        assert_eq!("Presence".parse::<InEffectRule>().unwrap(), InEffectRule::Presence);
        assert!(matches!(
            "sometimes".parse::<InEffectRule>(),
            Err(ConfigError::UnknownInEffectRule(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_analyze_is_pure(text in "[-UIONoZz0-9* ,]{0,24}", presence in any::<bool>()) {
            let rule = if presence { InEffectRule::Presence } else { InEffectRule::Marker };
            let analyzer = FlagAnalyzer::new(rule);
            let tokens = tokenize(&text);
            let first = analyzer.analyze(&tokens);
            let second = FlagAnalyzer::new(rule).analyze(&tokenize(&text));
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.elephant_flagged, first.elephant_subtype.is_some());
        }
    }
}
