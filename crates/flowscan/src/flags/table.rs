//! Token → meaning lookup for ASA connection flags.

use std::collections::HashMap;

use super::ElephantSubtype;

/// What a flag token contributes to a [`super::FlagProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMeaning {
    Elephant(ElephantSubtype),
    Offloaded,
    PreserveEnabled,
    PreserveInEffect,
    ConnectionUp,
    InitiatorData,
    ResponderData,
    /// Documented flag with no bearing on the profile
    Informational,
}

/// Profile-relevant tokens.
const PROFILE_FLAGS: [(&str, FlagMeaning, &str); 10] = [
    ("N1", FlagMeaning::PreserveEnabled, "preserve-connection enabled"),
    ("N2", FlagMeaning::PreserveInEffect, "preserve-connection in effect"),
    ("N3", FlagMeaning::Elephant(ElephantSubtype::N3), "elephant-flow"),
    ("N4", FlagMeaning::Elephant(ElephantSubtype::N4), "elephant-flow bypassed"),
    ("N5", FlagMeaning::Elephant(ElephantSubtype::N5), "elephant-flow throttled"),
    ("N6", FlagMeaning::Elephant(ElephantSubtype::N6), "elephant-flow exempted"),
    ("o", FlagMeaning::Offloaded, "offloaded"),
    ("U", FlagMeaning::ConnectionUp, "up"),
    ("I", FlagMeaning::InitiatorData, "initiator data"),
    ("O", FlagMeaning::ResponderData, "responder data"),
];

/// Remaining documented ASA flags (`show conn` legend).
const INFORMATIONAL_FLAGS: [(&str, &str); 43] = [
    ("A", "awaiting responder ACK to SYN"),
    ("a", "awaiting initiator ACK to SYN"),
    ("B", "TCP probe for server certificate"),
    ("b", "TCP state-bypass or nailed"),
    ("C", "CTIQBE media"),
    ("c", "cluster centralized"),
    ("D", "DNS"),
    ("d", "dump"),
    ("E", "outside back connection"),
    ("e", "semi-distributed"),
    ("F", "initiator FIN"),
    ("f", "responder FIN"),
    ("G", "group"),
    ("g", "MGCP"),
    ("H", "H.323"),
    ("h", "H.225.0"),
    ("i", "incomplete"),
    ("J", "GTP"),
    ("j", "GTP data"),
    ("K", "GTP t3-response"),
    ("k", "Skinny media"),
    ("L", "decap tunnel"),
    ("M", "SMTP data"),
    ("m", "SIP media"),
    ("n", "GUP"),
    ("P", "inside back connection"),
    ("p", "passenger flow"),
    ("Q", "QUIC"),
    ("q", "SQL*Net data"),
    ("R", "initiator acknowledged FIN"),
    ("r", "responder acknowledged FIN"),
    ("T", "SIP"),
    ("t", "SIP transient"),
    ("V", "VPN orphan"),
    ("v", "M3UA"),
    ("W", "WAAS"),
    ("w", "secondary domain backup"),
    ("X", "inspected by service module"),
    ("x", "per session"),
    ("Y", "director stub flow"),
    ("y", "backup stub flow"),
    ("Z", "Scansafe redirection"),
    ("Z1", "zero-trust flow"),
];

#[derive(Debug, Clone, Copy)]
pub struct FlagEntry {
    pub meaning: FlagMeaning,
    pub description: &'static str,
}

/// Open lookup table; [`FlagTable::insert`] extends it without touching the analyzer.
#[derive(Debug, Clone)]
pub struct FlagTable {
    entries: HashMap<String, FlagEntry>,
}

impl FlagTable {
    pub fn new() -> Self {
        let mut entries = HashMap::with_capacity(PROFILE_FLAGS.len() + INFORMATIONAL_FLAGS.len() + 1);

        for (symbol, meaning, description) in PROFILE_FLAGS {
            entries.insert(symbol.to_string(), FlagEntry { meaning, description });
        }
        for (symbol, description) in INFORMATIONAL_FLAGS {
            entries.insert(
                symbol.to_string(),
                FlagEntry { meaning: FlagMeaning::Informational, description },
            );
        }
        entries.insert(
            "z".to_string(),
            FlagEntry { meaning: FlagMeaning::Informational, description: "forwarding stub flow" },
        );

        Self { entries }
    }

    pub fn get(&self, symbol: &str) -> Option<&FlagEntry> {
        self.entries.get(symbol)
    }

    pub fn insert(&mut self, symbol: impl Into<String>, meaning: FlagMeaning, description: &'static str) {
        self.entries.insert(symbol.into(), FlagEntry { meaning, description });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FlagTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_profile_tokens() {
        let table = FlagTable::new();
        assert_eq!(table.get("N3").unwrap().meaning, FlagMeaning::Elephant(ElephantSubtype::N3));
        assert_eq!(table.get("o").unwrap().meaning, FlagMeaning::Offloaded);
        assert_eq!(table.get("O").unwrap().meaning, FlagMeaning::ResponderData);
        assert_eq!(table.get("z").unwrap().description, "forwarding stub flow");
        assert!(table.get("N9").is_none());
    }

    #[test]
    fn test_table_is_extensible() {
        let mut table = FlagTable::new();
        let before = table.len();
        table.insert("N7", FlagMeaning::Informational, "future flag");
        assert_eq!(table.len(), before + 1);
        assert_eq!(table.get("N7").unwrap().description, "future flag");
    }
}
