use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigError;

/// Field-location strategy that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Strict line templates (fixed grammar)
    Template,
    /// Permissive label scanning
    Scan,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::Template => "template",
            ParseStrategy::Scan => "scan",
        }
    }
}

/// Which locators the extractor runs, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Template only; blocks the template rejects are failures
    #[serde(alias = "strict")]
    Template,
    /// Scanner only
    #[serde(alias = "permissive")]
    Scan,
    /// Template first, scanner when the template does not match
    #[default]
    Auto,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Template => "template",
            ParseMode::Scan => "scan",
            ParseMode::Auto => "auto",
        }
    }
}

impl FromStr for ParseMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" | "strict" => Ok(ParseMode::Template),
            "scan" | "permissive" => Ok(ParseMode::Scan),
            "auto" => Ok(ParseMode::Auto),
            other => Err(ConfigError::UnknownParseMode(other.to_string())),
        }
    }
}

/// A unit string that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Empty {0} value")]
    Empty(&'static str),

    #[error("Invalid number in '{0}'")]
    InvalidNumber(String),

    #[error("Unknown unit suffix in '{0}'")]
    UnknownUnit(String),

    #[error("Invalid counter '{0}'")]
    InvalidCounter(String),

    #[error("Value out of range in '{0}'")]
    Overflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The strict template rejected a line of the block.
    #[error("Template mismatch at line {line}: {reason}")]
    TemplateMismatch { line: usize, reason: String },

    /// Protocol or an endpoint is missing or malformed.
    #[error("Structural failure: {0}")]
    Structural(String),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// How a failed block is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Structural,
    Format,
}

impl ParseError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ParseError::TemplateMismatch { .. } | ParseError::Structural(_) => FailureKind::Structural,
            ParseError::Format(_) => FailureKind::Format,
        }
    }
}

/// One connection's slice of the input, starting at its header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// 1-based line number of the header
    pub line: usize,
    pub text: &'a str,
}

impl<'a> RawBlock<'a> {
    pub fn header(&self) -> &'a str {
        self.text.lines().next().unwrap_or("")
    }

    /// Non-empty lines after the header, paired with their line numbers.
    pub fn body(&self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        let first = self.line;
        self.text
            .lines()
            .enumerate()
            .skip(1)
            .map(move |(offset, line)| (first + offset, line.trim()))
            .filter(|(_, line)| !line.is_empty())
    }
}

/// An endpoint as located in the header, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointText {
    pub interface: Option<String>,
    /// Address token, e.g. `10.1.76.4/45879` or `10.1.76.4:45879`
    pub address: String,
}

/// Raw field text located in a block. Both locators fill this the same way;
/// all normalization happens afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockFields {
    pub protocol: Option<String>,
    pub source: Option<EndpointText>,
    pub destination: Option<EndpointText>,
    pub flags: Option<String>,
    pub uptime: Option<String>,
    pub idle: Option<String>,
    pub timeout: Option<String>,
    pub bytes: Option<String>,
    pub bytes_in: Option<String>,
    pub bytes_out: Option<String>,
    pub connection_id: Option<String>,
    pub initiator: Option<String>,
    pub responder: Option<String>,
    pub rx_ring: Option<String>,
    pub internal_interface: Option<String>,
}

/// Labels that name a [`BlockFields`] slot.
pub const FIELD_LABELS: [&str; 12] = [
    "uptime",
    "idle",
    "timeout",
    "bytes",
    "bytes-in",
    "bytes_in",
    "bytes-out",
    "bytes_out",
    "Rx-RingNum",
    "keyid",
    "Initiator",
    "Responder",
];

impl BlockFields {
    pub fn is_field_label(label: &str) -> bool {
        FIELD_LABELS.contains(&label)
    }

    /// Store a labelled value. Returns false when the label is not a known field.
    pub fn set_labelled(&mut self, label: &str, value: String) -> bool {
        let slot = match label {
            "uptime" => &mut self.uptime,
            "idle" => &mut self.idle,
            "timeout" => &mut self.timeout,
            "bytes" => &mut self.bytes,
            "bytes-in" | "bytes_in" => &mut self.bytes_in,
            "bytes-out" | "bytes_out" => &mut self.bytes_out,
            "Rx-RingNum" => &mut self.rx_ring,
            "keyid" => &mut self.connection_id,
            "Initiator" => &mut self.initiator,
            "Responder" => &mut self.responder,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

impl fmt::Display for RawBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.header().trim())
    }
}
