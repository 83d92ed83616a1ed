use std::sync::LazyLock;

use regex::Regex;

use super::normalize_flags;
use crate::parser::model::EndpointText;
use crate::parser::traits::{BlockFields, FieldLocator, ParseError, ParseStrategy, RawBlock};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<proto>[A-Z][A-Z0-9]*)\s+(?:(?P<src_if>\S+):\s+)?(?P<src>[^\s,]*[^\s,:]),?\s+(?:(?P<dst_if>\S+):\s+)?(?P<dst>[^\s,]*[^\s,:]),?\s*$",
    )
    .unwrap()
});

static FLAGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^flags(?:\s+(?P<v>.*))?$").unwrap());

static LABELLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<k>idle|uptime|timeout|bytes|bytes-in|bytes-out|Rx-RingNum)\s+(?P<v>\S+)$").unwrap()
});

static INTERNAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?P<v>Internal-Data\S*)$").unwrap());

static PARTIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Initiator:\s+(?P<i>\S+?),\s+Responder:\s+(?P<r>\S+?)$").unwrap()
});

static KEYID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Connection lookup keyid:\s+(?P<id>\S+)$").unwrap());

/// Strict line templates. Every non-empty line, and every comma-separated
/// segment of a field line, must match a known template.
pub struct TemplateLocator;

impl TemplateLocator {
    fn header(block: &RawBlock<'_>, fields: &mut BlockFields) -> Result<(), ParseError> {
        let header = block.header().trim();
        let caps = HEADER_RE.captures(header).ok_or_else(|| ParseError::TemplateMismatch {
            line: block.line,
            reason: format!("header '{}'", header),
        })?;

        let endpoint = |iface: &str, addr: &str| EndpointText {
            interface: caps.name(iface).map(|m| m.as_str().to_string()),
            address: caps[addr].to_string(),
        };

        fields.protocol = Some(caps["proto"].to_string());
        fields.source = Some(endpoint("src_if", "src"));
        fields.destination = Some(endpoint("dst_if", "dst"));
        Ok(())
    }

    fn field_line(line_no: usize, line: &str, fields: &mut BlockFields) -> Result<(), ParseError> {
        if let Some(caps) = PARTIES_RE.captures(line) {
            fields.initiator = Some(caps["i"].to_string());
            fields.responder = Some(caps["r"].to_string());
            return Ok(());
        }
        if let Some(caps) = KEYID_RE.captures(line) {
            fields.connection_id = Some(caps["id"].to_string());
            return Ok(());
        }

        for segment in line.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(caps) = FLAGS_RE.captures(segment) {
                let value = caps.name("v").map(|m| m.as_str()).unwrap_or("");
                fields.flags = Some(normalize_flags(value.split_whitespace()));
            } else if let Some(caps) = LABELLED_RE.captures(segment) {
                fields.set_labelled(&caps["k"], caps["v"].to_string());
            } else if let Some(caps) = INTERNAL_RE.captures(segment) {
                fields.internal_interface = Some(caps["v"].to_string());
            } else {
                return Err(ParseError::TemplateMismatch {
                    line: line_no,
                    reason: format!("unrecognized segment '{}'", segment),
                });
            }
        }
        Ok(())
    }
}

impl FieldLocator for TemplateLocator {
    fn locate(&self, block: &RawBlock<'_>) -> Result<BlockFields, ParseError> {
        let mut fields = BlockFields::default();
        Self::header(block, &mut fields)?;
        for (line_no, line) in block.body() {
            Self::field_line(line_no, line, &mut fields)?;
        }
        Ok(fields)
    }

    fn strategy(&self) -> ParseStrategy {
        ParseStrategy::Template
    }
}
