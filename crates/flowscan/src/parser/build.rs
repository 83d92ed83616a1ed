//! Located field text → [`ConnectionRecord`].
//!
//! Shared by every locator: endpoint validation, unit normalization, byte
//! summation and flag analysis all happen here.

use std::net::IpAddr;

use super::model::{BlockFields, EndpointText, FormatError, ParseError};
use super::units::{parse_bytes, parse_counter, parse_duration};
use crate::flags::{tokenize, FlagAnalyzer};
use crate::metrics::DerivedMetrics;
use crate::record::{ConnectionRecord, Endpoint, Protocol};

fn is_address_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '_' | '-')
}

fn parse_port(port: &str, token: &str) -> Result<u16, ParseError> {
    port.parse()
        .map_err(|_| ParseError::Structural(format!("invalid port in endpoint '{}'", token)))
}

/// Accepts `addr/port`, `[v6]:port`, `v4:port` and a bare IP address.
pub fn parse_endpoint(text: EndpointText) -> Result<Endpoint, ParseError> {
    let token = text.address.trim().trim_end_matches(',');
    let invalid = || ParseError::Structural(format!("malformed endpoint '{}'", token));

    let (address, port) = if let Some(rest) = token.strip_prefix('[') {
        let (address, port) = rest.split_once("]:").ok_or_else(invalid)?;
        (address, Some(parse_port(port, token)?))
    } else if let Some((address, port)) = token.rsplit_once('/') {
        (address, Some(parse_port(port, token)?))
    } else if token.parse::<IpAddr>().is_ok() {
        (token, None)
    } else if let Some((address, port)) = token.split_once(':').filter(|(_, p)| !p.contains(':')) {
        (address, Some(parse_port(port, token)?))
    } else {
        return Err(invalid());
    };

    if address.is_empty() || !address.chars().all(is_address_char) {
        return Err(invalid());
    }

    Ok(Endpoint {
        interface: text.interface.filter(|name| !name.is_empty()),
        address: address.to_string(),
        port,
    })
}

fn optional<T>(
    value: Option<&str>,
    parse: fn(&str) -> Result<T, FormatError>,
) -> Result<Option<T>, FormatError> {
    value.map(parse).transpose()
}

/// Build a record from located fields.
///
/// Missing protocol or endpoints are structural failures; malformed units are
/// format failures. Bytes are `bytes-in + bytes-out` when either is present,
/// otherwise `bytes`. Absent counters are zero.
pub fn build_record(fields: BlockFields, analyzer: &FlagAnalyzer) -> Result<ConnectionRecord, ParseError> {
    let protocol = fields
        .protocol
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Protocol::from_keyword)
        .ok_or_else(|| ParseError::Structural("missing protocol".into()))?;

    let source = fields
        .source
        .ok_or_else(|| ParseError::Structural("missing source endpoint".into()))
        .and_then(parse_endpoint)?;
    let destination = fields
        .destination
        .ok_or_else(|| ParseError::Structural("missing destination endpoint".into()))
        .and_then(parse_endpoint)?;

    let uptime = optional(fields.uptime.as_deref(), parse_duration)?.unwrap_or(0);
    let idle = optional(fields.idle.as_deref(), parse_duration)?;
    let timeout = optional(fields.timeout.as_deref(), parse_duration)?;
    let rx_ring = optional(fields.rx_ring.as_deref(), parse_counter)?;

    let bytes_in = optional(fields.bytes_in.as_deref(), parse_bytes)?;
    let bytes_out = optional(fields.bytes_out.as_deref(), parse_bytes)?;
    let bytes = match (bytes_in, bytes_out) {
        (None, None) => optional(fields.bytes.as_deref(), parse_bytes)?.unwrap_or(0),
        (i, o) => i.unwrap_or(0).saturating_add(o.unwrap_or(0)),
    };

    let flags_text = fields.flags.unwrap_or_default();
    let flag_tokens = tokenize(&flags_text);
    let profile = analyzer.analyze(&flag_tokens);

    Ok(ConnectionRecord {
        protocol,
        source,
        destination,
        connection_id: fields.connection_id,
        uptime,
        bytes,
        idle,
        timeout,
        flags_text,
        flag_tokens,
        profile,
        initiator: fields.initiator,
        responder: fields.responder,
        rx_ring,
        internal_interface: fields.internal_interface,
        metrics: DerivedMetrics::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::ElephantSubtype;
    use crate::parser::model::FailureKind;

    fn endpoint(address: &str) -> EndpointText {
        EndpointText { interface: Some("outside".into()), address: address.into() }
    }

    fn fields() -> BlockFields {
        BlockFields {
            protocol: Some("TCP".into()),
            source: Some(endpoint("10.1.76.3/57798")),
            destination: Some(endpoint("10.1.19.90/8000")),
            ..Default::default()
        }
    }

    // ── Endpoints ───────────────────────────────────────────────────

    #[test]
    fn test_endpoint_forms() {
        let e = parse_endpoint(endpoint("10.1.76.3/57798")).unwrap();
        assert_eq!((e.address.as_str(), e.port), ("10.1.76.3", Some(57798)));
        assert_eq!(e.interface.as_deref(), Some("outside"));

        let e = parse_endpoint(endpoint("10.0.0.1:443,")).unwrap();
        assert_eq!((e.address.as_str(), e.port), ("10.0.0.1", Some(443)));

        let e = parse_endpoint(endpoint("[fe80::1]:443")).unwrap();
        assert_eq!((e.address.as_str(), e.port), ("fe80::1", Some(443)));

        let e = parse_endpoint(endpoint("fe80::2/51000")).unwrap();
        assert_eq!((e.address.as_str(), e.port), ("fe80::2", Some(51000)));

        let e = parse_endpoint(endpoint("2001:db8::7")).unwrap();
        assert_eq!((e.address.as_str(), e.port), ("2001:db8::7", None));
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        for bad in ["", "10.0.0.1/http", "10.0.0.1/70000", "[fe80::1", "host$/80", "nonsense"] {
            let err = parse_endpoint(endpoint(bad)).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Structural, "{}", bad);
        }
    }

    // ── Records ─────────────────────────────────────────────────────

    #[test]
    fn test_build_record_normalizes_units() {
        let mut f = fields();
        f.uptime = Some("80.1d".into());
        f.bytes = Some("131.8GB".into());
        f.idle = Some("8s".into());
        f.timeout = Some("1h0m".into());
        f.rx_ring = Some("61".into());
        f.flags = Some("UIO N1* N3*".into());

        let record = build_record(f, &FlagAnalyzer::default()).unwrap();
        assert_eq!(record.protocol, Protocol::Tcp);
        assert_eq!(record.uptime, 6_920_640);
        assert_eq!(record.bytes, 141_519_172_403);
        assert_eq!(record.idle, Some(8));
        assert_eq!(record.timeout, Some(3_600));
        assert_eq!(record.rx_ring, Some(61));
        assert_eq!(record.flag_tokens.len(), 5);
        assert_eq!(record.profile.elephant_subtype, Some(ElephantSubtype::N3));
    }

    #[test]
    fn test_build_record_byte_summation() {
        let mut f = fields();
        f.bytes = Some("999".into());
        f.bytes_in = Some("1KB".into());
        assert_eq!(build_record(f.clone(), &FlagAnalyzer::default()).unwrap().bytes, 1_024);

        f.bytes_out = Some("10".into());
        assert_eq!(build_record(f, &FlagAnalyzer::default()).unwrap().bytes, 1_034);
    }

    #[test]
    fn test_build_record_defaults_absent_counters() {
        let record = build_record(fields(), &FlagAnalyzer::default()).unwrap();
        assert_eq!(record.uptime, 0);
        assert_eq!(record.bytes, 0);
        assert_eq!(record.idle, None);
        assert!(record.flag_tokens.is_empty());
    }

    #[test]
    fn test_build_record_failures() {
        let mut f = fields();
        f.destination = None;
        let err = build_record(f, &FlagAnalyzer::default()).unwrap_err();
        assert_eq!(err, ParseError::Structural("missing destination endpoint".into()));

        let mut f = fields();
        f.protocol = None;
        assert_eq!(build_record(f, &FlagAnalyzer::default()).unwrap_err().kind(), FailureKind::Structural);

        let mut f = fields();
        f.uptime = Some("soon".into());
        assert_eq!(build_record(f, &FlagAnalyzer::default()).unwrap_err().kind(), FailureKind::Format);
    }
}
