use std::fmt;

use serde::{Serialize, Serializer};

use crate::flags::{FlagProfile, FlagToken};
use crate::metrics::DerivedMetrics;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Other(String),
}

impl Protocol {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_uppercase().as_str() {
            "TCP" => Protocol::Tcp,
            "UDP" => Protocol::Udp,
            "ICMP" => Protocol::Icmp,
            other => Protocol::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
            Protocol::Other(name) => name,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    pub interface: Option<String>,
    pub address: String,
    pub port: Option<u16>,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(interface) = &self.interface {
            write!(f, "{}:", interface)?;
        }
        match (self.port, self.address.contains(':')) {
            (Some(port), true) => write!(f, "[{}]:{}", self.address, port),
            (Some(port), false) => write!(f, "{}:{}", self.address, port),
            (None, _) => f.write_str(&self.address),
        }
    }
}

/// One connection-table entry, normalized.
///
/// `metrics` stays at its default until [`crate::metrics::MetricDeriver::derive`]
/// runs over the batch.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRecord {
    pub protocol: Protocol,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub connection_id: Option<String>,

    /// Whole seconds
    pub uptime: u64,
    pub bytes: u64,
    pub idle: Option<u64>,
    pub timeout: Option<u64>,

    /// Flag text as it appeared in the block
    pub flags_text: String,
    pub flag_tokens: Vec<FlagToken>,
    pub profile: FlagProfile,

    pub initiator: Option<String>,
    pub responder: Option<String>,
    pub rx_ring: Option<u64>,
    pub internal_interface: Option<String>,

    pub metrics: DerivedMetrics,
}

impl ConnectionRecord {
    pub fn uptime_hours(&self) -> f64 {
        self.uptime as f64 / 3_600.0
    }

    /// Byte count in MiB
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_keywords() {
        assert_eq!(Protocol::from_keyword("tcp"), Protocol::Tcp);
        assert_eq!(Protocol::from_keyword("ICMP6"), Protocol::Other("ICMP6".into()));
        assert_eq!(serde_json::to_string(&Protocol::Udp).unwrap(), "\"UDP\"");
    }

    #[test]
    fn test_endpoint_display() {
        let v4 = Endpoint { interface: Some("outside".into()), address: "10.1.76.3".into(), port: Some(57798) };
        assert_eq!(v4.to_string(), "outside:10.1.76.3:57798");

        let v6 = Endpoint { interface: None, address: "fe80::1".into(), port: Some(443) };
        assert_eq!(v6.to_string(), "[fe80::1]:443");

        let bare = Endpoint { interface: None, address: "10.0.0.1".into(), port: None };
        assert_eq!(bare.to_string(), "10.0.0.1");
    }
}
