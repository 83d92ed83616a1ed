use serde::{Serialize, Serializer};

use crate::conf::ClassifyConfig;
use crate::flags::ElephantSubtype;
use crate::record::ConnectionRecord;

/// Elephant classification, in precedence order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    /// An elephant flag is in effect
    Flagged(ElephantSubtype),
    Offloaded,
    HighRate,
    /// Long-lived and large
    Traditional,
    #[default]
    None,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Flagged(ElephantSubtype::N3) => "flagged-N3",
            Classification::Flagged(ElephantSubtype::N4) => "flagged-N4",
            Classification::Flagged(ElephantSubtype::N5) => "flagged-N5",
            Classification::Flagged(ElephantSubtype::N6) => "flagged-N6",
            Classification::Offloaded => "offloaded",
            Classification::HighRate => "high-rate",
            Classification::Traditional => "traditional",
            Classification::None => "none",
        }
    }

    pub fn is_elephant(&self) -> bool {
        !matches!(self, Classification::None)
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// First matching rung wins: flagged, offloaded, high-rate, traditional.
pub fn classify(record: &ConnectionRecord, rate_mbps: f64, config: &ClassifyConfig) -> Classification {
    if let Some(subtype) = record.profile.elephant_subtype {
        Classification::Flagged(subtype)
    } else if record.profile.offloaded {
        Classification::Offloaded
    } else if rate_mbps >= config.high_rate_mbps {
        Classification::HighRate
    } else if record.uptime_hours() >= config.traditional_min_hours
        && record.megabytes() >= config.traditional_min_mb
    {
        Classification::Traditional
    } else {
        Classification::None
    }
}
