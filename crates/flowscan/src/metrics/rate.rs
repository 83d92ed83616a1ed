use serde::Serialize;

const BITS_PER_BYTE: f64 = 8.0;
const BYTES_PER_MEGABIT: f64 = 1024.0 * 1024.0;

/// Average rate in Mbps, `(bytes / seconds) * 8 / 1024²`. Zero when the
/// connection has no elapsed time.
pub fn rate_mbps(bytes: u64, uptime: u64) -> f64 {
    if uptime == 0 {
        return 0.0;
    }
    bytes as f64 / uptime as f64 * BITS_PER_BYTE / BYTES_PER_MEGABIT
}

pub fn bytes_per_second(bytes: u64, uptime: u64) -> f64 {
    if uptime == 0 {
        return 0.0;
    }
    bytes as f64 / uptime as f64
}

/// Rate bands in Mbps; lower bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateCategory {
    #[default]
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    ExtremelyHigh,
}

impl RateCategory {
    pub const ALL: [RateCategory; 6] = [
        RateCategory::VeryLow,
        RateCategory::Low,
        RateCategory::Medium,
        RateCategory::High,
        RateCategory::VeryHigh,
        RateCategory::ExtremelyHigh,
    ];

    pub fn from_mbps(mbps: f64) -> Self {
        match mbps {
            r if r >= 1000.0 => RateCategory::ExtremelyHigh,
            r if r >= 100.0 => RateCategory::VeryHigh,
            r if r >= 10.0 => RateCategory::High,
            r if r >= 1.0 => RateCategory::Medium,
            r if r >= 0.1 => RateCategory::Low,
            _ => RateCategory::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateCategory::VeryLow => "very_low",
            RateCategory::Low => "low",
            RateCategory::Medium => "medium",
            RateCategory::High => "high",
            RateCategory::VeryHigh => "very_high",
            RateCategory::ExtremelyHigh => "extremely_high",
        }
    }
}
