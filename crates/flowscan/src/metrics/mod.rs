//! Metric Deriver
//!
//! Fills [`DerivedMetrics`] for a whole batch in one pass: rate, rate
//! category and classification per record, then the combined score, which
//! needs the batch maxima.

mod classify;
mod rate;

pub use classify::{classify, Classification};
pub use rate::{bytes_per_second, rate_mbps, RateCategory};

use serde::Serialize;
use tracing::debug;

use crate::conf::{ClassifyConfig, ScoreWeights};
use crate::record::ConnectionRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub rate_mbps: f64,
    pub bytes_per_second: f64,
    /// Uptime was zero, so the rate is zero by convention
    pub zero_duration: bool,
    pub rate_category: RateCategory,
    pub classification: Classification,
    /// Batch-relative severity in [0, 1]; only comparable within one run
    pub combined_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchMaxima {
    pub uptime: u64,
    pub bytes: u64,
    pub rate_mbps: f64,
}

impl BatchMaxima {
    pub fn from_records(records: &[ConnectionRecord]) -> Self {
        records.iter().fold(Self::default(), |max, r| Self {
            uptime: max.uptime.max(r.uptime),
            bytes: max.bytes.max(r.bytes),
            rate_mbps: max.rate_mbps.max(r.metrics.rate_mbps),
        })
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// `w_u·U/maxU + w_b·B/maxB + w_r·R/maxR`, each term 0 when its maximum is 0.
pub fn combined_score(uptime: u64, bytes: u64, rate: f64, maxima: &BatchMaxima, weights: &ScoreWeights) -> f64 {
    let score = weights.uptime * ratio(uptime as f64, maxima.uptime as f64)
        + weights.bytes * ratio(bytes as f64, maxima.bytes as f64)
        + weights.rate * ratio(rate, maxima.rate_mbps);
    score.clamp(0.0, 1.0)
}

pub struct MetricDeriver {
    classify: ClassifyConfig,
    weights: ScoreWeights,
}

impl MetricDeriver {
    pub fn new(classify: ClassifyConfig, weights: ScoreWeights) -> Self {
        Self { classify, weights }
    }

    /// Derive metrics for every record in place. Returns the batch maxima the
    /// scores were computed against.
    pub fn derive(&self, records: &mut [ConnectionRecord]) -> BatchMaxima {
        for record in records.iter_mut() {
            let rate = rate_mbps(record.bytes, record.uptime);
            record.metrics = DerivedMetrics {
                rate_mbps: rate,
                bytes_per_second: bytes_per_second(record.bytes, record.uptime),
                zero_duration: record.uptime == 0,
                rate_category: RateCategory::from_mbps(rate),
                classification: classify(record, rate, &self.classify),
                combined_score: 0.0,
            };
        }

        let maxima = BatchMaxima::from_records(records);
        for record in records.iter_mut() {
            record.metrics.combined_score =
                combined_score(record.uptime, record.bytes, record.metrics.rate_mbps, &maxima, &self.weights);
        }

        debug!(
            records = records.len(),
            max_uptime = maxima.uptime,
            max_bytes = maxima.bytes,
            max_rate_mbps = maxima.rate_mbps,
            "derived batch metrics"
        );
        maxima
    }
}

impl Default for MetricDeriver {
    fn default() -> Self {
        Self::new(ClassifyConfig::default(), ScoreWeights::default())
    }
}
