//! Symptom sub-scores for one station.
//!
//! Each symptom maps to 0-100. Below the warning threshold the score
//! grows linearly but is capped at 50; the warning threshold jumps to 60 and
//! the critical threshold to 100. Utilization is two-sided: both burnout
//! (high) and idle capacity (low) score.

use serde::{Deserialize, Serialize};

use crate::config::{DetectorThresholds, IndicatorWeights};
use crate::models::StationMetrics;

/// The five 0-100 sub-scores behind a bottleneck score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub throughput_loss: f64,
    pub queue_pressure: f64,
    pub wait_time_impact: f64,
    pub utilization_issue: f64,
    pub quality_impact: f64,
}

impl Indicators {
    /// Scores every symptom of `metrics`.
    pub fn compute(metrics: &StationMetrics, t: &DetectorThresholds) -> Self {
        Self {
            throughput_loss: throughput_score(metrics.throughput_loss_percent(), t),
            queue_pressure: banded(
                metrics.queue_length as f64,
                t.queue_length_warning,
                t.queue_length_critical,
            ),
            wait_time_impact: banded(
                metrics.avg_wait_time_minutes,
                t.wait_time_warning,
                t.wait_time_critical,
            ),
            utilization_issue: utilization_score(metrics.utilization_rate, t),
            quality_impact: banded(
                metrics.defect_rate,
                t.defect_rate_warning,
                t.defect_rate_critical,
            ),
        }
    }

    /// Weighted composite (unrounded).
    pub fn composite(&self, w: &IndicatorWeights) -> f64 {
        self.throughput_loss * w.throughput
            + self.queue_pressure * w.queue
            + self.wait_time_impact * w.wait_time
            + self.utilization_issue * w.utilization
            + self.quality_impact * w.quality
    }
}

fn throughput_score(loss: f64, t: &DetectorThresholds) -> f64 {
    if loss >= t.throughput_loss_critical {
        100.0
    } else if loss >= t.throughput_loss_warning {
        60.0
    } else if loss > 0.0 {
        (loss * 2.0).min(50.0)
    } else {
        0.0
    }
}

/// Critical → 100, warning → 60, else linear towards 60 capped at 50.
fn banded(value: f64, warning: f64, critical: f64) -> f64 {
    if value >= critical {
        100.0
    } else if value >= warning {
        60.0
    } else {
        (value / warning * 60.0).min(50.0)
    }
}

fn utilization_score(util: f64, t: &DetectorThresholds) -> f64 {
    if util >= t.utilization_high {
        ((util - t.utilization_high) * 4.0).min(100.0)
    } else if util <= t.utilization_low {
        (t.utilization_low - util).min(50.0)
    } else {
        0.0
    }
}
