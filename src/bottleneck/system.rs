//! Whole-line analysis.
//!
//! Every station is scored independently; the line is then modeled as a
//! single path whose throughput is its slowest station.
//!
//! # Reference
//! Goldratt & Cox (1984), "The Goal" (theory of constraints)

use serde::{Deserialize, Serialize};
use tracing::info;

use super::detector::{BottleneckDetection, BottleneckDetector, RootCauseKind};
use crate::error::{EngineError, EngineResult};
use crate::models::StationMetrics;
use crate::scheduler::round2;
use crate::validation;

/// Expected delay for an order held up by a bottleneck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayPrediction {
    /// Placeholder order reference (`ORDER_1`, `ORDER_2`, ...).
    pub order_id: String,
    pub expected_delay_hours: f64,
    pub reason: String,
}

/// Line-level diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAnalysis {
    /// Stations with severity above NONE, in input order.
    pub detected_bottlenecks: Vec<BottleneckDetection>,
    /// Highest-scoring bottleneck; the first one on ties.
    pub primary_bottleneck: Option<BottleneckDetection>,
    /// System / optimal throughput × 100.
    pub overall_efficiency: f64,
    /// Slowest current throughput.
    pub system_throughput: f64,
    /// Slowest rated throughput.
    pub optimal_throughput: f64,
    pub efficiency_loss_percent: f64,
    /// Station IDs in production flow order.
    pub critical_path: Vec<String>,
    pub recommendations: Vec<String>,
    pub predicted_completion_delays: Vec<DelayPrediction>,
}

impl BottleneckDetector {
    /// Diagnoses every station and the line as a whole.
    ///
    /// An empty slice yields an empty analysis at 100 % efficiency.
    pub fn analyze_production_system(&self, all_metrics: &[StationMetrics]) -> SystemAnalysis {
        let detected: Vec<BottleneckDetection> = all_metrics
            .iter()
            .map(|m| self.detect_station_bottleneck(m))
            .filter(|d| d.is_bottleneck)
            .collect();

        let mut primary: Option<&BottleneckDetection> = None;
        for d in &detected {
            if primary.map_or(true, |p| d.bottleneck_score > p.bottleneck_score) {
                primary = Some(d);
            }
        }

        let system_throughput = min_of(all_metrics.iter().map(|m| m.current_throughput));
        let optimal_throughput = min_of(all_metrics.iter().map(|m| m.expected_throughput));
        let efficiency = if all_metrics.is_empty() || optimal_throughput <= 0.0 {
            100.0
        } else {
            system_throughput / optimal_throughput * 100.0
        };
        let efficiency_loss = 100.0 - efficiency;

        let critical_path = self.critical_path(all_metrics);
        let recommendations = system_recommendations(&detected, primary, efficiency_loss);
        let predicted_completion_delays = detected
            .iter()
            .take(self.config().max_delay_predictions)
            .enumerate()
            .map(|(i, d)| DelayPrediction {
                order_id: format!("ORDER_{}", i + 1),
                expected_delay_hours: d.impact.estimated_delay_hours,
                reason: format!(
                    "Delayed by bottleneck at {}",
                    d.station_metrics.station_name
                ),
            })
            .collect();

        info!(
            stations = all_metrics.len(),
            bottlenecks = detected.len(),
            primary = ?primary.map(|p| p.station_metrics.station_id.as_str()),
            efficiency,
            "production system analyzed"
        );

        SystemAnalysis {
            primary_bottleneck: primary.cloned(),
            detected_bottlenecks: detected,
            overall_efficiency: round2(efficiency),
            system_throughput: round2(system_throughput),
            optimal_throughput: round2(optimal_throughput),
            efficiency_loss_percent: round2(efficiency_loss),
            critical_path,
            recommendations,
            predicted_completion_delays,
        }
    }

    /// Validates the snapshots first, then analyzes them.
    pub fn analyze_validated(&self, all_metrics: &[StationMetrics]) -> EngineResult<SystemAnalysis> {
        validation::validate_station_metrics(all_metrics).map_err(EngineError::Validation)?;
        Ok(self.analyze_production_system(all_metrics))
    }

    /// Station IDs ordered by the configured flow; unknown types go last,
    /// input order kept within a type.
    pub fn critical_path(&self, all_metrics: &[StationMetrics]) -> Vec<String> {
        let flow = &self.config().flow_order;
        let mut ordered: Vec<&StationMetrics> = all_metrics.iter().collect();
        ordered.sort_by_key(|m| {
            flow.iter()
                .position(|t| t == &m.station_type)
                .unwrap_or(usize::MAX)
        });
        ordered.into_iter().map(|m| m.station_id.clone()).collect()
    }
}

/// Minimum of an iterator, 0 when empty.
fn min_of(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::min).unwrap_or(0.0)
}

fn system_recommendations(
    bottlenecks: &[BottleneckDetection],
    primary: Option<&BottleneckDetection>,
    efficiency_loss: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(p) = primary {
        out.push(format!(
            "PRIMARY BOTTLENECK: {} ({} severity). Focus optimization efforts here.",
            p.station_metrics.station_name, p.severity
        ));
    }
    if bottlenecks.len() > 3 {
        out.push(format!(
            "Multiple bottlenecks detected ({}). Systematic workflow redesign recommended.",
            bottlenecks.len()
        ));
    }
    if efficiency_loss > 30.0 {
        out.push(format!(
            "System efficiency is {:.0}%. Significant productivity loss.",
            100.0 - efficiency_loss
        ));
    }
    if bottlenecks
        .iter()
        .any(|b| b.has_cause(RootCauseKind::OperatorShortage))
    {
        out.push("Operator staffing issues detected. Review shift schedules.".to_string());
    }
    if bottlenecks
        .iter()
        .any(|b| b.has_cause(RootCauseKind::HighDefectRate))
    {
        out.push(
            "Quality issues contributing to delays. Implement enhanced QC processes.".to_string(),
        );
    }

    if out.is_empty() {
        out.push("Production system running smoothly. No bottlenecks detected.".to_string());
    }
    out
}
