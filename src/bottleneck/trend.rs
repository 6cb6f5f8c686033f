//! Efficiency trend over a series of line snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::detector::{BottleneckDetector, BottleneckSeverity};
use crate::models::StationMetrics;

/// All station snapshots taken at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSnapshot {
    pub timestamp: DateTime<Utc>,
    pub metrics: Vec<StationMetrics>,
}

impl HistoricalSnapshot {
    /// Creates a snapshot.
    pub fn new(timestamp: DateTime<Utc>, metrics: Vec<StationMetrics>) -> Self {
        Self { timestamp, metrics }
    }
}

/// Summary of one analyzed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub bottleneck_count: usize,
    /// Severity of the primary bottleneck, NONE if there is none.
    pub worst_severity: BottleneckSeverity,
    /// Name of the primary bottleneck station, "N/A" if there is none.
    pub primary_station: String,
    pub efficiency: f64,
}

/// Direction of line efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
}

/// Result of trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: TrendDirection,
    /// One-line summary of the trend.
    pub trend_analysis: String,
    /// One point per snapshot, in input order.
    pub historical_bottlenecks: Vec<TrendPoint>,
    pub recommendations: Vec<String>,
}

impl BottleneckDetector {
    /// Compares recent line efficiency against the earlier baseline.
    ///
    /// The last `trend_window` points form the recent window; all earlier
    /// points form the baseline. Without a baseline the trend is STABLE and
    /// the recent mean averages only the points present; a short history is
    /// never compared against an implicit zero baseline.
    pub fn analyze_bottleneck_trends(&self, history: &[HistoricalSnapshot]) -> TrendAnalysis {
        let points: Vec<TrendPoint> = history
            .iter()
            .map(|h| {
                let analysis = self.analyze_production_system(&h.metrics);
                let (worst_severity, primary_station) = match &analysis.primary_bottleneck {
                    Some(p) => (p.severity, p.station_metrics.station_name.clone()),
                    None => (BottleneckSeverity::None, "N/A".to_string()),
                };
                TrendPoint {
                    timestamp: h.timestamp,
                    bottleneck_count: analysis.detected_bottlenecks.len(),
                    worst_severity,
                    primary_station,
                    efficiency: analysis.overall_efficiency,
                }
            })
            .collect();

        let split = points.len().saturating_sub(self.config().trend_window);
        let (older, recent) = points.split_at(split);
        let recent_mean = mean_efficiency(recent);
        let baseline = if older.is_empty() {
            None
        } else {
            Some(mean_efficiency(older))
        };

        let threshold = self.config().trend_threshold;
        let trend = match baseline {
            Some(b) if recent_mean > b + threshold => TrendDirection::Improving,
            Some(b) if recent_mean < b - threshold => TrendDirection::Worsening,
            _ => TrendDirection::Stable,
        };

        let trend_analysis = match (trend, baseline) {
            _ if points.is_empty() => "No historical snapshots to analyze".to_string(),
            (TrendDirection::Improving, Some(b)) => format!(
                "Production efficiency improving ({recent_mean:.0}% recent vs {b:.0}% historical)"
            ),
            (TrendDirection::Worsening, Some(b)) => format!(
                "Production efficiency declining ({recent_mean:.0}% recent vs {b:.0}% historical). Immediate attention required."
            ),
            _ => format!("Production efficiency stable at ~{recent_mean:.0}%"),
        };

        let recommendations = if trend == TrendDirection::Worsening {
            vec![
                "Urgent: schedule a production review meeting to address declining efficiency"
                    .to_string(),
                "Analyze root causes of the recent performance decline".to_string(),
            ]
        } else {
            Vec::new()
        };

        info!(snapshots = points.len(), trend = ?trend, recent_mean, "trend analyzed");

        TrendAnalysis {
            trend,
            trend_analysis,
            historical_bottlenecks: points,
            recommendations,
        }
    }
}

fn mean_efficiency(points: &[TrendPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.efficiency).sum::<f64>() / points.len() as f64
}
