//! Single-station bottleneck detection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::indicators::Indicators;
use crate::config::DetectorConfig;
use crate::models::StationMetrics;
use crate::scheduler::round2;

/// How badly a station constrains flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BottleneckSeverity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl BottleneckSeverity {
    /// Severity band of a composite score.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Critical
        } else if score >= 60.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Medium
        } else if score >= 20.0 {
            Self::Low
        } else {
            Self::None
        }
    }

    /// Wire name (e.g. "CRITICAL").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for BottleneckSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnosed cause of a bottleneck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RootCauseKind {
    LowThroughput,
    QueueBuildup,
    ExcessiveWaitTime,
    UnderUtilization,
    OverUtilization,
    OperatorShortage,
    HighDefectRate,
}

/// A root cause with its confidence (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCause {
    pub cause: RootCauseKind,
    pub confidence: f64,
    pub description: String,
}

/// Estimated consequences of a station's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    /// Shortfall versus rating, never negative.
    pub throughput_loss_percent: f64,
    /// Time to drain the queue plus average wait.
    pub estimated_delay_hours: f64,
    pub affected_orders: u32,
    pub cost_impact_php: f64,
}

/// Urgency of a recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Rough cost of carrying out an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImplementationCost {
    Low,
    Medium,
    High,
}

/// A corrective action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: ActionPriority,
    pub estimated_impact: String,
    pub implementation_cost: ImplementationCost,
}

impl Recommendation {
    fn new(
        action: &str,
        priority: ActionPriority,
        estimated_impact: &str,
        implementation_cost: ImplementationCost,
    ) -> Self {
        Self {
            action: action.to_string(),
            priority,
            estimated_impact: estimated_impact.to_string(),
            implementation_cost,
        }
    }
}

/// Diagnosis of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckDetection {
    /// `severity != NONE`.
    pub is_bottleneck: bool,
    pub severity: BottleneckSeverity,
    /// Composite score (0-100, 2 decimals).
    pub bottleneck_score: f64,
    pub impact: Impact,
    /// Sorted by confidence, highest first.
    pub root_causes: Vec<RootCause>,
    pub recommendations: Vec<Recommendation>,
    pub indicators: Indicators,
    pub station_metrics: StationMetrics,
}

impl BottleneckDetection {
    /// Whether a cause was diagnosed.
    pub fn has_cause(&self, kind: RootCauseKind) -> bool {
        self.root_causes.iter().any(|c| c.cause == kind)
    }
}

/// Scores stations, explains why they constrain flow and suggests fixes.
///
/// Stateless apart from its configuration: detection is a pure function of
/// the snapshot.
///
/// # Example
///
/// ```
/// use u_prodline::bottleneck::{BottleneckDetector, BottleneckSeverity};
/// use u_prodline::models::{StationMetrics, StationType};
///
/// let sewing = StationMetrics::new("S1", "Sewing A", StationType::Sewing)
///     .with_throughput(50.0, 100.0)
///     .with_queue(35);
/// let detection = BottleneckDetector::new().detect_station_bottleneck(&sewing);
/// assert!(detection.is_bottleneck);
/// assert!(detection.severity >= BottleneckSeverity::Medium);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BottleneckDetector {
    config: DetectorConfig,
}

impl BottleneckDetector {
    /// Creates a detector with production thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector from a configuration.
    ///
    /// Values [`DetectorConfig::check`] rejects are replaced by their
    /// defaults with a warning.
    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// The detector's configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Diagnoses a single station.
    pub fn detect_station_bottleneck(&self, metrics: &StationMetrics) -> BottleneckDetection {
        let indicators = Indicators::compute(metrics, &self.config.thresholds);
        let score = indicators.composite(&self.config.weights);
        let severity = BottleneckSeverity::from_score(score);

        let root_causes = self.identify_root_causes(metrics, &indicators);
        let impact = self.calculate_impact(metrics, score);
        let recommendations = station_recommendations(&root_causes, severity);

        debug!(
            station_id = %metrics.station_id,
            score,
            severity = %severity,
            causes = root_causes.len(),
            "station scored"
        );

        BottleneckDetection {
            is_bottleneck: severity != BottleneckSeverity::None,
            severity,
            bottleneck_score: round2(score),
            impact,
            root_causes,
            recommendations,
            indicators,
            station_metrics: metrics.clone(),
        }
    }

    fn identify_root_causes(&self, m: &StationMetrics, i: &Indicators) -> Vec<RootCause> {
        let t = &self.config.thresholds;
        let mut causes = Vec::new();

        if i.throughput_loss > 50.0 {
            causes.push(RootCause {
                cause: RootCauseKind::LowThroughput,
                confidence: i.throughput_loss.min(100.0),
                description: format!(
                    "Station throughput is {:.0}% below expected",
                    m.throughput_loss_percent()
                ),
            });
        }
        if i.queue_pressure > 50.0 {
            causes.push(RootCause {
                cause: RootCauseKind::QueueBuildup,
                confidence: i.queue_pressure.min(100.0),
                description: format!(
                    "Queue has {} pending items, causing delays",
                    m.queue_length
                ),
            });
        }
        if i.wait_time_impact > 50.0 {
            causes.push(RootCause {
                cause: RootCauseKind::ExcessiveWaitTime,
                confidence: i.wait_time_impact.min(100.0),
                description: format!("Average wait time is {} minutes", m.avg_wait_time_minutes),
            });
        }
        if m.utilization_rate < t.utilization_low {
            causes.push(RootCause {
                cause: RootCauseKind::UnderUtilization,
                confidence: 80.0,
                description: format!("Station utilization is only {:.0}%", m.utilization_rate),
            });
        } else if m.utilization_rate > t.utilization_high {
            causes.push(RootCause {
                cause: RootCauseKind::OverUtilization,
                confidence: 85.0,
                description: format!(
                    "Station utilization is {:.0}%, risking operator burnout",
                    m.utilization_rate
                ),
            });
        }
        if m.active_operators < m.operator_count {
            causes.push(RootCause {
                cause: RootCauseKind::OperatorShortage,
                confidence: 90.0,
                description: format!(
                    "{} operator(s) missing from station ({}/{})",
                    m.operator_shortage(),
                    m.active_operators,
                    m.operator_count
                ),
            });
        }
        if i.quality_impact > 50.0 {
            causes.push(RootCause {
                cause: RootCauseKind::HighDefectRate,
                confidence: i.quality_impact.min(100.0),
                description: format!(
                    "Defect rate is {:.1}%, causing rework delays",
                    m.defect_rate
                ),
            });
        }

        // Stable: equal confidences keep detection order.
        causes.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        causes
    }

    fn calculate_impact(&self, m: &StationMetrics, score: f64) -> Impact {
        let drain_hours = if m.current_throughput > 0.0 {
            m.queue_length as f64 / m.current_throughput
        } else {
            0.0
        };
        let delay = drain_hours + m.avg_wait_time_minutes / 60.0;

        let affected_orders = match self.config.units_per_order {
            0 => 0,
            per_order => m.queue_length.div_ceil(per_order),
        };

        Impact {
            throughput_loss_percent: round2(m.throughput_loss_percent().max(0.0)),
            estimated_delay_hours: round2(delay),
            affected_orders,
            cost_impact_php: round2(delay * self.config.cost_per_delay_hour * (score / 100.0)),
        }
    }
}

/// One templated action per root cause, in cause order; a monitoring
/// fallback when nothing applies.
fn station_recommendations(
    causes: &[RootCause],
    severity: BottleneckSeverity,
) -> Vec<Recommendation> {
    use ActionPriority as P;
    use ImplementationCost as C;

    let critical = severity == BottleneckSeverity::Critical;
    let mut out: Vec<Recommendation> = causes
        .iter()
        .filter_map(|c| match c.cause {
            RootCauseKind::OperatorShortage => Some(Recommendation::new(
                "Assign additional operators to this station immediately",
                if critical { P::Urgent } else { P::High },
                "Increase throughput by 30-50%",
                C::Low,
            )),
            RootCauseKind::LowThroughput => Some(Recommendation::new(
                "Investigate and optimize work processes at this station",
                P::High,
                "Reduce processing time per unit",
                C::Medium,
            )),
            RootCauseKind::QueueBuildup => Some(Recommendation::new(
                "Redistribute workload or add parallel processing capacity",
                if critical { P::Urgent } else { P::Medium },
                "Clear queue backlog within 24-48 hours",
                C::Medium,
            )),
            RootCauseKind::OverUtilization => Some(Recommendation::new(
                "Schedule operator breaks and rotate assignments to prevent burnout",
                P::High,
                "Maintain sustainable productivity",
                C::Low,
            )),
            RootCauseKind::HighDefectRate => Some(Recommendation::new(
                "Implement additional quality checks and operator retraining",
                P::High,
                "Reduce rework and improve first-pass yield",
                C::Medium,
            )),
            RootCauseKind::UnderUtilization => Some(Recommendation::new(
                "Reallocate operators to busier stations or schedule maintenance",
                P::Medium,
                "Better resource allocation and cost savings",
                C::Low,
            )),
            RootCauseKind::ExcessiveWaitTime => None,
        })
        .collect();

    if out.is_empty() {
        out.push(Recommendation::new(
            "Continue monitoring - no immediate action required",
            P::Low,
            "Maintain current performance levels",
            C::Low,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationType;

    fn station() -> StationMetrics {
        StationMetrics::new("S1", "Sewing A", StationType::Sewing)
    }

    fn critical_station() -> StationMetrics {
        station()
            .with_throughput(50.0, 100.0)
            .with_queue(35)
            .with_wait_minutes(150.0)
            .with_utilization(97.0)
            .with_defect_rate(12.0)
    }

    #[test]
    fn test_healthy_station() {
        let d = BottleneckDetector::new().detect_station_bottleneck(&station());
        assert!(!d.is_bottleneck);
        assert_eq!(d.severity, BottleneckSeverity::None);
        assert!((d.bottleneck_score - 0.0).abs() < 1e-10);
        assert!(d.root_causes.is_empty());
        assert_eq!(d.recommendations.len(), 1);
        assert_eq!(d.recommendations[0].priority, ActionPriority::Low);
        assert!(d.recommendations[0].action.starts_with("Continue monitoring"));
    }

    #[test]
    fn test_critical_station() {
        let d = BottleneckDetector::new().detect_station_bottleneck(&critical_station());
        assert!(d.is_bottleneck);
        assert_eq!(d.severity, BottleneckSeverity::Critical);
        assert!((d.bottleneck_score - 86.2).abs() < 1e-9);

        let causes: Vec<_> = d.root_causes.iter().map(|c| c.cause).collect();
        assert_eq!(
            causes,
            vec![
                RootCauseKind::LowThroughput,
                RootCauseKind::QueueBuildup,
                RootCauseKind::ExcessiveWaitTime,
                RootCauseKind::HighDefectRate,
                RootCauseKind::OverUtilization,
            ]
        );
        assert_eq!(d.root_causes[0].description, "Station throughput is 50% below expected");
        assert_eq!(d.root_causes[2].description, "Average wait time is 150 minutes");
        assert_eq!(
            d.root_causes[3].description,
            "Defect rate is 12.0%, causing rework delays"
        );

        // No recommendation for wait time
        assert_eq!(d.recommendations.len(), 4);
        assert_eq!(d.recommendations[1].priority, ActionPriority::Urgent);
        assert_eq!(d.recommendations[1].implementation_cost, ImplementationCost::Medium);
    }

    #[test]
    fn test_critical_station_impact() {
        let d = BottleneckDetector::new().detect_station_bottleneck(&critical_station());
        assert!((d.impact.throughput_loss_percent - 50.0).abs() < 1e-10);
        // 35/50 + 150/60
        assert!((d.impact.estimated_delay_hours - 3.2).abs() < 1e-10);
        assert_eq!(d.impact.affected_orders, 1);
        // 3.2 * 5000 * 0.862
        assert!((d.impact.cost_impact_php - 13792.0).abs() < 1e-6);
    }

    #[test]
    fn test_operator_shortage_cause() {
        let m = station().with_operators(6, 4);
        let d = BottleneckDetector::new().detect_station_bottleneck(&m);
        assert!(d.has_cause(RootCauseKind::OperatorShortage));
        let c = &d.root_causes[0];
        assert!((c.confidence - 90.0).abs() < 1e-10);
        assert_eq!(c.description, "2 operator(s) missing from station (4/6)");
        assert_eq!(d.recommendations[0].priority, ActionPriority::High);
    }

    #[test]
    fn test_under_utilization() {
        let m = station().with_utilization(30.0);
        let d = BottleneckDetector::new().detect_station_bottleneck(&m);
        // 30 * 0.15 = 4.5
        assert!((d.bottleneck_score - 4.5).abs() < 1e-10);
        assert_eq!(d.severity, BottleneckSeverity::None);
        assert!(d.has_cause(RootCauseKind::UnderUtilization));
        assert_eq!(d.recommendations[0].priority, ActionPriority::Medium);
    }

    #[test]
    fn test_zero_throughput_guards() {
        let m = station().with_throughput(0.0, 0.0).with_queue(40).with_wait_minutes(30.0);
        let d = BottleneckDetector::new().detect_station_bottleneck(&m);
        assert!((d.indicators.throughput_loss - 0.0).abs() < 1e-10);
        assert!((d.impact.throughput_loss_percent - 0.0).abs() < 1e-10);
        assert!((d.impact.estimated_delay_hours - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_outperforming_station_has_no_negative_loss() {
        let m = station().with_throughput(130.0, 100.0);
        let d = BottleneckDetector::new().detect_station_bottleneck(&m);
        assert!((d.impact.throughput_loss_percent - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_affected_orders_rounds_up() {
        let d = BottleneckDetector::new().detect_station_bottleneck(&station().with_queue(201));
        assert_eq!(d.impact.affected_orders, 3);
        let d = BottleneckDetector::new().detect_station_bottleneck(&station());
        assert_eq!(d.impact.affected_orders, 0);
    }

    #[test]
    fn test_score_monotone_in_queue() {
        let detector = BottleneckDetector::new();
        let base = station().with_throughput(70.0, 100.0).with_wait_minutes(45.0);
        let mut last = -1.0;
        for q in 0..60 {
            let s = detector
                .detect_station_bottleneck(&base.clone().with_queue(q))
                .bottleneck_score;
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn test_detection_is_idempotent() {
        let detector = BottleneckDetector::new();
        let a = detector.detect_station_bottleneck(&critical_station());
        let b = detector.detect_station_bottleneck(&critical_station());
        assert_eq!(a, b);
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(BottleneckSeverity::from_score(80.0), BottleneckSeverity::Critical);
        assert_eq!(BottleneckSeverity::from_score(79.99), BottleneckSeverity::High);
        assert_eq!(BottleneckSeverity::from_score(40.0), BottleneckSeverity::Medium);
        assert_eq!(BottleneckSeverity::from_score(20.0), BottleneckSeverity::Low);
        assert_eq!(BottleneckSeverity::from_score(19.99), BottleneckSeverity::None);
        assert!(BottleneckSeverity::Critical > BottleneckSeverity::Low);
        assert_eq!(BottleneckSeverity::High.to_string(), "HIGH");
    }

    #[test]
    fn test_custom_cost_config() {
        let config = DetectorConfig {
            cost_per_delay_hour: 10_000.0,
            ..DetectorConfig::default()
        };
        let d = BottleneckDetector::with_config(config).detect_station_bottleneck(&critical_station());
        assert!((d.impact.cost_impact_php - 27584.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_warning_threshold_uses_default() {
        let mut config = DetectorConfig::default();
        config.thresholds.queue_length_warning = 0.0;
        let detector = BottleneckDetector::with_config(config);
        assert!((detector.config().thresholds.queue_length_warning - 10.0).abs() < 1e-10);

        let idle = StationMetrics::new("S1", "Sewing A", StationType::Sewing);
        let d = detector.detect_station_bottleneck(&idle);
        assert!(d.bottleneck_score.is_finite());
        assert!((d.indicators.queue_pressure - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_detection_serializes() {
        let d = BottleneckDetector::new().detect_station_bottleneck(&critical_station());
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["root_causes"][0]["cause"], "LOW_THROUGHPUT");
        assert_eq!(json["station_metrics"]["station_type"], "SEWING");
    }
}
