//! Engine configuration.
//!
//! Every constant the algorithms depend on (workday start, planning horizon,
//! detection thresholds, cost per delay hour) lives here with its production
//! default, so it can be tuned per site without touching algorithm code.
//!
//! # Loading
//!
//! ```
//! use u_prodline::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{ "scheduler": { "workday_start_hour": 7 } }"#,
//! ).unwrap();
//! assert_eq!(config.scheduler.workday_start_hour, 7);
//! assert_eq!(config.scheduler.planning_horizon_days, 30);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::StationType;

/// How unmet dependencies affect a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyPolicy {
    /// Record a DEPENDENCY conflict and still schedule the job from the
    /// global start.
    #[default]
    Advisory,
    /// Record a DEPENDENCY conflict and leave the job unscheduled.
    Strict,
}

/// Weights of the job prioritization score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityWeights {
    pub priority_class: f64,
    pub deadline_urgency: f64,
    pub order_volume: f64,
    /// Quantity at which the volume term saturates.
    pub volume_full_scale: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            priority_class: 0.4,
            deadline_urgency: 0.4,
            order_volume: 0.2,
            volume_full_scale: 1000.0,
        }
    }
}

/// Weights of the (resource, slot) candidate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssignmentWeights {
    pub efficiency: f64,
    pub deadline_margin: f64,
    pub utilization_balance: f64,
    /// Flat penalty when the slot leaves no margin before the deadline.
    pub deadline_miss_penalty: f64,
    /// Utilization below which a resource counts as fully balanced.
    pub balanced_utilization: f64,
}

impl Default for AssignmentWeights {
    fn default() -> Self {
        Self {
            efficiency: 0.3,
            deadline_margin: 0.4,
            utilization_balance: 0.3,
            deadline_miss_penalty: 50.0,
            balanced_utilization: 80.0,
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Hour of day (UTC) at which each workday window opens.
    pub workday_start_hour: u32,
    /// Days of capacity counted when computing utilization.
    pub planning_horizon_days: u32,
    /// Resources at or above this utilization are not eligible.
    pub max_utilization_percent: f64,
    pub dependency_policy: DependencyPolicy,
    pub priority_weights: PriorityWeights,
    pub assignment_weights: AssignmentWeights,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workday_start_hour: 8,
            planning_horizon_days: 30,
            max_utilization_percent: 95.0,
            dependency_policy: DependencyPolicy::Advisory,
            priority_weights: PriorityWeights::default(),
            assignment_weights: AssignmentWeights::default(),
        }
    }
}

impl SchedulerConfig {
    /// Sets the dependency policy.
    pub fn with_dependency_policy(mut self, policy: DependencyPolicy) -> Self {
        self.dependency_policy = policy;
        self
    }

    /// Sets the workday start hour.
    pub fn with_workday_start_hour(mut self, hour: u32) -> Self {
        self.workday_start_hour = hour;
        self
    }

    /// Sets the planning horizon.
    pub fn with_planning_horizon_days(mut self, days: u32) -> Self {
        self.planning_horizon_days = days;
        self
    }

    /// Sets the utilization eligibility cap.
    pub fn with_max_utilization(mut self, percent: f64) -> Self {
        self.max_utilization_percent = percent;
        self
    }

    /// Rejects values the scheduler cannot work with.
    pub fn check(&self) -> EngineResult<()> {
        if self.workday_start_hour > 23 {
            return Err(EngineError::InvalidConfig(format!(
                "workday_start_hour must be 0-23, got {}",
                self.workday_start_hour
            )));
        }
        if self.planning_horizon_days == 0 {
            return Err(EngineError::InvalidConfig(
                "planning_horizon_days must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Replaces every value `check` would reject with its default.
    pub(crate) fn sanitized(mut self) -> Self {
        let d = Self::default();
        if self.workday_start_hour > 23 {
            warn!(
                hour = self.workday_start_hour,
                "workday_start_hour out of range, using default"
            );
            self.workday_start_hour = d.workday_start_hour;
        }
        if self.planning_horizon_days == 0 {
            warn!("planning_horizon_days is zero, using default");
            self.planning_horizon_days = d.planning_horizon_days;
        }
        self
    }
}

/// Warning/critical thresholds for station symptoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorThresholds {
    pub queue_length_warning: f64,
    pub queue_length_critical: f64,
    /// Minutes.
    pub wait_time_warning: f64,
    /// Minutes.
    pub wait_time_critical: f64,
    /// Percent.
    pub throughput_loss_warning: f64,
    /// Percent.
    pub throughput_loss_critical: f64,
    pub utilization_low: f64,
    pub utilization_high: f64,
    pub defect_rate_warning: f64,
    pub defect_rate_critical: f64,
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self {
            queue_length_warning: 10.0,
            queue_length_critical: 30.0,
            wait_time_warning: 30.0,
            wait_time_critical: 120.0,
            throughput_loss_warning: 20.0,
            throughput_loss_critical: 40.0,
            utilization_low: 60.0,
            utilization_high: 95.0,
            defect_rate_warning: 5.0,
            defect_rate_critical: 10.0,
        }
    }
}

impl DetectorThresholds {
    fn pairs(&self) -> [(&'static str, f64, f64); 4] {
        [
            ("queue_length", self.queue_length_warning, self.queue_length_critical),
            ("wait_time", self.wait_time_warning, self.wait_time_critical),
            ("throughput_loss", self.throughput_loss_warning, self.throughput_loss_critical),
            ("defect_rate", self.defect_rate_warning, self.defect_rate_critical),
        ]
    }
}

/// `0 < warning <= critical`, false for NaN.
fn valid_band(warning: f64, critical: f64) -> bool {
    warning > 0.0 && critical >= warning
}

/// Weights of the composite bottleneck score. Should sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorWeights {
    pub throughput: f64,
    pub queue: f64,
    pub wait_time: f64,
    pub utilization: f64,
    pub quality: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            throughput: 0.35,
            queue: 0.25,
            wait_time: 0.20,
            utilization: 0.15,
            quality: 0.05,
        }
    }
}

/// Bottleneck detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub thresholds: DetectorThresholds,
    pub weights: IndicatorWeights,
    /// PHP lost per hour of delay at a fully critical station.
    pub cost_per_delay_hour: f64,
    /// Units assumed per customer order when estimating affected orders.
    pub units_per_order: u32,
    /// Canonical station flow used to order the critical path.
    pub flow_order: Vec<StationType>,
    /// Cap on synthetic delay predictions per system analysis.
    pub max_delay_predictions: usize,
    /// Most recent snapshots compared against the rest in trend analysis.
    pub trend_window: usize,
    /// Efficiency points a trend must move to leave STABLE.
    pub trend_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            thresholds: DetectorThresholds::default(),
            weights: IndicatorWeights::default(),
            cost_per_delay_hour: 5000.0,
            units_per_order: 100,
            flow_order: vec![
                StationType::Cutting,
                StationType::Printing,
                StationType::Sewing,
                StationType::Qc,
                StationType::Finishing,
            ],
            max_delay_predictions: 5,
            trend_window: 3,
            trend_threshold: 5.0,
        }
    }
}

impl DetectorConfig {
    /// Rejects values the detector cannot work with.
    pub fn check(&self) -> EngineResult<()> {
        if self.units_per_order == 0 {
            return Err(EngineError::InvalidConfig(
                "units_per_order must be positive".into(),
            ));
        }
        if self.trend_window == 0 {
            return Err(EngineError::InvalidConfig(
                "trend_window must be positive".into(),
            ));
        }
        for (name, warning, critical) in self.thresholds.pairs() {
            if !valid_band(warning, critical) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} thresholds need 0 < warning <= critical"
                )));
            }
        }
        Ok(())
    }

    /// Replaces every value `check` would reject with its default.
    pub(crate) fn sanitized(mut self) -> Self {
        let d = Self::default();
        if self.units_per_order == 0 {
            warn!("units_per_order is zero, using default");
            self.units_per_order = d.units_per_order;
        }
        if self.trend_window == 0 {
            warn!("trend_window is zero, using default");
            self.trend_window = d.trend_window;
        }
        let dt = &d.thresholds;
        let t = &mut self.thresholds;
        for (name, warning, critical, default_warning, default_critical) in [
            (
                "queue_length",
                &mut t.queue_length_warning,
                &mut t.queue_length_critical,
                dt.queue_length_warning,
                dt.queue_length_critical,
            ),
            (
                "wait_time",
                &mut t.wait_time_warning,
                &mut t.wait_time_critical,
                dt.wait_time_warning,
                dt.wait_time_critical,
            ),
            (
                "throughput_loss",
                &mut t.throughput_loss_warning,
                &mut t.throughput_loss_critical,
                dt.throughput_loss_warning,
                dt.throughput_loss_critical,
            ),
            (
                "defect_rate",
                &mut t.defect_rate_warning,
                &mut t.defect_rate_critical,
                dt.defect_rate_warning,
                dt.defect_rate_critical,
            ),
        ] {
            if !valid_band(*warning, *critical) {
                warn!(
                    threshold = name,
                    warning = *warning,
                    critical = *critical,
                    "invalid threshold band, using defaults"
                );
                *warning = default_warning;
                *critical = default_critical;
            }
        }
        self
    }
}

/// Combined configuration for both engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub scheduler: SchedulerConfig,
    pub detector: DetectorConfig,
}

impl EngineConfig {
    /// Parses and checks a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects values the algorithms cannot work with.
    pub fn check(&self) -> EngineResult<()> {
        self.scheduler.check()?;
        self.detector.check()
    }
}
