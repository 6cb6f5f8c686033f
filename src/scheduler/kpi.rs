//! Schedule quality metrics (KPIs), the optimization score and
//! plain-language recommendations.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg Utilization | Scheduled hours / horizon capacity × 100 |
//! | On-Time Rate | Tasks ending by their deadline / scheduled tasks × 100 |
//! | Makespan | Latest end − schedule start, in hours |
//! | Wasted Capacity | Horizon capacity − scheduled hours |
//!
//! Horizon capacity is `Σ capacity_hours_per_day × planning_horizon_days`.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use chrono::{DateTime, Utc};

use crate::models::timeline::duration_to_hours;
use crate::models::{Conflict, ConflictSeverity, Resource, ScheduleMetrics, ScheduledTask};

/// Unrounded schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Capacity of all resources over the planning horizon (hours).
    pub total_capacity_hours: f64,
    /// Scheduled work (hours).
    pub used_hours: f64,
    /// Average utilization over the horizon (0-100).
    pub avg_utilization: f64,
    /// Share of tasks ending by their deadline (0-100).
    pub on_time_rate: f64,
    /// Latest end − start (hours).
    pub makespan_hours: f64,
    /// Capacity left unused over the horizon (hours).
    pub wasted_capacity_hours: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a schedule.
    ///
    /// # Arguments
    /// * `schedule` - Committed tasks.
    /// * `resources` - All resources, scheduled on or not.
    /// * `start` - Schedule start, the makespan origin.
    /// * `horizon_days` - Days of capacity to count.
    pub fn calculate(
        schedule: &[ScheduledTask],
        resources: &[Resource],
        start: DateTime<Utc>,
        horizon_days: u32,
    ) -> Self {
        let horizon = horizon_days as f64;
        let total_capacity_hours: f64 = resources
            .iter()
            .map(|r| r.capacity_hours_per_day * horizon)
            .sum();
        let used_hours: f64 = schedule.iter().map(|t| t.estimated_duration_hours).sum();

        let avg_utilization = if total_capacity_hours > 0.0 {
            used_hours / total_capacity_hours * 100.0
        } else {
            0.0
        };

        let on_time_rate = if schedule.is_empty() {
            100.0
        } else {
            let on_time = schedule.iter().filter(|t| t.is_on_time()).count();
            on_time as f64 / schedule.len() as f64 * 100.0
        };

        let latest_end = schedule
            .iter()
            .map(|t| t.end_time)
            .fold(start, |acc, end| acc.max(end));
        let makespan_hours = duration_to_hours(latest_end - start);

        Self {
            total_capacity_hours,
            used_hours,
            avg_utilization,
            on_time_rate,
            makespan_hours,
            wasted_capacity_hours: total_capacity_hours - used_hours,
        }
    }

    /// Reported metrics, rounded to 2 decimals.
    pub fn metrics(&self) -> ScheduleMetrics {
        ScheduleMetrics {
            avg_resource_utilization: round2(self.avg_utilization),
            on_time_completion_rate: round2(self.on_time_rate),
            total_makespan_hours: round2(self.makespan_hours),
            wasted_capacity_hours: round2(self.wasted_capacity_hours),
        }
    }
}

/// Rounds to 2 decimal places.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub(crate) fn calculate_metrics(
    schedule: &[ScheduledTask],
    resources: &[Resource],
    start: DateTime<Utc>,
    horizon_days: u32,
) -> ScheduleMetrics {
    ScheduleKpi::calculate(schedule, resources, start, horizon_days).metrics()
}

/// Fitness of an average utilization: 100 inside the 70-85 % band, falling
/// off linearly on either side.
pub fn utilization_fitness(utilization: f64) -> f64 {
    let fitness = if utilization < 70.0 {
        utilization * 1.43
    } else if utilization > 85.0 {
        100.0 - (utilization - 85.0) * 2.0
    } else {
        100.0
    };
    fitness.clamp(0.0, 100.0)
}

/// Overall schedule quality (0-100, 2 decimals).
///
/// Scheduled ratio 40 %, on-time rate 30 %, utilization fitness 20 %,
/// makespan 10 % (one point lost per 10 hours).
pub fn optimization_score(metrics: &ScheduleMetrics, unscheduled: usize, total_jobs: usize) -> f64 {
    let scheduled_rate = if total_jobs == 0 {
        100.0
    } else {
        total_jobs.saturating_sub(unscheduled) as f64 / total_jobs as f64 * 100.0
    };
    let makespan_score = (100.0 - metrics.total_makespan_hours / 10.0).max(0.0);

    let score = scheduled_rate * 0.4
        + metrics.on_time_completion_rate * 0.3
        + utilization_fitness(metrics.avg_resource_utilization) * 0.2
        + makespan_score * 0.1;

    round2(score.clamp(0.0, 100.0))
}

/// Actionable advice for a finished schedule. Never empty.
pub fn generate_recommendations(
    unscheduled: usize,
    metrics: &ScheduleMetrics,
    conflicts: &[Conflict],
) -> Vec<String> {
    let mut out = Vec::new();

    if unscheduled > 0 {
        out.push(format!(
            "{unscheduled} job(s) could not be scheduled. Consider adding resources or extending deadlines."
        ));
    }

    let util = metrics.avg_resource_utilization;
    if util < 60.0 {
        out.push(format!(
            "Low resource utilization ({util:.1}%). Consider taking on more orders or consolidating resources."
        ));
    } else if util > 90.0 {
        out.push(format!(
            "High resource utilization ({util:.1}%). Risk of delays; consider adding capacity."
        ));
    }

    if metrics.on_time_completion_rate < 90.0 {
        out.push(format!(
            "On-time completion rate is {:.1}%. Review deadlines and resource allocation.",
            metrics.on_time_completion_rate
        ));
    }

    let high = conflicts
        .iter()
        .filter(|c| c.severity == ConflictSeverity::High)
        .count();
    if high > 0 {
        out.push(format!(
            "{high} high-severity conflict(s) detected. Immediate attention required."
        ));
    }

    if metrics.wasted_capacity_hours > 200.0 {
        out.push(format!(
            "{:.0} hours of unused capacity. Opportunity to accept additional orders.",
            metrics.wasted_capacity_hours
        ));
    }

    if out.is_empty() {
        out.push("Schedule is well-optimized with no major issues.".to_string());
    }
    out
}
