//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Business**: PRIORITY (class), URGENCY (deadline band), VOLUME (quantity)
//! - **Due-date**: EDD
//! - **Time-based**: SPT
//!
//! # Score Convention
//! All rules return lower scores for jobs that should go first.

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Job;

// ======================== Business rules ========================

/// Priority class: URGENT=100, HIGH=75, MEDIUM=50, LOW=25 (negated).
#[derive(Debug, Clone, Copy)]
pub struct PriorityClass;

impl DispatchingRule for PriorityClass {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        -job.priority.class_score()
    }

    fn description(&self) -> &'static str {
        "Business Priority Class"
    }
}

/// Deadline urgency band.
///
/// Fewer than 3 days left scores 100, fewer than 7 scores 75, fewer than
/// 14 scores 50, anything else 25 (negated).
#[derive(Debug, Clone, Copy)]
pub struct DeadlineUrgency;

impl DeadlineUrgency {
    /// Urgency band for a number of days left (0..=100).
    pub fn band(days_left: f64) -> f64 {
        if days_left < 3.0 {
            100.0
        } else if days_left < 7.0 {
            75.0
        } else if days_left < 14.0 {
            50.0
        } else {
            25.0
        }
    }
}

impl DispatchingRule for DeadlineUrgency {
    fn name(&self) -> &'static str {
        "URGENCY"
    }

    fn evaluate(&self, job: &Job, context: &SchedulingContext) -> RuleScore {
        -Self::band(context.days_until(job.deadline))
    }

    fn description(&self) -> &'static str {
        "Deadline Urgency Band"
    }
}

/// Order volume: larger orders slightly ahead, saturating at
/// `context.volume_full_scale` units (negated, 0..=100).
#[derive(Debug, Clone, Copy)]
pub struct OrderVolume;

impl DispatchingRule for OrderVolume {
    fn name(&self) -> &'static str {
        "VOLUME"
    }

    fn evaluate(&self, job: &Job, context: &SchedulingContext) -> RuleScore {
        if context.volume_full_scale <= 0.0 {
            return -100.0;
        }
        -(job.quantity as f64 / context.volume_full_scale * 100.0).min(100.0)
    }

    fn description(&self) -> &'static str {
        "Order Volume"
    }
}

// ======================== Due-date / time rules ========================

/// Earliest Due Date.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on a single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.deadline.timestamp_millis() as f64
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

/// Shortest Processing Time (by `estimated_hours`).
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.estimated_hours
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}
