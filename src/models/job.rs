//! Production job model.
//!
//! A job is one unit of garment work (a cut batch, a print run, a sewing lot)
//! waiting to be placed on a resource. Jobs are read-only inputs: the
//! scheduler never mutates them and refers to them by `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StationType;

/// Business priority class of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl JobPriority {
    /// Score of the priority class on a 0..=100 scale.
    pub fn class_score(self) -> f64 {
        match self {
            JobPriority::Urgent => 100.0,
            JobPriority::High => 75.0,
            JobPriority::Medium => 50.0,
            JobPriority::Low => 25.0,
        }
    }
}

/// Lifecycle status of a job as reported by the shop floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Completed,
}

/// A production job to be scheduled.
///
/// # Time Representation
/// `deadline` is an absolute UTC timestamp. Durations are in hours
/// (`estimated_hours` may be fractional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Garment being produced (e.g. "T-Shirt", "Hoodie").
    pub garment_type: String,
    /// Units to produce.
    pub quantity: u32,
    /// Business priority.
    pub priority: JobPriority,
    /// Latest acceptable completion time.
    pub deadline: DateTime<Utc>,
    /// Expected processing time on a single resource (hours).
    pub estimated_hours: f64,
    /// Skills a resource must have to run this job.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// IDs of jobs that must complete before this one starts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Shop-floor status. `Completed` jobs are not scheduled.
    #[serde(default)]
    pub status: JobStatus,
    /// Originating sales order, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Client the order belongs to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Stage the job is currently at, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<StationType>,
}

impl Job {
    /// Creates a pending MEDIUM-priority job with the given deadline.
    pub fn new(id: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            garment_type: String::new(),
            quantity: 0,
            priority: JobPriority::Medium,
            deadline,
            estimated_hours: 0.0,
            required_skills: Vec::new(),
            dependencies: Vec::new(),
            status: JobStatus::Pending,
            order_id: None,
            client_name: None,
            current_stage: None,
        }
    }

    /// Sets the garment type.
    pub fn with_garment_type(mut self, garment_type: impl Into<String>) -> Self {
        self.garment_type = garment_type.into();
        self
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the priority class.
    pub fn with_priority(mut self, priority: JobPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the estimated processing hours.
    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    /// Adds a required skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Adds a dependency on another job.
    pub fn with_dependency(mut self, job_id: impl Into<String>) -> Self {
        self.dependencies.push(job_id.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the originating order and client.
    pub fn with_order(mut self, order_id: impl Into<String>, client: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self.client_name = Some(client.into());
        self
    }

    /// Sets the current production stage.
    pub fn with_stage(mut self, stage: StationType) -> Self {
        self.current_stage = Some(stage);
        self
    }

    /// Whether the job is already done and should be left out of planning.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    /// Whether the job has dependencies.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}
