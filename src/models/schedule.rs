//! Schedule (solution) model.
//!
//! A schedule run produces assignments of jobs to resource time slots,
//! the jobs that could not be placed, diagnostics explaining why, and
//! aggregate quality metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::timeline::Interval;
use super::Job;

/// A job placed on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Scheduled job ID.
    pub job_id: String,
    /// Snapshot of the job as it was scheduled.
    pub job_details: Job,
    pub assigned_resource_id: String,
    pub assigned_resource_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub estimated_duration_hours: f64,
    /// Score of the winning (resource, slot) candidate.
    pub priority_score: f64,
}

impl ScheduledTask {
    /// The busy interval this task occupies.
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }

    /// Whether the task finishes by its job's deadline.
    #[inline]
    pub fn is_on_time(&self) -> bool {
        self.end_time <= self.job_details.deadline
    }
}

/// Why a job could not be scheduled cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    /// No resource has the skills and headroom for the job.
    NoResource,
    /// A dependency was not scheduled before the job.
    Dependency,
    /// No free slot before the deadline.
    Capacity,
}

/// Conflict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

/// A scheduling diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// Job the conflict concerns.
    pub job_id: String,
    pub description: String,
    pub severity: ConflictSeverity,
}

impl Conflict {
    /// No eligible resource (always HIGH).
    pub fn no_resource(job: &Job) -> Self {
        Self {
            conflict_type: ConflictType::NoResource,
            job_id: job.id.clone(),
            description: format!(
                "No suitable resource found for job {} ({})",
                job.id, job.garment_type
            ),
            severity: ConflictSeverity::High,
        }
    }

    /// Dependencies not yet scheduled (always MEDIUM).
    pub fn dependency(job: &Job, missing: &[&str]) -> Self {
        Self {
            conflict_type: ConflictType::Dependency,
            job_id: job.id.clone(),
            description: format!(
                "Job {} has unmet dependencies: {}",
                job.id,
                missing.join(", ")
            ),
            severity: ConflictSeverity::Medium,
        }
    }

    /// No slot before the deadline; HIGH for URGENT jobs.
    pub fn capacity(job: &Job) -> Self {
        let severity = if job.priority == super::JobPriority::Urgent {
            ConflictSeverity::High
        } else {
            ConflictSeverity::Medium
        };
        Self {
            conflict_type: ConflictType::Capacity,
            job_id: job.id.clone(),
            description: format!("No available time slot for job {} before deadline", job.id),
            severity,
        }
    }
}

/// Aggregate schedule metrics. Percentages are 0-100, rounded to 2 decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub avg_resource_utilization: f64,
    pub on_time_completion_rate: f64,
    pub total_makespan_hours: f64,
    pub wasted_capacity_hours: f64,
}

/// Result of one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Assignments, sorted by start time.
    pub schedule: Vec<ScheduledTask>,
    /// Jobs considered (completed jobs excluded).
    pub total_jobs: usize,
    pub scheduled_jobs: usize,
    pub unscheduled_jobs: Vec<Job>,
    /// Overall quality (0-100).
    pub optimization_score: f64,
    pub metrics: ScheduleMetrics,
    pub recommendations: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

/// A rule broken by a finished schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub violation_type: ViolationType,
    /// Related job or resource ID.
    pub entity_id: String,
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    /// Job finishes after its deadline.
    DeadlineMiss,
    /// Two tasks overlap on one resource.
    CapacityExceeded,
    /// Job starts before one of its scheduled dependencies ends.
    PrecedenceViolation,
}

impl ScheduleResult {
    /// Finds the task for a job.
    pub fn task_for_job(&self, job_id: &str) -> Option<&ScheduledTask> {
        self.schedule.iter().find(|t| t.job_id == job_id)
    }

    /// All tasks on a resource, in start order.
    pub fn tasks_for_resource(&self, resource_id: &str) -> Vec<&ScheduledTask> {
        self.schedule
            .iter()
            .filter(|t| t.assigned_resource_id == resource_id)
            .collect()
    }

    /// Whether a job was left unscheduled.
    pub fn is_unscheduled(&self, job_id: &str) -> bool {
        self.unscheduled_jobs.iter().any(|j| j.id == job_id)
    }

    /// Conflicts recorded for a job.
    pub fn conflicts_for_job(&self, job_id: &str) -> Vec<&Conflict> {
        self.conflicts.iter().filter(|c| c.job_id == job_id).collect()
    }

    /// Re-checks the finished schedule for overlaps, late tasks and
    /// dependency order.
    pub fn audit(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        let mut by_resource: HashMap<&str, Vec<&ScheduledTask>> = HashMap::new();
        for t in &self.schedule {
            by_resource
                .entry(t.assigned_resource_id.as_str())
                .or_default()
                .push(t);
        }
        for (resource_id, mut tasks) in by_resource {
            tasks.sort_by_key(|t| t.start_time);
            for pair in tasks.windows(2) {
                if pair[0].interval().overlaps(&pair[1].interval()) {
                    violations.push(Violation {
                        violation_type: ViolationType::CapacityExceeded,
                        entity_id: resource_id.to_string(),
                        message: format!(
                            "Jobs {} and {} overlap on {}",
                            pair[0].job_id, pair[1].job_id, resource_id
                        ),
                    });
                }
            }
        }

        for t in &self.schedule {
            if !t.is_on_time() {
                violations.push(Violation {
                    violation_type: ViolationType::DeadlineMiss,
                    entity_id: t.job_id.clone(),
                    message: format!("Job {} ends after its deadline", t.job_id),
                });
            }
            for dep in &t.job_details.dependencies {
                if let Some(d) = self.task_for_job(dep) {
                    if t.start_time < d.end_time {
                        violations.push(Violation {
                            violation_type: ViolationType::PrecedenceViolation,
                            entity_id: t.job_id.clone(),
                            message: format!(
                                "Job {} starts before dependency {} ends",
                                t.job_id, dep
                            ),
                        });
                    }
                }
            }
        }

        violations
    }
}
