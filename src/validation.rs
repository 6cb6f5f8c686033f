//! Input validation for scheduling and bottleneck analysis.
//!
//! The engines accept any input and report infeasibility inside their
//! results. These checks are opt-in and catch structural mistakes in
//! caller data before it reaches an engine:
//! - Duplicate IDs
//! - Dependencies on jobs that don't exist
//! - Circular dependencies (DAG validation)
//! - Negative hours or rates and out-of-range percentages
//!
//! All problems are collected; validation never stops at the first one.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{Job, Resource, StationMetrics};
use std::collections::{HashMap, HashSet};

/// Longest job accepted, in hours (one calendar year of continuous work).
pub const MAX_JOB_HOURS: f64 = 8_760.0;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A job depends on a job that doesn't exist.
    UnknownDependency,
    /// A job depends on itself.
    SelfDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// A count, duration or rate is negative or not a number.
    NegativeValue,
    /// A percentage lies outside 0-100.
    OutOfRange,
    /// A resource has no working hours.
    NoCapacity,
    /// More operators present than rostered.
    OperatorMismatch,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates jobs and resources for a scheduling run.
///
/// Checks:
/// 1. No duplicate job IDs
/// 2. No duplicate resource IDs
/// 3. Every dependency names an existing job other than itself
/// 4. No circular dependencies
/// 5. Hours within 0..=`MAX_JOB_HOURS`; daily capacity within (0, 24]
/// 6. Utilization and efficiency within 0-100
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(jobs: &[Job], resources: &[Resource]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
        if r.capacity_hours_per_day.is_nan() || r.capacity_hours_per_day <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoCapacity,
                format!("Resource '{}' has no daily capacity", r.id),
            ));
        } else if r.capacity_hours_per_day > 24.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!(
                    "Resource '{}' capacity_hours_per_day {} exceeds 24",
                    r.id, r.capacity_hours_per_day
                ),
            ));
        }
        check_percent(&mut errors, &r.id, "current_utilization", r.current_utilization);
        check_percent(&mut errors, &r.id, "efficiency_rating", r.efficiency_rating);
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        if job.estimated_hours.is_nan() || job.estimated_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("Job '{}' has negative estimated_hours", job.id),
            ));
        } else if job.estimated_hours > MAX_JOB_HOURS {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!(
                    "Job '{}' estimated_hours {} exceeds {MAX_JOB_HOURS}",
                    job.id, job.estimated_hours
                ),
            ));
        }
    }

    for job in jobs {
        for dep in &job.dependencies {
            if dep == &job.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Job '{}' depends on itself", job.id),
                ));
            } else if !job_ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDependency,
                    format!("Job '{}' depends on unknown job '{}'", job.id, dep),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(jobs) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates station snapshots for bottleneck analysis.
///
/// Checks duplicate station IDs, negative throughput/wait/defect values,
/// rates outside 0-100 and more active operators than rostered.
pub fn validate_station_metrics(metrics: &[StationMetrics]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for m in metrics {
        if !ids.insert(m.station_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate station ID: {}", m.station_id),
            ));
        }
        for (field, value) in [
            ("current_throughput", m.current_throughput),
            ("expected_throughput", m.expected_throughput),
            ("avg_wait_time_minutes", m.avg_wait_time_minutes),
        ] {
            if value.is_nan() || value < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!("Station '{}' has negative {field}", m.station_id),
                ));
            }
        }
        check_percent(&mut errors, &m.station_id, "utilization_rate", m.utilization_rate);
        check_percent(&mut errors, &m.station_id, "defect_rate", m.defect_rate);
        if m.active_operators > m.operator_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::OperatorMismatch,
                format!(
                    "Station '{}' has {} active operators but only {} rostered",
                    m.station_id, m.active_operators, m.operator_count
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_percent(errors: &mut Vec<ValidationError>, id: &str, field: &str, value: f64) {
    if !(0.0..=100.0).contains(&value) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("'{id}' {field} {value} is outside 0-100"),
        ));
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// # Algorithm
/// Three-color DFS: a job is white (unseen), gray (on the current path) or
/// black (finished). Reaching a gray job again closes a cycle. Self edges are
/// reported separately and skipped here.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3
fn detect_cycles(jobs: &[Job]) -> Option<ValidationError> {
    // dependency → dependents
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for job in jobs {
        for dep in job.dependencies.iter().filter(|d| *d != &job.id) {
            dependents.entry(dep.as_str()).or_default().push(job.id.as_str());
        }
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    // Input order keeps the reported job deterministic.
    jobs.iter()
        .map(|j| j.id.as_str())
        .find(|&id| !marks.contains_key(id) && reaches_gray(id, &dependents, &mut marks))
        .map(|id| {
            ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving job '{id}'"),
            )
        })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Gray,
    Black,
}

fn reaches_gray<'a>(
    node: &'a str,
    dependents: &HashMap<&'a str, Vec<&'a str>>,
    marks: &mut HashMap<&'a str, Mark>,
) -> bool {
    marks.insert(node, Mark::Gray);
    for &next in dependents.get(node).map(Vec::as_slice).unwrap_or_default() {
        match marks.get(next) {
            Some(Mark::Gray) => return true,
            Some(Mark::Black) => {}
            None => {
                if reaches_gray(next, dependents, marks) {
                    return true;
                }
            }
        }
    }
    marks.insert(node, Mark::Black);
    false
}
