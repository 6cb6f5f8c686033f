//! What-if scenario analysis.
//!
//! A scenario edits copies of the job and resource lists, reruns the
//! scheduler and compares headline metrics against a baseline result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::kpi::round2;
use super::SmartScheduler;
use crate::models::{Job, Resource, ScheduleResult};

/// A single edit to the scheduling input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    /// Add a new job.
    AddJob { job: Job },
    /// Drop a job by ID.
    RemoveJob { job_id: String },
    /// Add a resource.
    AddResource { resource: Resource },
    /// Move a job's deadline.
    ChangeDeadline {
        job_id: String,
        new_deadline: DateTime<Utc>,
    },
}

/// One compared metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: String,
    pub before: f64,
    pub after: f64,
    /// `after - before`.
    pub change: f64,
}

impl MetricDelta {
    fn new(metric: &str, before: f64, after: f64) -> Self {
        Self {
            metric: metric.to_string(),
            before,
            after,
            change: round2(after - before),
        }
    }
}

/// Outcome of a what-if run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_name: String,
    /// What the scenario examines.
    pub impact: String,
    pub new_schedule: ScheduleResult,
    /// Scheduled Jobs, Optimization Score, Resource Utilization %,
    /// On-Time Rate %.
    pub comparison: Vec<MetricDelta>,
}

impl ScenarioComparison {
    /// Finds a compared metric by name.
    pub fn delta(&self, metric: &str) -> Option<&MetricDelta> {
        self.comparison.iter().find(|d| d.metric == metric)
    }
}

impl SmartScheduler {
    /// Applies `scenario` to copies of `jobs`/`resources`, reschedules from
    /// "now" and compares the result with `base`.
    ///
    /// Inputs and the baseline are left untouched. A scenario naming an
    /// unknown job reruns the unchanged input.
    pub fn analyze_scenario(
        &self,
        base: &ScheduleResult,
        scenario: &Scenario,
        jobs: &[Job],
        resources: &[Resource],
    ) -> ScenarioComparison {
        let mut jobs = jobs.to_vec();
        let mut resources = resources.to_vec();

        let (scenario_name, impact) = match scenario {
            Scenario::AddJob { job } => {
                jobs.push(job.clone());
                (
                    format!("Add Job: {}", job.garment_type),
                    "Analyzes impact of adding a new job".to_string(),
                )
            }
            Scenario::RemoveJob { job_id } => {
                let before = jobs.len();
                jobs.retain(|j| &j.id != job_id);
                if jobs.len() == before {
                    warn!(job_id = %job_id, "scenario removes unknown job");
                }
                (
                    format!("Remove Job: {job_id}"),
                    "Analyzes freed capacity after job removal".to_string(),
                )
            }
            Scenario::AddResource { resource } => {
                resources.push(resource.clone());
                (
                    format!("Add Resource: {}", resource.name),
                    "Analyzes capacity increase from new resource".to_string(),
                )
            }
            Scenario::ChangeDeadline {
                job_id,
                new_deadline,
            } => {
                match jobs.iter_mut().find(|j| &j.id == job_id) {
                    Some(job) => job.deadline = *new_deadline,
                    None => warn!(job_id = %job_id, "scenario moves deadline of unknown job"),
                }
                (
                    format!("Extend Deadline: {job_id}"),
                    "Analyzes scheduling flexibility from deadline extension".to_string(),
                )
            }
        };

        let new_schedule = self.optimize_schedule(&jobs, &resources, None);

        let comparison = vec![
            MetricDelta::new(
                "Scheduled Jobs",
                base.scheduled_jobs as f64,
                new_schedule.scheduled_jobs as f64,
            ),
            MetricDelta::new(
                "Optimization Score",
                base.optimization_score,
                new_schedule.optimization_score,
            ),
            MetricDelta::new(
                "Resource Utilization %",
                base.metrics.avg_resource_utilization,
                new_schedule.metrics.avg_resource_utilization,
            ),
            MetricDelta::new(
                "On-Time Rate %",
                base.metrics.on_time_completion_rate,
                new_schedule.metrics.on_time_completion_rate,
            ),
        ];

        info!(scenario = %scenario_name, "scenario analyzed");

        ScenarioComparison {
            scenario_name,
            impact,
            new_schedule,
            comparison,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobPriority;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn job(id: &str, deadline: DateTime<Utc>, hours: f64) -> Job {
        Job::new(id, deadline)
            .with_garment_type("Hoodie")
            .with_priority(JobPriority::High)
            .with_estimated_hours(hours)
            .with_skill("sewing")
    }

    fn line(id: &str) -> Resource {
        Resource::new(id)
            .with_name(format!("Line {id}"))
            .with_skill("sewing")
            .with_efficiency(80.0)
    }

    fn setup() -> (SmartScheduler, Vec<Job>, Vec<Resource>, ScheduleResult) {
        let scheduler = SmartScheduler::new().with_now(now());
        // Both jobs need the morning of the 2nd; one line fits only one.
        let jobs = vec![job("J1", at(2, 14), 5.0), job("J2", at(2, 14), 5.0)];
        let resources = vec![line("L1")];
        let base = scheduler.optimize_schedule(&jobs, &resources, None);
        (scheduler, jobs, resources, base)
    }

    #[test]
    fn test_add_resource_schedules_more() {
        let (scheduler, jobs, resources, base) = setup();
        assert_eq!(base.scheduled_jobs, 1);

        let scenario = Scenario::AddResource { resource: line("L2") };
        let cmp = scheduler.analyze_scenario(&base, &scenario, &jobs, &resources);

        assert_eq!(cmp.scenario_name, "Add Resource: Line L2");
        assert_eq!(cmp.new_schedule.scheduled_jobs, 2);
        let delta = cmp.delta("Scheduled Jobs").unwrap();
        assert!((delta.before - 1.0).abs() < 1e-10);
        assert!((delta.after - 2.0).abs() < 1e-10);
        assert!((delta.change - 1.0).abs() < 1e-10);
        assert_eq!(cmp.comparison.len(), 4);

        // Caller's lists untouched
        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn test_remove_job() {
        let (scheduler, jobs, resources, base) = setup();
        let scenario = Scenario::RemoveJob { job_id: "J1".into() };
        let cmp = scheduler.analyze_scenario(&base, &scenario, &jobs, &resources);

        assert_eq!(cmp.scenario_name, "Remove Job: J1");
        assert_eq!(cmp.new_schedule.total_jobs, 1);
        assert!(cmp.new_schedule.unscheduled_jobs.is_empty());
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_change_deadline() {
        let (scheduler, jobs, resources, base) = setup();
        let scenario = Scenario::ChangeDeadline {
            job_id: "J2".into(),
            new_deadline: at(6, 0),
        };
        let cmp = scheduler.analyze_scenario(&base, &scenario, &jobs, &resources);

        assert_eq!(cmp.scenario_name, "Extend Deadline: J2");
        assert_eq!(cmp.new_schedule.scheduled_jobs, 2);
        assert_eq!(jobs[1].deadline, at(2, 14));
        let j2 = cmp.new_schedule.task_for_job("J2").unwrap();
        assert_eq!(j2.job_details.deadline, at(6, 0));
    }

    #[test]
    fn test_add_job() {
        let (scheduler, jobs, resources, base) = setup();
        let scenario = Scenario::AddJob {
            job: job("J3", at(10, 0), 2.0).with_garment_type("Polo"),
        };
        let cmp = scheduler.analyze_scenario(&base, &scenario, &jobs, &resources);
        assert_eq!(cmp.scenario_name, "Add Job: Polo");
        assert_eq!(cmp.new_schedule.total_jobs, 3);
        assert!(cmp.new_schedule.task_for_job("J3").is_some());
    }

    #[test]
    fn test_unknown_job_is_noop_rerun() {
        let (scheduler, jobs, resources, base) = setup();
        let scenario = Scenario::ChangeDeadline {
            job_id: "NOPE".into(),
            new_deadline: at(9, 0),
        };
        let cmp = scheduler.analyze_scenario(&base, &scenario, &jobs, &resources);
        assert_eq!(cmp.new_schedule, base);
        assert!(cmp.comparison.iter().all(|d| d.change.abs() < 1e-10));
    }

    #[test]
    fn test_scenario_json_shape() {
        let json = r#"{"type":"REMOVE_JOB","job_id":"J7"}"#;
        let s: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(s, Scenario::RemoveJob { job_id: "J7".into() });
    }
}
