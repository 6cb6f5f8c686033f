//! Skill- and deadline-aware greedy scheduler.
//!
//! # Algorithm
//!
//! 1. Order jobs with the rule engine (weighted priority/urgency/volume by
//!    default). Completed jobs are dropped.
//! 2. For each job, keep resources that have every required skill and are
//!    below the utilization cap.
//! 3. Check dependencies against the schedule built so far.
//! 4. On each eligible resource, scan forward day by day for the first slot
//!    that fits before the deadline without overlapping committed work.
//! 5. Score every (resource, slot) candidate and commit the best one.
//!
//! The result is a constructive heuristic: deterministic for a given input
//! order and clock, not globally optimal.
//!
//! # Complexity
//! O(n * r * d * k) where n=jobs, r=resources, d=days scanned, k=committed
//! intervals per resource.

use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use tracing::{debug, info, warn};

use super::kpi;
use crate::config::{DependencyPolicy, SchedulerConfig};
use crate::dispatching::{RuleEngine, SchedulingContext};
use crate::error::{EngineError, EngineResult};
use crate::models::timeline::hours_to_duration;
use crate::models::{
    Conflict, Interval, Job, Resource, ResourceTimeline, ScheduleResult, ScheduledTask,
};
use crate::validation;

/// Input container for scheduling.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Jobs to schedule.
    pub jobs: Vec<Job>,
    /// Available resources.
    pub resources: Vec<Resource>,
    /// Schedule start. `None` = the scheduler's "now".
    pub start_date: Option<DateTime<Utc>>,
}

impl ScheduleRequest {
    /// Creates a new schedule request.
    pub fn new(jobs: Vec<Job>, resources: Vec<Resource>) -> Self {
        Self {
            jobs,
            resources,
            start_date: None,
        }
    }

    /// Sets the schedule start.
    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }
}

/// Outcome of checking a job's dependencies against the partial schedule.
#[derive(Debug, Clone, PartialEq)]
enum DependencyCheck<'a> {
    /// All dependencies are scheduled. Holds the latest dependency end, if any.
    Met(Option<DateTime<Utc>>),
    /// Some dependencies are not (yet) scheduled.
    Missing(Vec<&'a str>),
}

/// Greedy production scheduler.
///
/// # Example
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use u_prodline::models::{Job, JobPriority, Resource};
/// use u_prodline::scheduler::SmartScheduler;
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
/// let jobs = vec![
///     Job::new("J1", now + Duration::days(1))
///         .with_priority(JobPriority::Urgent)
///         .with_estimated_hours(4.0)
///         .with_skill("sewing"),
/// ];
/// let resources = vec![Resource::new("L1").with_skill("sewing").with_capacity(8.0)];
///
/// let scheduler = SmartScheduler::new().with_now(now);
/// let result = scheduler.optimize_schedule(&jobs, &resources, None);
/// assert_eq!(result.scheduled_jobs, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SmartScheduler {
    config: SchedulerConfig,
    rule_engine: RuleEngine,
    now: Option<DateTime<Utc>>,
}

impl SmartScheduler {
    /// Creates a scheduler with production defaults.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Creates a scheduler from a configuration.
    ///
    /// Job ordering uses the weighted production rule engine built from
    /// `config.priority_weights`. Values [`SchedulerConfig::check`] rejects
    /// are replaced by their defaults with a warning.
    pub fn with_config(config: SchedulerConfig) -> Self {
        let config = config.sanitized();
        Self {
            rule_engine: RuleEngine::production(&config.priority_weights),
            config,
            now: None,
        }
    }

    /// Replaces the rule engine used to order jobs.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Pins "now" (deadline urgency, default start date).
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// The scheduler's configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current reference time: the pinned clock or the wall clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Schedules jobs on resources.
    ///
    /// Never fails: jobs that cannot be placed end up in `unscheduled_jobs`
    /// with a conflict explaining why.
    pub fn optimize_schedule(
        &self,
        jobs: &[Job],
        resources: &[Resource],
        start_date: Option<DateTime<Utc>>,
    ) -> ScheduleResult {
        let now = self.now();
        let start = start_date.unwrap_or(now);
        let context = SchedulingContext::at_time(now)
            .with_volume_full_scale(self.config.priority_weights.volume_full_scale);
        let order = self.rule_engine.sort_indices(jobs, &context);

        // Per-run state only; discarded when this call returns.
        let mut timelines: HashMap<&str, ResourceTimeline> = resources
            .iter()
            .map(|r| (r.id.as_str(), ResourceTimeline::new()))
            .collect();

        let mut schedule: Vec<ScheduledTask> = Vec::new();
        let mut unscheduled: Vec<Job> = Vec::new();
        let mut conflicts: Vec<Conflict> = Vec::new();
        let mut total_jobs = 0usize;

        for &idx in &order {
            let job = &jobs[idx];
            if job.is_completed() {
                continue;
            }
            total_jobs += 1;

            let eligible = self.find_suitable_resources(job, resources);
            if eligible.is_empty() {
                warn!(job_id = %job.id, "no eligible resource");
                conflicts.push(Conflict::no_resource(job));
                unscheduled.push(job.clone());
                continue;
            }

            let earliest = match check_dependencies(job, &schedule) {
                DependencyCheck::Met(latest_end) => latest_end.map_or(start, |end| end.max(start)),
                DependencyCheck::Missing(missing) => {
                    debug!(job_id = %job.id, missing = ?missing, "unmet dependencies");
                    conflicts.push(Conflict::dependency(job, &missing));
                    if self.config.dependency_policy == DependencyPolicy::Strict {
                        unscheduled.push(job.clone());
                        continue;
                    }
                    start
                }
            };

            match self.find_best_assignment(job, &eligible, &timelines, earliest) {
                Some(task) => {
                    debug!(
                        job_id = %job.id,
                        resource_id = %task.assigned_resource_id,
                        start = %task.start_time,
                        end = %task.end_time,
                        score = task.priority_score,
                        "job assigned"
                    );
                    if let Some(timeline) = timelines.get_mut(task.assigned_resource_id.as_str()) {
                        timeline.insert(task.interval());
                    }
                    schedule.push(task);
                }
                None => {
                    warn!(job_id = %job.id, "no slot before deadline");
                    conflicts.push(Conflict::capacity(job));
                    unscheduled.push(job.clone());
                }
            }
        }

        let metrics = kpi::calculate_metrics(
            &schedule,
            resources,
            start,
            self.config.planning_horizon_days,
        );
        let optimization_score =
            kpi::optimization_score(&metrics, unscheduled.len(), total_jobs);
        let recommendations =
            kpi::generate_recommendations(unscheduled.len(), &metrics, &conflicts);

        schedule.sort_by_key(|t| t.start_time);

        info!(
            total_jobs,
            scheduled = schedule.len(),
            unscheduled = unscheduled.len(),
            conflicts = conflicts.len(),
            optimization_score,
            "schedule optimized"
        );

        ScheduleResult {
            scheduled_jobs: schedule.len(),
            schedule,
            total_jobs,
            unscheduled_jobs: unscheduled,
            optimization_score,
            metrics,
            recommendations,
            conflicts,
        }
    }

    /// Validates the input first, then schedules.
    pub fn optimize_validated(
        &self,
        jobs: &[Job],
        resources: &[Resource],
        start_date: Option<DateTime<Utc>>,
    ) -> EngineResult<ScheduleResult> {
        validation::validate_input(jobs, resources).map_err(EngineError::Validation)?;
        Ok(self.optimize_schedule(jobs, resources, start_date))
    }

    /// Schedules from a request.
    pub fn schedule_request(&self, request: &ScheduleRequest) -> ScheduleResult {
        self.optimize_schedule(&request.jobs, &request.resources, request.start_date)
    }

    /// Resources with every required skill and utilization below the cap.
    fn find_suitable_resources<'r>(&self, job: &Job, resources: &'r [Resource]) -> Vec<&'r Resource> {
        resources
            .iter()
            .filter(|r| {
                r.has_all_skills(job.required_skills.as_slice())
                    && r.current_utilization < self.config.max_utilization_percent
            })
            .collect()
    }

    /// Best-scoring (resource, slot) candidate. Ties keep the earlier resource.
    fn find_best_assignment(
        &self,
        job: &Job,
        resources: &[&Resource],
        timelines: &HashMap<&str, ResourceTimeline>,
        earliest: DateTime<Utc>,
    ) -> Option<ScheduledTask> {
        let empty = ResourceTimeline::new();
        let mut best: Option<ScheduledTask> = None;

        for resource in resources {
            let timeline = timelines.get(resource.id.as_str()).unwrap_or(&empty);
            let Some(slot) = self.find_available_slot(
                timeline,
                job.estimated_hours,
                earliest,
                job.deadline,
                resource.capacity_hours_per_day,
            ) else {
                continue;
            };

            let score = self.score_assignment(job, resource, slot.end);
            if best.as_ref().map_or(true, |b| score > b.priority_score) {
                best = Some(ScheduledTask {
                    job_id: job.id.clone(),
                    job_details: job.clone(),
                    assigned_resource_id: resource.id.clone(),
                    assigned_resource_name: resource.name.clone(),
                    start_time: slot.start,
                    end_time: slot.end,
                    estimated_duration_hours: job.estimated_hours.max(0.0),
                    priority_score: score,
                });
            }
        }

        best
    }

    /// First slot of `hours` on `timeline` that starts at or after
    /// `earliest`, ends by `deadline` and overlaps nothing committed.
    ///
    /// Each day opens a window at the configured start hour lasting
    /// `daily_capacity` hours. Candidates are the window start, then the end
    /// of every committed interval in the window that has another committed
    /// interval after it. A slot whose end is not representable never fits.
    pub(crate) fn find_available_slot(
        &self,
        timeline: &ResourceTimeline,
        hours: f64,
        earliest: DateTime<Utc>,
        deadline: DateTime<Utc>,
        daily_capacity: f64,
    ) -> Option<Interval> {
        let duration = hours_to_duration(hours);
        if earliest.checked_add_signed(duration)? > deadline {
            return None;
        }

        let opening = NaiveTime::from_hms_opt(self.config.workday_start_hour, 0, 0)
            .unwrap_or(NaiveTime::MIN);
        let window_len = hours_to_duration(daily_capacity);
        let mut day = earliest.date_naive();

        loop {
            let day_start = Utc.from_utc_datetime(&day.and_time(opening));
            if day_start >= deadline {
                return None;
            }

            let window_end = day_start
                .checked_add_signed(window_len)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            let window = Interval::new(day_start, window_end);
            let busy = timeline.overlapping(&window);

            let candidates =
                std::iter::once(day_start).chain(busy.windows(2).map(|pair| pair[0].end));
            for candidate in candidates {
                let Some(end) = candidate.checked_add_signed(duration) else {
                    continue;
                };
                let slot = Interval::new(candidate, end);
                if candidate >= earliest && slot.end <= deadline && timeline.is_free(&slot) {
                    return Some(slot);
                }
            }

            day = day.succ_opt()?;
        }
    }

    /// Candidate score: efficiency, deadline margin and load balance.
    fn score_assignment(&self, job: &Job, resource: &Resource, end: DateTime<Utc>) -> f64 {
        let w = &self.config.assignment_weights;
        let mut score = resource.efficiency_rating * w.efficiency;

        let margin_days = (job.deadline - end).num_milliseconds() as f64 / 86_400_000.0;
        score += if margin_days > 7.0 {
            100.0 * w.deadline_margin
        } else if margin_days > 3.0 {
            75.0 * w.deadline_margin
        } else if margin_days > 1.0 {
            50.0 * w.deadline_margin
        } else if margin_days > 0.0 {
            25.0 * w.deadline_margin
        } else {
            -w.deadline_miss_penalty
        };

        let balance = if resource.current_utilization < w.balanced_utilization {
            100.0
        } else {
            100.0 - resource.current_utilization
        };
        score + balance * w.utilization_balance
    }
}

impl Default for SmartScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that every dependency is already in `schedule`.
fn check_dependencies<'a>(job: &'a Job, schedule: &[ScheduledTask]) -> DependencyCheck<'a> {
    if !job.has_dependencies() {
        return DependencyCheck::Met(None);
    }

    let mut missing = Vec::new();
    let mut latest_end: Option<DateTime<Utc>> = None;
    for dep in &job.dependencies {
        match schedule.iter().find(|t| &t.job_id == dep) {
            Some(task) => {
                latest_end = Some(latest_end.map_or(task.end_time, |e| e.max(task.end_time)));
            }
            None => missing.push(dep.as_str()),
        }
    }

    if missing.is_empty() {
        DependencyCheck::Met(latest_end)
    } else {
        DependencyCheck::Missing(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{ConflictSeverity, ConflictType, JobPriority, JobStatus};
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Monday 2026-03-02 00:00 UTC.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn scheduler() -> SmartScheduler {
        SmartScheduler::new().with_now(now())
    }

    fn sewing_job(id: &str, priority: JobPriority, deadline: DateTime<Utc>, hours: f64) -> Job {
        Job::new(id, deadline)
            .with_garment_type("T-Shirt")
            .with_quantity(100)
            .with_priority(priority)
            .with_estimated_hours(hours)
            .with_skill("sewing")
    }

    fn sewing_line(id: &str) -> Resource {
        Resource::new(id)
            .with_name(format!("Line {id}"))
            .with_skill("sewing")
            .with_capacity(8.0)
            .with_efficiency(80.0)
    }

    #[test]
    fn test_single_urgent_job() {
        let jobs = vec![sewing_job("J1", JobPriority::Urgent, now() + Duration::days(1), 4.0)];
        let resources = vec![sewing_line("L1").with_utilization(0.0)];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        assert_eq!(result.total_jobs, 1);
        assert_eq!(result.scheduled_jobs, 1);
        assert!(result.unscheduled_jobs.is_empty());

        let task = result.task_for_job("J1").unwrap();
        assert_eq!(task.start_time, at(2, 8));
        assert_eq!(task.end_time, at(2, 12));
        assert_eq!(task.assigned_resource_id, "L1");
        assert_eq!(task.assigned_resource_name, "Line L1");
        assert!((task.estimated_duration_hours - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_start_date_later_in_day_moves_to_next_morning() {
        let jobs = vec![sewing_job("J1", JobPriority::High, at(5, 0), 4.0)];
        let resources = vec![sewing_line("L1")];

        let result = scheduler().optimize_schedule(&jobs, &resources, Some(at(2, 10)));
        let task = result.task_for_job("J1").unwrap();
        assert_eq!(task.start_time, at(3, 8));
    }

    #[test]
    fn test_second_job_goes_to_free_resource() {
        let jobs = vec![
            sewing_job("J1", JobPriority::Urgent, at(3, 0), 4.0),
            sewing_job("J2", JobPriority::High, at(3, 0), 4.0),
        ];
        let resources = vec![sewing_line("L1"), sewing_line("L2")];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        assert_eq!(result.scheduled_jobs, 2);
        let j1 = result.task_for_job("J1").unwrap();
        let j2 = result.task_for_job("J2").unwrap();
        assert_eq!(j1.assigned_resource_id, "L1");
        assert_eq!(j2.assigned_resource_id, "L2");
        assert_eq!(j2.start_time, at(2, 8));
    }

    #[test]
    fn test_busy_day_pushes_to_next_day() {
        // One resource: the day with a committed job has no between-gap, so
        // the second job lands on the next morning.
        let jobs = vec![
            sewing_job("J1", JobPriority::Urgent, at(9, 0), 4.0),
            sewing_job("J2", JobPriority::Low, at(9, 0), 3.0),
        ];
        let resources = vec![sewing_line("L1")];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        let j2 = result.task_for_job("J2").unwrap();
        assert_eq!(j2.start_time, at(3, 8));
        assert_eq!(j2.end_time, at(3, 11));
        assert!(result.audit().is_empty());
    }

    #[test]
    fn test_gap_between_committed_intervals_is_used() {
        let s = scheduler();
        let mut timeline = ResourceTimeline::new();
        timeline.insert(Interval::new(at(2, 8), at(2, 10)));
        timeline.insert(Interval::new(at(2, 13), at(2, 16)));

        let slot = s
            .find_available_slot(&timeline, 3.0, at(2, 0), at(9, 0), 8.0)
            .unwrap();
        assert_eq!(slot.start, at(2, 10));
        assert_eq!(slot.end, at(2, 13));

        let too_long = s
            .find_available_slot(&timeline, 4.0, at(2, 0), at(9, 0), 8.0)
            .unwrap();
        assert_eq!(too_long.start, at(3, 8));
    }

    #[test]
    fn test_gap_before_first_interval() {
        let s = scheduler();
        let mut timeline = ResourceTimeline::new();
        timeline.insert(Interval::new(at(2, 12), at(2, 16)));

        let slot = s
            .find_available_slot(&timeline, 4.0, at(2, 0), at(9, 0), 8.0)
            .unwrap();
        assert_eq!(slot.start, at(2, 8));
    }

    #[test]
    fn test_slot_must_fit_before_deadline() {
        let s = scheduler();
        let timeline = ResourceTimeline::new();
        assert!(s
            .find_available_slot(&timeline, 4.0, at(2, 0), at(2, 11), 8.0)
            .is_none());
        let ok = s
            .find_available_slot(&timeline, 3.0, at(2, 0), at(2, 11), 8.0)
            .unwrap();
        assert_eq!(ok.end, at(2, 11));
    }

    #[test]
    fn test_no_resource_conflict() {
        let jobs = vec![
            sewing_job("J1", JobPriority::Medium, at(9, 0), 2.0).with_skill("embroidery"),
        ];
        let resources = vec![sewing_line("L1")];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        assert_eq!(result.scheduled_jobs, 0);
        assert!(result.is_unscheduled("J1"));
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].conflict_type, ConflictType::NoResource);
        assert_eq!(result.conflicts[0].severity, ConflictSeverity::High);
    }

    #[test]
    fn test_utilization_cap_is_strict() {
        let jobs = vec![sewing_job("J1", JobPriority::Medium, at(9, 0), 2.0)];
        let resources = vec![
            sewing_line("HOT").with_utilization(95.0),
            sewing_line("OK").with_utilization(50.0),
        ];
        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        assert_eq!(result.task_for_job("J1").unwrap().assigned_resource_id, "OK");

        let only_hot = vec![sewing_line("HOT").with_utilization(95.0)];
        let result = scheduler().optimize_schedule(&jobs, &only_hot, None);
        assert_eq!(result.conflicts[0].conflict_type, ConflictType::NoResource);
    }

    #[test]
    fn test_capacity_conflict_severity() {
        // 20 hours cannot fit before a deadline 10 hours away.
        let jobs = vec![
            sewing_job("U", JobPriority::Urgent, at(2, 10), 20.0),
            sewing_job("M", JobPriority::Medium, at(2, 10), 20.0),
        ];
        let resources = vec![sewing_line("L1")];
        let result = scheduler().optimize_schedule(&jobs, &resources, None);

        assert_eq!(result.scheduled_jobs, 0);
        assert_eq!(result.unscheduled_jobs.len(), 2);
        let u = result.conflicts_for_job("U");
        assert_eq!(u[0].conflict_type, ConflictType::Capacity);
        assert_eq!(u[0].severity, ConflictSeverity::High);
        let m = result.conflicts_for_job("M");
        assert_eq!(m[0].severity, ConflictSeverity::Medium);
    }

    #[test]
    fn test_completed_jobs_skipped() {
        let jobs = vec![
            sewing_job("DONE", JobPriority::Urgent, at(9, 0), 2.0).with_status(JobStatus::Completed),
            sewing_job("J1", JobPriority::Low, at(9, 0), 2.0),
        ];
        let result = scheduler().optimize_schedule(&jobs, &[sewing_line("L1")], None);
        assert_eq!(result.total_jobs, 1);
        assert_eq!(result.scheduled_jobs, 1);
        assert!(result.task_for_job("DONE").is_none());
        assert!(!result.is_unscheduled("DONE"));
    }

    #[test]
    fn test_dependency_met_starts_after_dependency() {
        let jobs = vec![
            sewing_job("CUT", JobPriority::Urgent, at(9, 0), 6.0),
            sewing_job("SEW", JobPriority::Low, at(9, 0), 2.0).with_dependency("CUT"),
        ];
        let resources = vec![sewing_line("L1"), sewing_line("L2")];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        let cut = result.task_for_job("CUT").unwrap();
        let sew = result.task_for_job("SEW").unwrap();
        assert!(sew.start_time >= cut.end_time);
        assert!(result.conflicts.is_empty());
        assert!(result.audit().is_empty());
    }

    #[test]
    fn test_unmet_dependency_is_advisory_by_default() {
        // SEW outranks CUT, so CUT is not yet scheduled when SEW is placed.
        let jobs = vec![
            sewing_job("CUT", JobPriority::Low, at(30, 0), 2.0),
            sewing_job("SEW", JobPriority::Urgent, at(3, 0), 2.0).with_dependency("CUT"),
        ];
        let resources = vec![sewing_line("L1")];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        assert_eq!(result.scheduled_jobs, 2);
        let dep = result.conflicts_for_job("SEW");
        assert_eq!(dep.len(), 1);
        assert_eq!(dep[0].conflict_type, ConflictType::Dependency);
        assert_eq!(dep[0].severity, ConflictSeverity::Medium);
    }

    #[test]
    fn test_unmet_dependency_strict_policy() {
        let jobs = vec![
            sewing_job("CUT", JobPriority::Low, at(30, 0), 2.0),
            sewing_job("SEW", JobPriority::Urgent, at(3, 0), 2.0).with_dependency("CUT"),
        ];
        let config = SchedulerConfig::default().with_dependency_policy(DependencyPolicy::Strict);
        let s = SmartScheduler::with_config(config).with_now(now());

        let result = s.optimize_schedule(&jobs, &[sewing_line("L1")], None);
        assert_eq!(result.scheduled_jobs, 1);
        assert!(result.is_unscheduled("SEW"));
        assert!(result.audit().is_empty());
    }

    #[test]
    fn test_prefers_efficient_resource() {
        let jobs = vec![sewing_job("J1", JobPriority::Medium, at(20, 0), 2.0)];
        let resources = vec![
            sewing_line("SLOW").with_efficiency(40.0),
            sewing_line("FAST").with_efficiency(95.0),
        ];
        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        assert_eq!(result.task_for_job("J1").unwrap().assigned_resource_id, "FAST");
    }

    #[test]
    fn test_prefers_less_loaded_resource() {
        let jobs = vec![sewing_job("J1", JobPriority::Medium, at(20, 0), 2.0)];
        let resources = vec![
            sewing_line("BUSY").with_utilization(90.0),
            sewing_line("IDLE").with_utilization(10.0),
        ];
        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        let task = result.task_for_job("J1").unwrap();
        assert_eq!(task.assigned_resource_id, "IDLE");
        // 80*0.3 + 100*0.4 (margin > 7 days) + 100*0.3
        assert!((task.priority_score - 94.0).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_sorted_by_start() {
        let jobs = vec![
            sewing_job("A", JobPriority::Low, at(20, 0), 4.0),
            sewing_job("B", JobPriority::Urgent, at(20, 0), 4.0),
            sewing_job("C", JobPriority::High, at(20, 0), 4.0),
        ];
        let result = scheduler().optimize_schedule(&jobs, &[sewing_line("L1")], None);
        let starts: Vec<_> = result.schedule.iter().map(|t| t.start_time).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(result.schedule[0].job_id, "B");
    }

    #[test]
    fn test_custom_rule_engine() {
        let jobs = vec![
            sewing_job("LONG", JobPriority::Urgent, at(20, 0), 6.0),
            sewing_job("SHORT", JobPriority::Low, at(20, 0), 1.0),
        ];
        let s = scheduler().with_rule_engine(RuleEngine::new().with_rule(rules::Spt));
        let result = s.optimize_schedule(&jobs, &[sewing_line("L1")], None);
        assert_eq!(result.schedule[0].job_id, "SHORT");
    }

    #[test]
    fn test_schedule_request() {
        let jobs = vec![sewing_job("J1", JobPriority::High, at(20, 0), 2.0)];
        let request = ScheduleRequest::new(jobs, vec![sewing_line("L1")]).with_start_date(at(4, 0));
        let result = scheduler().schedule_request(&request);
        assert_eq!(result.task_for_job("J1").unwrap().start_time, at(4, 8));
    }

    #[test]
    fn test_optimize_validated_rejects_duplicates() {
        let jobs = vec![
            sewing_job("J1", JobPriority::High, at(20, 0), 2.0),
            sewing_job("J1", JobPriority::Low, at(20, 0), 2.0),
        ];
        let err = scheduler()
            .optimize_validated(&jobs, &[sewing_line("L1")], None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let ok = scheduler().optimize_validated(&jobs[..1], &[sewing_line("L1")], None);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_empty_input() {
        let result = scheduler().optimize_schedule(&[], &[], None);
        assert_eq!(result.total_jobs, 0);
        assert_eq!(result.scheduled_jobs, 0);
        assert!(result.conflicts.is_empty());
        assert!((result.metrics.avg_resource_utilization - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_randomized_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let skills = ["sewing", "printing", "cutting"];

        for _ in 0..20 {
            let resources: Vec<Resource> = (0..rng.random_range(1..5))
                .map(|i| {
                    Resource::new(format!("R{i}"))
                        .with_skill(skills[rng.random_range(0..skills.len())])
                        .with_skill(skills[rng.random_range(0..skills.len())])
                        .with_capacity(rng.random_range(4..12) as f64)
                        .with_utilization(rng.random_range(0..100) as f64)
                        .with_efficiency(rng.random_range(30..100) as f64)
                })
                .collect();

            let jobs: Vec<Job> = (0..rng.random_range(1..25))
                .map(|i| {
                    let mut job = Job::new(
                        format!("J{i}"),
                        now() + Duration::hours(rng.random_range(6..24 * 20)),
                    )
                    .with_priority(match rng.random_range(0..4) {
                        0 => JobPriority::Low,
                        1 => JobPriority::Medium,
                        2 => JobPriority::High,
                        _ => JobPriority::Urgent,
                    })
                    .with_quantity(rng.random_range(10..2000))
                    .with_estimated_hours(rng.random_range(1..16) as f64)
                    .with_skill(skills[rng.random_range(0..skills.len())]);
                    if i > 0 && rng.random_bool(0.3) {
                        job = job.with_dependency(format!("J{}", rng.random_range(0..i)));
                    }
                    if rng.random_bool(0.1) {
                        job = job.with_status(JobStatus::Completed);
                    }
                    job
                })
                .collect();

            let result = scheduler().optimize_schedule(&jobs, &resources, None);

            // Completeness
            assert_eq!(
                result.scheduled_jobs + result.unscheduled_jobs.len(),
                result.total_jobs
            );
            // No double-booking, every task on time
            assert!(result
                .audit()
                .iter()
                .all(|v| v.violation_type == crate::models::ViolationType::PrecedenceViolation));
            for task in &result.schedule {
                assert!(task.end_time <= task.job_details.deadline);
                assert!(task.start_time >= now());
            }
            assert!((0.0..=100.0).contains(&result.optimization_score));

            // Strict: dependencies finish first, so nothing at all to report
            let strict = SmartScheduler::with_config(
                SchedulerConfig::default().with_dependency_policy(DependencyPolicy::Strict),
            )
            .with_now(now())
            .optimize_schedule(&jobs, &resources, None);
            assert_eq!(
                strict.scheduled_jobs + strict.unscheduled_jobs.len(),
                strict.total_jobs
            );
            assert!(strict.audit().is_empty());
        }
    }

    #[test]
    fn test_oversized_job_is_unscheduled() {
        let jobs = vec![
            sewing_job("HUGE", JobPriority::Urgent, at(20, 0), 1e15),
            sewing_job("J1", JobPriority::Low, at(20, 0), 2.0),
        ];
        let result = scheduler().optimize_schedule(&jobs, &[sewing_line("L1")], None);

        assert_eq!(result.scheduled_jobs, 1);
        assert!(result.is_unscheduled("HUGE"));
        let conflicts = result.conflicts_for_job("HUGE");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Capacity);
        assert_eq!(result.task_for_job("J1").unwrap().start_time, at(2, 8));
    }

    #[test]
    fn test_oversized_daily_capacity_still_schedules() {
        let jobs = vec![sewing_job("J1", JobPriority::High, at(20, 0), 2.0)];
        let resources = vec![sewing_line("L1").with_capacity(1e15)];

        let result = scheduler().optimize_schedule(&jobs, &resources, None);
        let task = result.task_for_job("J1").unwrap();
        assert_eq!(task.start_time, at(2, 8));
        assert_eq!(task.end_time, at(2, 10));
    }

    #[test]
    fn test_optimize_validated_rejects_oversized_values() {
        let jobs = vec![sewing_job("J1", JobPriority::High, at(20, 0), 1e15)];
        let resources = vec![sewing_line("L1").with_capacity(1e15)];
        let err = scheduler()
            .optimize_validated(&jobs, &resources, None)
            .unwrap_err();
        let EngineError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_out_of_range_start_hour_uses_default() {
        let config = SchedulerConfig::default().with_workday_start_hour(30);
        let s = SmartScheduler::with_config(config).with_now(now());
        assert_eq!(s.config().workday_start_hour, 8);

        let jobs = vec![sewing_job("J1", JobPriority::High, at(20, 0), 2.0)];
        let result = s.optimize_schedule(&jobs, &[sewing_line("L1")], None);
        assert_eq!(result.task_for_job("J1").unwrap().start_time, at(2, 8));
    }
}
