//! Production scheduler, KPI evaluation and what-if analysis.
//!
//! # Algorithm
//!
//! `SmartScheduler` is a greedy, priority-driven, best-candidate heuristic:
//! jobs are taken in rule-engine order and each is committed to the
//! (resource, slot) pair with the highest assignment score. It is not
//! optimal, but it is fast and explains every job it could not place.
//!
//! # KPI
//!
//! `ScheduleKpi` computes utilization over the planning horizon, on-time
//! rate, makespan and wasted capacity; these feed the optimization score
//! and the recommendations attached to every result.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod kpi;
mod scenario;
mod smart;

pub use kpi::{generate_recommendations, optimization_score, utilization_fitness, ScheduleKpi};
pub use scenario::{MetricDelta, Scenario, ScenarioComparison};
pub use smart::{ScheduleRequest, SmartScheduler};

pub(crate) use kpi::round2;
