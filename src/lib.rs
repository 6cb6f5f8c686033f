//! Production-line scheduling and bottleneck analysis.
//!
//! Assigns garment production jobs to machines, operators and stations under
//! skill, deadline and capacity constraints, and diagnoses the stations that
//! hold the line back. Both engines are synchronous and pure: every result is
//! a function of the input records, the configuration and a reference time.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Resource`, `StationMetrics`,
//!   `ScheduleResult`, `Conflict`, resource timelines
//! - **`dispatching`**: Job ordering rules and the composable `RuleEngine`
//! - **`scheduler`**: `SmartScheduler` (greedy slot assignment), KPIs,
//!   what-if scenarios
//! - **`bottleneck`**: `BottleneckDetector` (station scoring, root causes,
//!   line analysis, efficiency trends)
//! - **`validation`**: Input integrity checks (duplicate IDs, dependency cycles, ranges)
//! - **`config`**: Tunable constants with production defaults, JSON loading
//! - **`error`**: Edge errors (validation, configuration)
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use u_prodline::bottleneck::BottleneckDetector;
//! use u_prodline::models::{Job, JobPriority, Resource, StationMetrics, StationType};
//! use u_prodline::scheduler::SmartScheduler;
//!
//! let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
//! let jobs = vec![
//!     Job::new("J1", now + Duration::days(3))
//!         .with_garment_type("Polo")
//!         .with_priority(JobPriority::High)
//!         .with_estimated_hours(6.0)
//!         .with_skill("sewing"),
//! ];
//! let lines = vec![Resource::new("L1").with_skill("sewing").with_efficiency(85.0)];
//!
//! let plan = SmartScheduler::new().with_now(now).optimize_schedule(&jobs, &lines, None);
//! assert_eq!(plan.scheduled_jobs, 1);
//!
//! let station = StationMetrics::new("S1", "Sewing A", StationType::Sewing).with_queue(40);
//! let report = BottleneckDetector::new().analyze_production_system(&[station]);
//! assert_eq!(report.detected_bottlenecks.len(), 1);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Hopp & Spearman (2011), "Factory Physics"

pub mod bottleneck;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{EngineError, EngineResult};
