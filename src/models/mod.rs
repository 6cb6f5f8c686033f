//! Production domain models.
//!
//! Plain data records exchanged with the engines. Inputs (`Job`,
//! `Resource`, `StationMetrics`) are never mutated; outputs are built fresh
//! on every call.
//!
//! # Domain Mappings
//!
//! | u-prodline | Garment floor | Generic scheduling |
//! |------------|---------------|--------------------|
//! | Job | Cut/print/sew lot | Task |
//! | Resource | Machine/operator/line | Resource |
//! | StationMetrics | Station dashboard row | Work center KPI |
//! | ScheduleResult | Production plan | Schedule |

mod job;
mod resource;
mod schedule;
mod station;
pub mod timeline;

pub use job::{Job, JobPriority, JobStatus};
pub use resource::{Resource, ResourceKind};
pub use schedule::{
    Conflict, ConflictSeverity, ConflictType, ScheduleMetrics, ScheduleResult, ScheduledTask,
    Violation, ViolationType,
};
pub use station::{StationMetrics, StationType};
pub use timeline::{Interval, ResourceTimeline};
