//! Bottleneck detection for production lines.
//!
//! Station snapshots are scored on five symptoms (throughput loss, queue
//! pressure, wait time, utilization, defects). The weighted composite maps
//! to a severity band; rule-based root causes and templated actions explain
//! the score. Line-level analysis finds the primary constraint, and trend
//! analysis compares recent line efficiency with its history.
//!
//! # Composite Score
//!
//! | Symptom | Weight |
//! |---------|--------|
//! | Throughput loss | 0.35 |
//! | Queue pressure | 0.25 |
//! | Wait time | 0.20 |
//! | Utilization | 0.15 |
//! | Quality | 0.05 |
//!
//! Severity: ≥ 80 CRITICAL, ≥ 60 HIGH, ≥ 40 MEDIUM, ≥ 20 LOW, else NONE.
//!
//! # References
//!
//! - Goldratt & Cox (1984), "The Goal"
//! - Hopp & Spearman (2011), "Factory Physics", Ch. 7

mod detector;
mod indicators;
mod system;
mod trend;

pub use detector::{
    ActionPriority, BottleneckDetection, BottleneckDetector, BottleneckSeverity, Impact,
    ImplementationCost, Recommendation, RootCause, RootCauseKind,
};
pub use indicators::Indicators;
pub use system::{DelayPrediction, SystemAnalysis};
pub use trend::{HistoricalSnapshot, TrendAnalysis, TrendDirection, TrendPoint};
