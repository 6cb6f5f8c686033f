//! Busy intervals and per-resource timelines.
//!
//! # Time Model
//! Intervals are half-open `[start, end)` in UTC. Two intervals that only
//! touch (`a.end == b.start`) do not overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Interval start (inclusive).
    pub start: DateTime<Utc>,
    /// Interval end (exclusive).
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether two intervals overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Converts fractional hours to a millisecond-precision duration.
///
/// Negative and non-finite inputs map to zero.
pub fn hours_to_duration(hours: f64) -> Duration {
    if !hours.is_finite() || hours <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Converts a duration to fractional hours.
pub fn duration_to_hours(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 3_600_000.0
}

/// Committed busy intervals of one resource, kept sorted by start.
///
/// Lives only for the duration of one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct ResourceTimeline {
    busy: Vec<Interval>,
}

impl ResourceTimeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed intervals in start order.
    pub fn intervals(&self) -> &[Interval] {
        &self.busy
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }

    /// Commits an interval, keeping the list sorted by start.
    pub fn insert(&mut self, interval: Interval) {
        let pos = self.busy.partition_point(|b| b.start <= interval.start);
        self.busy.insert(pos, interval);
    }

    /// Committed intervals overlapping `window`, in start order.
    pub fn overlapping(&self, window: &Interval) -> Vec<Interval> {
        self.busy
            .iter()
            .filter(|b| b.overlaps(window))
            .copied()
            .collect()
    }

    /// Whether `interval` overlaps no committed interval.
    pub fn is_free(&self, interval: &Interval) -> bool {
        !self.busy.iter().any(|b| b.overlaps(interval))
    }
}
