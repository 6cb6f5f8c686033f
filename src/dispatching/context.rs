//! Scheduling context for dispatching rule evaluation.

use chrono::{DateTime, Utc};

/// State passed to dispatching rules.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    /// Reference time for deadline urgency.
    pub now: DateTime<Utc>,
    /// Quantity at which volume-based rules saturate.
    pub volume_full_scale: f64,
}

impl SchedulingContext {
    /// Creates a context at the given time.
    pub fn at_time(now: DateTime<Utc>) -> Self {
        Self {
            now,
            volume_full_scale: 1000.0,
        }
    }

    /// Sets the volume saturation point.
    pub fn with_volume_full_scale(mut self, units: f64) -> Self {
        self.volume_full_scale = units;
        self
    }

    /// Fractional days from `now` until `t` (negative if past).
    pub fn days_until(&self, t: DateTime<Utc>) -> f64 {
        (t - self.now).num_milliseconds() as f64 / 86_400_000.0
    }
}
