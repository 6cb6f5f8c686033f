//! Dispatching rules and rule engine for job ordering.
//!
//! The scheduler places jobs greedily, so the order jobs are considered in
//! decides who gets the best slots. That order comes from a composable
//! [`RuleEngine`]. The default engine is the weighted production score
//! (priority class, deadline urgency, order volume); callers can substitute
//! any combination of rules.
//!
//! # Usage
//!
//! ```
//! use u_prodline::dispatching::{RuleEngine, rules};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Edd)
//!     .with_tie_breaker(rules::Spt);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::{EvaluationMode, RuleEngine, TieBreaker};

use crate::models::Job;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (scheduled first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates job priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules that naturally produce
/// "bigger is more important" scores return the negated value.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a job in the given context.
    fn evaluate(&self, job: &Job, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
