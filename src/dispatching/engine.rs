//! Rule engine for multi-criteria dispatching.
//!
//! Composes dispatching rules either sequentially (tie-breaker chain) or as a
//! weighted sum. Every rule is evaluated once per job and turned into a sort
//! key: scores are bucketed by `epsilon` and NaN sorts last. Sorting then
//! works on the cached keys and is stable, so jobs that tie on every rule
//! keep their input order.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::rules::{DeadlineUrgency, OrderVolume, PriorityClass};
use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::config::PriorityWeights;
use crate::models::Job;

/// How multiple rules are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Compare rule by rule; a later rule only decides ties.
    #[default]
    Sequential,
    /// Compare the weighted sum of all rule scores.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreaker {
    /// Keep input order.
    #[default]
    InputOrder,
    /// Lexicographic job ID.
    ById,
}

/// A composable rule engine for job prioritization.
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<(Arc<dyn DispatchingRule>, f64)>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty sequential engine. With no rules every job ties.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::InputOrder,
            epsilon: 1e-9,
        }
    }

    /// The weighted production ordering: priority class, deadline urgency
    /// and order volume.
    pub fn production(weights: &PriorityWeights) -> Self {
        Self::new()
            .with_mode(EvaluationMode::Weighted)
            .with_weighted_rule(PriorityClass, weights.priority_class)
            .with_weighted_rule(DeadlineUrgency, weights.deadline_urgency)
            .with_weighted_rule(OrderVolume, weights.order_volume)
    }

    /// Adds a rule with weight 1.0.
    pub fn with_rule<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a rule with an explicit weight.
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push((Arc::new(rule), weight));
        self
    }

    /// Adds a rule that only breaks ties in Sequential mode (weight 0.0).
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 0.0)
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Orders jobs, most important first.
    ///
    /// Returns indices into `jobs`.
    pub fn sort_indices(&self, jobs: &[Job], context: &SchedulingContext) -> Vec<usize> {
        let keys: Vec<Vec<f64>> = jobs.iter().map(|j| self.sort_keys(j, context)).collect();
        let mut indices: Vec<usize> = (0..jobs.len()).collect();

        indices.sort_by(|&a, &b| {
            keys[a]
                .iter()
                .zip(&keys[b])
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.final_tie(&jobs[a], &jobs[b]))
        });

        indices
    }

    /// Combined score on the "bigger is more important" scale.
    ///
    /// For the production engine this is the 0..=100 job priority score.
    pub fn priority_score(&self, job: &Job, context: &SchedulingContext) -> f64 {
        -self.weighted(&self.raw_scores(job, context))
    }

    /// Weighted score of each rule for one job.
    pub fn evaluate(&self, job: &Job, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|(rule, weight)| rule.evaluate(job, context) * weight)
            .collect()
    }

    fn raw_scores(&self, job: &Job, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|(rule, _)| rule.evaluate(job, context))
            .collect()
    }

    fn weighted(&self, row: &[RuleScore]) -> f64 {
        row.iter()
            .zip(&self.rules)
            .map(|(score, (_, weight))| score * weight)
            .sum()
    }

    /// Per-job keys: one per rule (Sequential) or the weighted sum (Weighted).
    fn sort_keys(&self, job: &Job, context: &SchedulingContext) -> Vec<f64> {
        let row = self.raw_scores(job, context);
        match self.mode {
            EvaluationMode::Sequential => row.into_iter().map(|s| self.bucket(s)).collect(),
            EvaluationMode::Weighted => vec![self.bucket(self.weighted(&row))],
        }
    }

    /// Scores in the same `epsilon` bucket compare equal; NaN sorts last.
    fn bucket(&self, score: RuleScore) -> f64 {
        if score.is_nan() {
            f64::INFINITY
        } else if score.is_infinite() {
            score
        } else {
            // + 0.0 folds -0.0 into 0.0 for total_cmp
            (score / self.epsilon).round() + 0.0
        }
    }

    fn final_tie(&self, a: &Job, b: &Job) -> Ordering {
        match self.tie_breaker {
            TieBreaker::InputOrder => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::production(&PriorityWeights::default())
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rules: Vec<String> = self
            .rules
            .iter()
            .map(|(rule, weight)| format!("{}(w={weight})", rule.name()))
            .collect();
        f.debug_struct("RuleEngine")
            .field("rules", &rules)
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
