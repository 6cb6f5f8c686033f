//! Resource model.
//!
//! Resources are the machines, operators and stations that run jobs. Each has
//! a set of skills, a daily capacity and a current load snapshot.

use serde::{Deserialize, Serialize};

/// Resource classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// Equipment (cutting table, embroidery machine, heat press).
    Machine,
    /// Human operator.
    Operator,
    /// Workstation or line.
    #[default]
    Station,
}

/// A resource that can be assigned jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Resource classification.
    #[serde(default)]
    pub kind: ResourceKind,
    /// Skills this resource can perform.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Working hours available per day.
    pub capacity_hours_per_day: f64,
    /// Current load (0-100 %).
    #[serde(default)]
    pub current_utilization: f64,
    /// Efficiency rating (0-100), higher is preferred.
    #[serde(default)]
    pub efficiency_rating: f64,
}

impl Resource {
    /// Creates an idle station with an 8-hour day.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: ResourceKind::Station,
            skills: Vec::new(),
            capacity_hours_per_day: 8.0,
            current_utilization: 0.0,
            efficiency_rating: 0.0,
        }
    }

    /// Creates a machine.
    pub fn machine(id: impl Into<String>) -> Self {
        Self::new(id).with_kind(ResourceKind::Machine)
    }

    /// Creates an operator.
    pub fn operator(id: impl Into<String>) -> Self {
        Self::new(id).with_kind(ResourceKind::Operator)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the kind.
    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Sets daily capacity in hours.
    pub fn with_capacity(mut self, hours_per_day: f64) -> Self {
        self.capacity_hours_per_day = hours_per_day;
        self
    }

    /// Sets the current utilization percentage.
    pub fn with_utilization(mut self, percent: f64) -> Self {
        self.current_utilization = percent;
        self
    }

    /// Sets the efficiency rating.
    pub fn with_efficiency(mut self, rating: f64) -> Self {
        self.efficiency_rating = rating;
        self
    }

    /// Whether this resource has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Whether this resource has every skill in `required`.
    pub fn has_all_skills<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|s| self.has_skill(s.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::machine("M1")
            .with_name("Juki Line 1")
            .with_skill("sewing")
            .with_skill("overlock")
            .with_capacity(10.0)
            .with_utilization(42.0)
            .with_efficiency(88.0);

        assert_eq!(r.id, "M1");
        assert_eq!(r.name, "Juki Line 1");
        assert_eq!(r.kind, ResourceKind::Machine);
        assert!((r.capacity_hours_per_day - 10.0).abs() < 1e-10);
        assert!((r.current_utilization - 42.0).abs() < 1e-10);
        assert!((r.efficiency_rating - 88.0).abs() < 1e-10);
    }

    #[test]
    fn test_skill_subset() {
        let r = Resource::operator("W1")
            .with_skill("sewing")
            .with_skill("overlock");

        assert!(r.has_skill("sewing"));
        assert!(!r.has_skill("printing"));
        assert!(r.has_all_skills(&["sewing", "overlock"]));
        assert!(!r.has_all_skills(&["sewing", "printing"]));
        assert!(r.has_all_skills::<&str>(&[]));
    }

    #[test]
    fn test_default_kind_is_station() {
        assert_eq!(Resource::new("S1").kind, ResourceKind::Station);
    }
}
