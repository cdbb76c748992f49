//! What-if scenarios
//!
//! A [`Scenario`] is a plain value: a signed [`ScenarioDelta`] computed once
//! from an envelope's totals, plus the outcome of applying it alone.
//! [`combine`] sums the enabled deltas and rescores the result. The source
//! [`Envelope`] is only ever borrowed, so preview and committed views can be
//! derived from the same envelope at the same time.

use crate::envelope::Envelope;
use crate::score::feasibility_score;
use bb_model::HOURS_EPSILON;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Business days per week used for deadline shifts
pub const BUSINESS_DAYS_PER_WEEK: i64 = 5;

/// Scenario type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Add or remove developers
    AddCapacity,
    /// Add or remove scope
    ChangeScope,
    /// Move the deadline
    ChangeDeadline,
}

impl ScenarioKind {
    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddCapacity => "add_capacity",
            Self::ChangeScope => "change_scope",
            Self::ChangeDeadline => "change_deadline",
        }
    }
}

/// Direction of a scope change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeDirection {
    /// More work
    Add,
    /// Less work
    Remove,
}

/// Signed change to envelope totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    /// Capacity hours
    pub capacity: f64,
    /// Demand hours
    pub demand: f64,
    /// Business days
    pub days: i64,
}

impl ScenarioDelta {
    /// No change
    pub const ZERO: Self = Self {
        capacity: 0.0,
        demand: 0.0,
        days: 0,
    };
}

impl Add for ScenarioDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            capacity: self.capacity + rhs.capacity,
            demand: self.demand + rhs.demand,
            days: self.days.saturating_add(rhs.days),
        }
    }
}

impl std::iter::Sum for ScenarioDelta {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Totals and score after applying a delta
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Resulting capacity hours
    pub capacity: f64,
    /// Resulting demand hours
    pub demand: f64,
    /// Resulting business days
    pub total_days: u32,
    /// Overloaded days assumed for scoring
    pub overloaded_days: u32,
    /// Resulting feasibility score
    pub feasibility_score: u8,
    /// Score difference from the envelope
    pub score_change: i16,
}

/// Apply `delta` to copies of the envelope totals and rescore
///
/// Results are clamped at zero. The envelope's overloaded days carry over
/// while capacity still falls short of demand and drop to zero once it
/// covers it.
#[must_use]
pub fn evaluate(envelope: &Envelope, delta: ScenarioDelta) -> ScenarioOutcome {
    let totals = &envelope.totals;
    let capacity = (totals.total_capacity + delta.capacity).max(0.0);
    let demand = (totals.total_demand + delta.demand).max(0.0);
    let total_days = u32::try_from(i64::from(totals.total_days).saturating_add(delta.days).max(0))
        .unwrap_or(u32::MAX);

    let overloaded_days = if capacity + HOURS_EPSILON >= demand {
        0
    } else {
        totals.overloaded_days.min(total_days)
    };

    let feasibility_score = feasibility_score(capacity, demand, overloaded_days, total_days);

    ScenarioOutcome {
        capacity,
        demand,
        total_days,
        overloaded_days,
        feasibility_score,
        score_change: i16::from(feasibility_score) - i16::from(envelope.feasibility_score),
    }
}

/// A user-toggleable hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Identifier, unique within a [`ScenarioSet`]
    pub id: String,
    /// Display label
    pub label: String,
    /// Scenario type
    pub kind: ScenarioKind,
    /// Change to the envelope totals
    pub delta: ScenarioDelta,
    /// Included in the combined effect
    pub enabled: bool,
    /// Outcome of this scenario applied alone
    pub outcome: ScenarioOutcome,
}

impl Scenario {
    fn new(
        envelope: &Envelope,
        kind: ScenarioKind,
        id: String,
        label: String,
        delta: ScenarioDelta,
    ) -> Self {
        Self {
            id,
            label,
            kind,
            delta,
            enabled: true,
            outcome: evaluate(envelope, delta),
        }
    }

    /// Add `developers` at `hours_per_dev_per_day` for the whole window
    #[must_use]
    pub fn add_capacity(envelope: &Envelope, developers: f64, hours_per_dev_per_day: f64) -> Self {
        let hours = developers * hours_per_dev_per_day * f64::from(envelope.totals.total_days);
        Self::new(
            envelope,
            ScenarioKind::AddCapacity,
            format!("add_capacity:{developers}x{hours_per_dev_per_day}"),
            format!("Add {developers} developer(s) at {hours_per_dev_per_day}h/day"),
            ScenarioDelta {
                capacity: hours,
                ..ScenarioDelta::ZERO
            },
        )
    }

    /// Remove `developers`; capacity never drops below zero
    #[must_use]
    pub fn remove_capacity(
        envelope: &Envelope,
        developers: f64,
        hours_per_dev_per_day: f64,
    ) -> Self {
        let hours = (developers * hours_per_dev_per_day * f64::from(envelope.totals.total_days))
            .min(envelope.totals.total_capacity);
        Self::new(
            envelope,
            ScenarioKind::AddCapacity,
            format!("remove_capacity:{developers}x{hours_per_dev_per_day}"),
            format!("Remove {developers} developer(s) at {hours_per_dev_per_day}h/day"),
            ScenarioDelta {
                capacity: -hours,
                ..ScenarioDelta::ZERO
            },
        )
    }

    /// Add or remove `hours` of scope; removal stops at zero demand
    #[must_use]
    pub fn change_scope(envelope: &Envelope, hours: f64, direction: ScopeDirection) -> Self {
        let hours = hours.abs();
        let (demand, id, label) = match direction {
            ScopeDirection::Add => (
                hours,
                format!("add_scope:{hours}"),
                format!("Add {hours}h of scope"),
            ),
            ScopeDirection::Remove => (
                -hours.min(envelope.totals.total_demand),
                format!("remove_scope:{hours}"),
                format!("Remove {hours}h of scope"),
            ),
        };
        Self::new(
            envelope,
            ScenarioKind::ChangeScope,
            id,
            label,
            ScenarioDelta {
                demand,
                ..ScenarioDelta::ZERO
            },
        )
    }

    /// Move the deadline by `weeks` (negative pulls it in)
    ///
    /// Each week is five business days at the envelope's average daily
    /// capacity; pulling in stops at the start of the window.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn change_deadline(envelope: &Envelope, weeks: i64) -> Self {
        let days = weeks
            .saturating_mul(BUSINESS_DAYS_PER_WEEK)
            .max(-i64::from(envelope.totals.total_days));
        let label = if weeks >= 0 {
            format!("Extend deadline by {weeks} week(s)")
        } else {
            format!("Pull deadline in by {} week(s)", weeks.unsigned_abs())
        };
        Self::new(
            envelope,
            ScenarioKind::ChangeDeadline,
            format!("change_deadline:{weeks}"),
            label,
            ScenarioDelta {
                capacity: envelope.totals.avg_daily_capacity * days as f64,
                demand: 0.0,
                days,
            },
        )
    }

    /// With a specific id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Start disabled
    #[inline]
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Summed effect of the enabled scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedEffect {
    /// Sum of enabled deltas
    pub delta: ScenarioDelta,
    /// Outcome of the summed delta
    pub outcome: ScenarioOutcome,
    /// Ids of the scenarios included
    pub included: Vec<String>,
}

impl CombinedEffect {
    /// Whether no scenario contributed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }
}

/// Sum the enabled scenarios and apply them to the envelope totals
#[must_use]
pub fn combine(envelope: &Envelope, scenarios: &[Scenario]) -> CombinedEffect {
    let enabled = scenarios.iter().filter(|s| s.enabled);
    let delta: ScenarioDelta = enabled.clone().map(|s| s.delta).sum();
    CombinedEffect {
        delta,
        outcome: evaluate(envelope, delta),
        included: enabled.map(|s| s.id.clone()).collect(),
    }
}

/// Ordered collection of scenarios keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    /// Create an empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario; an existing scenario with the same id is replaced
    pub fn push(&mut self, scenario: Scenario) {
        match self.scenarios.iter_mut().find(|s| s.id == scenario.id) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    /// Flip a scenario's enabled flag, returning the new state
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let scenario = self.scenarios.iter_mut().find(|s| s.id == id)?;
        scenario.enabled = !scenario.enabled;
        Some(scenario.enabled)
    }

    /// Set a scenario's enabled flag
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.scenarios.iter_mut().find(|s| s.id == id) {
            Some(scenario) => {
                scenario.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Remove a scenario
    pub fn remove(&mut self, id: &str) -> Option<Scenario> {
        let index = self.scenarios.iter().position(|s| s.id == id)?;
        Some(self.scenarios.remove(index))
    }

    /// Look up by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// All scenarios in insertion order
    #[inline]
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Combined effect of the enabled scenarios
    #[must_use]
    pub fn combined(&self, envelope: &Envelope) -> CombinedEffect {
        combine(envelope, &self.scenarios)
    }
}

/// Outcome of adding `developers` at `hours_per_dev` per day
#[must_use]
pub fn apply_add_capacity(
    envelope: &Envelope,
    developers: f64,
    hours_per_dev: f64,
) -> ScenarioOutcome {
    Scenario::add_capacity(envelope, developers, hours_per_dev).outcome
}

/// Outcome of removing `developers` at `hours_per_dev` per day
#[must_use]
pub fn apply_remove_capacity(
    envelope: &Envelope,
    developers: f64,
    hours_per_dev: f64,
) -> ScenarioOutcome {
    Scenario::remove_capacity(envelope, developers, hours_per_dev).outcome
}

/// Outcome of adding `hours` of scope
#[must_use]
pub fn apply_add_scope(envelope: &Envelope, hours: f64) -> ScenarioOutcome {
    Scenario::change_scope(envelope, hours, ScopeDirection::Add).outcome
}

/// Outcome of removing `hours` of scope
#[must_use]
pub fn apply_remove_scope(envelope: &Envelope, hours: f64) -> ScenarioOutcome {
    Scenario::change_scope(envelope, hours, ScopeDirection::Remove).outcome
}

/// Outcome of moving the deadline by `weeks`
#[must_use]
pub fn apply_deadline_change(envelope: &Envelope, weeks: i64) -> ScenarioOutcome {
    Scenario::change_deadline(envelope, weeks).outcome
}
