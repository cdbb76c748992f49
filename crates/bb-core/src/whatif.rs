//! What-if requests against a finished analysis

use crate::config::ScenarioDefaults;
use bb_envelope::{CombinedEffect, Envelope, Scenario, ScenarioSet, ScopeDirection};
use serde::{Deserialize, Serialize};

/// Hypothetical changes to preview together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatIfRequest {
    /// Developers to add (negative removes)
    pub add_developers: Option<f64>,
    /// Hours per developer per day, overriding the configured default
    pub hours_per_dev_per_day: Option<f64>,
    /// Scope hours to add
    pub add_scope_hours: Option<f64>,
    /// Scope hours to remove
    pub remove_scope_hours: Option<f64>,
    /// Weeks to move the deadline (negative pulls it in)
    pub extend_weeks: Option<i64>,
}

impl WhatIfRequest {
    /// Whether no change was requested
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add_developers.is_none()
            && self.add_scope_hours.is_none()
            && self.remove_scope_hours.is_none()
            && self.extend_weeks.is_none()
    }

    /// One enabled scenario per requested change
    #[must_use]
    pub fn scenarios(&self, envelope: &Envelope, defaults: &ScenarioDefaults) -> ScenarioSet {
        let hours_per_dev = self.hours_per_dev_per_day.unwrap_or(defaults.hours_per_dev_per_day);
        let mut set = ScenarioSet::new();

        if let Some(developers) = self.add_developers {
            set.push(if developers >= 0.0 {
                Scenario::add_capacity(envelope, developers, hours_per_dev)
            } else {
                Scenario::remove_capacity(envelope, -developers, hours_per_dev)
            });
        }
        if let Some(hours) = self.add_scope_hours {
            set.push(Scenario::change_scope(envelope, hours, ScopeDirection::Add));
        }
        if let Some(hours) = self.remove_scope_hours {
            set.push(Scenario::change_scope(envelope, hours, ScopeDirection::Remove));
        }
        if let Some(weeks) = self.extend_weeks {
            set.push(Scenario::change_deadline(envelope, weeks));
        }

        set
    }
}

/// Scenarios built from a request and their combined effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOutcome {
    /// Score before any change
    pub baseline_score: u8,
    /// Individual scenarios
    pub scenarios: ScenarioSet,
    /// Effect of all enabled scenarios together
    pub combined: CombinedEffect,
}

impl WhatIfOutcome {
    /// Evaluate `request` against `envelope`
    #[must_use]
    pub fn evaluate(
        envelope: &Envelope,
        request: &WhatIfRequest,
        defaults: &ScenarioDefaults,
    ) -> Self {
        let scenarios = request.scenarios(envelope, defaults);
        let combined = scenarios.combined(envelope);
        tracing::debug!(
            "What-if: {} scenarios, score {} -> {}",
            scenarios.len(),
            envelope.feasibility_score,
            combined.outcome.feasibility_score
        );
        Self {
            baseline_score: envelope.feasibility_score,
            scenarios,
            combined,
        }
    }
}
