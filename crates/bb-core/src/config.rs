//! Engine configuration

use crate::error::EngineError;
use bb_compliance::ComplianceConfig;
use bb_envelope::ForecastThresholds;
use bb_scope::ScopeConfig;
use serde::{Deserialize, Serialize};

/// Defaults applied when building what-if scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioDefaults {
    /// Hours per developer per business day
    pub hours_per_dev_per_day: f64,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            hours_per_dev_per_day: 8.0,
        }
    }
}

/// Feasibility engine configuration
///
/// Every section is optional in TOML:
///
/// ```toml
/// [forecast]
/// minor_max_days = 5
/// warning_max_days = 15
///
/// [compliance]
/// overdue_error_after_days = 7
/// disabled_rules = ["missing_estimate"]
///
/// [scope]
/// growth_alert_percent = 10.0
///
/// [scenarios]
/// hours_per_dev_per_day = 8.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Forecast tier thresholds
    pub forecast: ForecastThresholds,
    /// Compliance rule settings
    pub compliance: ComplianceConfig,
    /// Scope alert settings
    pub scope: ScopeConfig,
    /// What-if defaults
    pub scenarios: ScenarioDefaults,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] when the text is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(text)?)
    }

    /// With forecast thresholds
    #[inline]
    #[must_use]
    pub fn with_forecast(mut self, forecast: ForecastThresholds) -> Self {
        self.forecast = forecast;
        self
    }

    /// With compliance settings
    #[inline]
    #[must_use]
    pub fn with_compliance(mut self, compliance: ComplianceConfig) -> Self {
        self.compliance = compliance;
        self
    }

    /// With scope settings
    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeConfig) -> Self {
        self.scope = scope;
        self
    }

    /// With scenario defaults
    #[inline]
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: ScenarioDefaults) -> Self {
        self.scenarios = scenarios;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_compliance::ViolationKind;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [compliance]
            overdue_error_after_days = 3
            disabled_rules = ["missing_estimate"]

            [scenarios]
            hours_per_dev_per_day = 6.5
            "#,
        )
        .unwrap();
        assert_eq!(config.compliance.overdue_error_after_days, 3);
        assert_eq!(config.compliance.disabled_rules, vec![ViolationKind::MissingEstimate]);
        assert_eq!(config.scenarios.hours_per_dev_per_day, 6.5);
        assert_eq!(config.forecast, ForecastThresholds::default());
        assert_eq!(config.scope.growth_alert_percent, 10.0);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("[forecast]\nminor_max_days = \"soon\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
