//! Completion forecast
//!
//! When total demand outruns total capacity, the shortfall is converted into
//! extra business days at the window's average daily capacity.

use crate::envelope::EnvelopeTotals;
use bb_model::{calendar, HOURS_EPSILON};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    /// Capacity covers demand
    OnTrack,
    /// A few extra days needed
    Minor,
    /// A noticeable slip
    Warning,
    /// A large slip, or no capacity to absorb the shortfall
    Critical,
}

impl ForecastStatus {
    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Minor => "minor",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ForecastStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day-count thresholds separating the forecast tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastThresholds {
    /// Largest slip still classified as minor
    pub minor_max_days: u32,
    /// Largest slip still classified as warning
    pub warning_max_days: u32,
}

impl Default for ForecastThresholds {
    fn default() -> Self {
        Self {
            minor_max_days: 5,
            warning_max_days: 15,
        }
    }
}

impl ForecastThresholds {
    /// Classify a slip of `extra_days`
    #[must_use]
    pub fn classify(&self, extra_days: u32) -> ForecastStatus {
        match extra_days {
            0 => ForecastStatus::OnTrack,
            d if d <= self.minor_max_days => ForecastStatus::Minor,
            d if d <= self.warning_max_days => ForecastStatus::Warning,
            _ => ForecastStatus::Critical,
        }
    }
}

/// Completion forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Severity tier
    pub status: ForecastStatus,
    /// Business days needed beyond the window; `None` when there is no
    /// capacity to work the shortfall off
    pub extra_days: Option<u32>,
    /// Demand hours not covered by window capacity
    pub shortfall_hours: f64,
    /// Estimated completion date
    pub projected_completion: Option<NaiveDate>,
    /// Human-readable summary
    pub message: String,
}

impl Forecast {
    /// Forecast for the given totals
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_totals(
        totals: &EnvelopeTotals,
        window_end: Option<NaiveDate>,
        thresholds: &ForecastThresholds,
    ) -> Self {
        let shortfall = (totals.total_demand - totals.total_capacity).max(0.0);

        if shortfall <= HOURS_EPSILON {
            return Self {
                status: ForecastStatus::OnTrack,
                extra_days: Some(0),
                shortfall_hours: 0.0,
                projected_completion: window_end,
                message: "Capacity covers all planned work".to_string(),
            };
        }

        if totals.avg_daily_capacity <= HOURS_EPSILON {
            return Self {
                status: ForecastStatus::Critical,
                extra_days: None,
                shortfall_hours: shortfall,
                projected_completion: None,
                message: format!(
                    "No capacity available to cover {shortfall:.1}h of outstanding work"
                ),
            };
        }

        let extra = (shortfall / totals.avg_daily_capacity).ceil().min(f64::from(u32::MAX)) as u32;
        let projected = window_end.map(|end| calendar::add_business_days(end, extra));
        let status = thresholds.classify(extra);

        let mut message = format!(
            "{shortfall:.1}h over capacity: needs {extra} more business day{}",
            if extra == 1 { "" } else { "s" }
        );
        if let Some(date) = projected {
            message.push_str(&format!(", projected completion {}", calendar::format_date(date)));
        }

        Self {
            status,
            extra_days: Some(extra),
            shortfall_hours: shortfall,
            projected_completion: projected,
            message,
        }
    }
}
