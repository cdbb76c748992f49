//! Status report projection
//!
//! Reshapes an [`AnalysisResult`] into report sections. No new analysis
//! happens here.

use crate::engine::AnalysisResult;
use bb_compliance::{Severity, ViolationKind};
use bb_envelope::ForecastStatus;
use bb_model::calendar;
use bb_scope::AlertSeverity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which a plan can be green
pub const GREEN_MIN_SCORE: u8 = 85;

/// Score below which a plan is red
pub const RED_BELOW_SCORE: u8 = 60;

/// Overall traffic-light status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// On track
    Green,
    /// At risk
    Amber,
    /// Off track
    Red,
}

impl HealthStatus {
    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-line status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    /// Overall status
    pub health: HealthStatus,
    /// Feasibility score
    pub feasibility_score: u8,
    /// One-sentence summary
    pub message: String,
}

/// Dates and slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSection {
    /// First day of the window
    pub window_start: Option<NaiveDate>,
    /// Last day of the window
    pub window_end: Option<NaiveDate>,
    /// Business days in the window
    pub business_days: u32,
    /// Forecast tier
    pub forecast_status: ForecastStatus,
    /// Extra business days needed
    pub extra_days: Option<u32>,
    /// Projected completion date
    pub projected_completion: Option<NaiveDate>,
    /// Items flagged overdue
    pub overdue_items: usize,
}

/// Supply against demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySection {
    /// Capacity hours in the window
    pub total_capacity: f64,
    /// Demand hours owed
    pub total_demand: f64,
    /// `demand / capacity` as a percentage, when there is capacity
    pub utilization_percent: Option<f64>,
    /// Overloaded runs
    pub overloaded_periods: usize,
    /// Overloaded business days
    pub overloaded_days: u32,
    /// Largest overload in hours
    pub peak_overload_hours: f64,
    /// Members assigned more than their capacity
    pub overloaded_members: Vec<String>,
}

/// Work done so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSection {
    /// Items analyzed
    pub total_items: usize,
    /// Items done
    pub done_items: usize,
    /// Logged hours against original estimates, as a percentage
    pub completion_percent: f64,
    /// Logged hours
    pub time_spent_hours: f64,
    /// Scope change since the original plan, as a percentage
    pub scope_change_percent: f64,
}

/// One risk worth calling out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    /// How much it threatens delivery
    pub level: HealthStatus,
    /// Short title
    pub title: String,
    /// Detail line
    pub detail: String,
}

/// Report view of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Date the report describes
    pub as_of: NaiveDate,
    /// Top-line status
    pub headline: Headline,
    /// Dates and slip
    pub schedule: ScheduleSection,
    /// Supply against demand
    pub capacity: CapacitySection,
    /// Work done so far
    pub progress: ProgressSection,
    /// Risks, most severe first
    pub risks: Vec<Risk>,
}

impl StatusReport {
    /// Project `result` into report sections as of `today`
    #[must_use]
    pub fn from_analysis(result: &AnalysisResult, today: NaiveDate) -> Self {
        let envelope = &result.envelope;
        let totals = &envelope.totals;

        let schedule = ScheduleSection {
            window_start: envelope.window.map(|w| w.start),
            window_end: envelope.window.map(|w| w.end),
            business_days: totals.total_days,
            forecast_status: envelope.forecast.status,
            extra_days: envelope.forecast.extra_days,
            projected_completion: envelope.forecast.projected_completion,
            overdue_items: result.compliance.of_kind(ViolationKind::Overdue).len(),
        };

        let capacity = CapacitySection {
            total_capacity: totals.total_capacity,
            total_demand: totals.total_demand,
            utilization_percent: (totals.total_capacity > 0.0)
                .then(|| totals.total_demand / totals.total_capacity * 100.0),
            overloaded_periods: envelope.overloaded_periods.len(),
            overloaded_days: totals.overloaded_days,
            peak_overload_hours: envelope.peak_overload(),
            overloaded_members: result
                .team
                .iter()
                .filter(|load| load.overloaded)
                .filter_map(|load| load.assignee.clone())
                .collect(),
        };

        let progress = ProgressSection {
            total_items: result.summary.total_items,
            done_items: result.summary.done_items,
            completion_percent: if totals.total_original_estimate > 0.0 {
                (totals.total_time_spent / totals.total_original_estimate * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            },
            time_spent_hours: totals.total_time_spent,
            scope_change_percent: result.scope.summary.scope_change_percent,
        };

        let mut risks = risks(result);
        risks.sort_by(|a, b| b.level.cmp(&a.level));

        let health = health(result, &risks);
        let headline = Headline {
            health,
            feasibility_score: envelope.feasibility_score,
            message: headline_message(health, result),
        };

        Self {
            as_of: today,
            headline,
            schedule,
            capacity,
            progress,
            risks,
        }
    }
}

fn health(result: &AnalysisResult, risks: &[Risk]) -> HealthStatus {
    let score = result.envelope.feasibility_score;
    let forecast = result.envelope.forecast.status;

    if score < RED_BELOW_SCORE || forecast == ForecastStatus::Critical {
        return HealthStatus::Red;
    }
    if score < GREEN_MIN_SCORE || forecast > ForecastStatus::OnTrack || !risks.is_empty() {
        HealthStatus::Amber
    } else {
        HealthStatus::Green
    }
}

fn headline_message(health: HealthStatus, result: &AnalysisResult) -> String {
    let forecast = &result.envelope.forecast;
    match health {
        HealthStatus::Green => format!(
            "On track: feasibility {} with capacity covering planned work",
            result.envelope.feasibility_score
        ),
        HealthStatus::Amber | HealthStatus::Red => format!(
            "{}: feasibility {}. {}",
            if health == HealthStatus::Red { "Off track" } else { "At risk" },
            result.envelope.feasibility_score,
            forecast.message
        ),
    }
}

fn risks(result: &AnalysisResult) -> Vec<Risk> {
    let mut risks = Vec::new();

    if let Some(cycle) = result.dependencies.cycles.first() {
        risks.push(Risk {
            level: HealthStatus::Red,
            title: format!("{} circular dependencies", result.dependencies.cycles.len()),
            detail: format!("e.g. {}", cycle.join(" -> ")),
        });
    }

    let errors = result.compliance.summary.errors;
    if errors > 0 {
        risks.push(Risk {
            level: HealthStatus::Amber,
            title: format!("{errors} planning errors"),
            detail: result
                .compliance
                .violations
                .iter()
                .filter(|v| v.severity == Severity::Error)
                .take(3)
                .map(|v| format!("{}: {}", v.item_key, v.message))
                .collect::<Vec<_>>()
                .join("; "),
        });
    }

    if let Some(first) = result.envelope.overloaded_periods.first() {
        risks.push(Risk {
            level: HealthStatus::Amber,
            title: format!("{} overloaded periods", result.envelope.overloaded_periods.len()),
            detail: format!(
                "First from {} to {}, peak {:.1}h over capacity",
                calendar::format_date(first.start_date),
                calendar::format_date(first.end_date),
                result.envelope.peak_overload()
            ),
        });
    }

    let conflicts = result.dependencies.conflicts().count();
    if conflicts > 0 {
        risks.push(Risk {
            level: HealthStatus::Amber,
            title: format!("{conflicts} dependency date conflicts"),
            detail: "Blockers due after the work they block is scheduled to start".to_string(),
        });
    }

    for alert in &result.scope.alerts {
        risks.push(Risk {
            level: match alert.severity {
                AlertSeverity::Error => HealthStatus::Red,
                AlertSeverity::Warning => HealthStatus::Amber,
            },
            title: "Scope growth".to_string(),
            detail: alert.message.clone(),
        });
    }

    risks
}
