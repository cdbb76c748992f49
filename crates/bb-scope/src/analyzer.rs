//! Scope analyzer

use crate::timeline::{self, ScopePoint};
use crate::trend::{self, ScopeAlert, TrendWeek};
use crate::DEFAULT_GROWTH_ALERT_PERCENT;
use bb_model::{AnalysisWindow, WorkItem, HOURS_EPSILON};
use serde::{Deserialize, Serialize};

/// Scope analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Weekly growth, as a percentage of prior scope, that raises an alert
    pub growth_alert_percent: f64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            growth_alert_percent: DEFAULT_GROWTH_ALERT_PERCENT,
        }
    }
}

impl ScopeConfig {
    /// Set the growth alert threshold
    #[inline]
    #[must_use]
    pub fn with_growth_alert_percent(mut self, percent: f64) -> Self {
        self.growth_alert_percent = percent;
        self
    }
}

/// Headline scope figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeSummary {
    /// Scope hours of every item
    pub original_scope: f64,
    /// Completed plus remaining at the end of the window
    pub current_scope: f64,
    /// Completed at the end of the window
    pub completed_scope: f64,
    /// Remaining at the end of the window
    pub remaining_scope: f64,
    /// `(current - original) / original` as a percentage
    pub scope_change_percent: f64,
    /// Hours added across the trend
    pub total_added: f64,
    /// Hours removed across the trend
    pub total_removed: f64,
}

/// Result of a scope analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeAnalysis {
    /// One point per business day of the window
    pub timeline: Vec<ScopePoint>,
    /// One entry per week of the window
    pub trend: Vec<TrendWeek>,
    /// Weeks with excessive growth
    pub alerts: Vec<ScopeAlert>,
    /// Headline figures
    pub summary: ScopeSummary,
}

/// Analyzes scope history
#[derive(Debug, Clone, Default)]
pub struct ScopeAnalyzer {
    config: ScopeConfig,
}

impl ScopeAnalyzer {
    /// Create an analyzer
    #[inline]
    #[must_use]
    pub fn new(config: ScopeConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Timeline, trend, alerts and summary for `items`
    ///
    /// Without any dated item the timeline and trend are empty and the
    /// summary treats every item as present.
    #[must_use]
    pub fn analyze(&self, items: &[WorkItem]) -> ScopeAnalysis {
        let original_scope: f64 = items.iter().map(WorkItem::scope_hours).sum();

        let (timeline, trend) = match AnalysisWindow::from_items(items) {
            Some(window) => (
                timeline::build(items, &window.business_days(), original_scope),
                trend::weekly(items, window.start, window.end),
            ),
            None => (Vec::new(), Vec::new()),
        };
        let alerts = trend::alerts(&trend, self.config.growth_alert_percent);

        let (completed_scope, remaining_scope) = match timeline.last() {
            Some(point) => (point.completed, point.remaining),
            None => timeline::snapshot(items, None),
        };
        let current_scope = completed_scope + remaining_scope;

        let summary = ScopeSummary {
            original_scope,
            current_scope,
            completed_scope,
            remaining_scope,
            scope_change_percent: if original_scope > HOURS_EPSILON {
                (current_scope - original_scope) / original_scope * 100.0
            } else {
                0.0
            },
            total_added: trend.iter().map(|w| w.added).sum(),
            total_removed: trend.iter().map(|w| w.removed).sum(),
        };

        if !alerts.is_empty() {
            tracing::info!("Scope: {} growth alerts over {} weeks", alerts.len(), trend.len());
        }
        tracing::debug!(
            "Scope: original {:.1}h, current {:.1}h ({:+.1}%)",
            summary.original_scope,
            summary.current_scope,
            summary.scope_change_percent
        );

        ScopeAnalysis {
            timeline,
            trend,
            alerts,
            summary,
        }
    }
}
