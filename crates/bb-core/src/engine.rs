//! Feasibility engine
//!
//! Validates capacity, then runs each analysis independently over the same
//! snapshot. Nothing here reads the clock: `today` is always passed in.

use crate::config::EngineConfig;
use crate::error::EngineError;
use bb_compliance::{ComplianceEngine, ComplianceReport};
use bb_envelope::{team_health, Envelope, EnvelopeBuilder, ForecastStatus, MemberLoad};
use bb_graph::{DependencyAnalyzer, DependencyGraph};
use bb_model::{CapacityConfig, RawWorkItem, WorkItem};
use bb_scope::{ScopeAnalysis, ScopeAnalyzer};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// At-a-glance counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Date the analysis was run for
    pub as_of: NaiveDate,
    /// Items analyzed
    pub total_items: usize,
    /// Items with a done status
    pub done_items: usize,
    /// Envelope feasibility score
    pub feasibility_score: u8,
    /// All compliance violations
    pub total_violations: usize,
    /// Error-severity violations
    pub error_violations: usize,
    /// Distinct dependency cycles
    pub circular_dependencies: usize,
    /// Overloaded runs in the envelope
    pub overloaded_periods: usize,
    /// Forecast tier
    pub forecast_status: ForecastStatus,
}

/// Everything the engine computes for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Capacity-vs-demand envelope
    pub envelope: Envelope,
    /// Per-assignee load
    pub team: Vec<MemberLoad>,
    /// Compliance violations
    pub compliance: ComplianceReport,
    /// Blocking graph analysis
    pub dependencies: DependencyGraph,
    /// Scope history and trend
    pub scope: ScopeAnalysis,
    /// Derived counters
    pub summary: AnalysisSummary,
}

/// Runs every analysis over a snapshot of work items
#[derive(Debug, Clone, Default)]
pub struct FeasibilityEngine {
    config: EngineConfig,
}

impl FeasibilityEngine {
    /// Create an engine
    #[inline]
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze `items` against `capacity` as of `today`
    ///
    /// # Errors
    /// Returns [`EngineError::Capacity`] when the capacity configuration has
    /// the wrong shape. Bad per-item data never fails the analysis.
    pub fn analyze(
        &self,
        items: &[WorkItem],
        capacity: &CapacityConfig,
        today: NaiveDate,
    ) -> Result<AnalysisResult, EngineError> {
        let capacity = capacity.validate()?;

        let envelope = EnvelopeBuilder::new(&capacity, self.config.forecast).build(items, today);
        let team = team_health(items, &capacity, &envelope);
        let compliance =
            ComplianceEngine::new(self.config.compliance.clone()).evaluate(items, today);
        let dependencies = DependencyAnalyzer::analyze(items);
        let scope = ScopeAnalyzer::new(self.config.scope.clone()).analyze(items);

        let summary = AnalysisSummary {
            as_of: today,
            total_items: items.len(),
            done_items: items.iter().filter(|item| item.is_done()).count(),
            feasibility_score: envelope.feasibility_score,
            total_violations: compliance.summary.total,
            error_violations: compliance.summary.errors,
            circular_dependencies: dependencies.cycles.len(),
            overloaded_periods: envelope.overloaded_periods.len(),
            forecast_status: envelope.forecast.status,
        };

        tracing::info!(
            "Analyzed {} items: score {}, forecast {}, {} violations, {} cycles",
            summary.total_items,
            summary.feasibility_score,
            summary.forecast_status,
            summary.total_violations,
            summary.circular_dependencies
        );

        Ok(AnalysisResult {
            envelope,
            team,
            compliance,
            dependencies,
            scope,
            summary,
        })
    }

    /// Normalize host records, then [`analyze`](Self::analyze) them
    ///
    /// # Errors
    /// As [`analyze`](Self::analyze).
    pub fn analyze_raw(
        &self,
        records: Vec<RawWorkItem>,
        capacity: &CapacityConfig,
        today: NaiveDate,
    ) -> Result<AnalysisResult, EngineError> {
        let items: Vec<WorkItem> = records.into_iter().map(WorkItem::from).collect();
        self.analyze(&items, capacity, today)
    }
}
