//! Rule set and evaluation engine

use crate::rules::{
    ChildAfterParentRule, ComplianceRule, DependencyConflictRule, DoneWithRemainingRule,
    MissingDatesRule, MissingEstimateRule, OverdueRule, RuleContext,
};
use crate::violation::{SeveritySummary, Violation, ViolationKind};
use crate::DEFAULT_OVERDUE_ERROR_AFTER_DAYS;
use bb_model::WorkItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Compliance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Overdue by more than this many calendar days is an error
    pub overdue_error_after_days: u32,
    /// Rules to skip
    pub disabled_rules: Vec<ViolationKind>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            overdue_error_after_days: DEFAULT_OVERDUE_ERROR_AFTER_DAYS,
            disabled_rules: Vec::new(),
        }
    }
}

impl ComplianceConfig {
    /// Set the overdue error threshold
    #[inline]
    #[must_use]
    pub fn with_overdue_error_after_days(mut self, days: u32) -> Self {
        self.overdue_error_after_days = days;
        self
    }

    /// Skip a rule
    #[inline]
    #[must_use]
    pub fn without_rule(mut self, kind: ViolationKind) -> Self {
        if !self.disabled_rules.contains(&kind) {
            self.disabled_rules.push(kind);
        }
        self
    }
}

/// Ordered collection of rules
pub struct RuleSet {
    rules: Vec<Box<dyn ComplianceRule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").field("kinds", &self.kinds()).finish()
    }
}

impl RuleSet {
    /// No rules
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// All six rules in evaluation order
    #[must_use]
    pub fn standard() -> Self {
        let mut set = Self::empty();
        set.register(MissingDatesRule);
        set.register(MissingEstimateRule);
        set.register(DoneWithRemainingRule);
        set.register(OverdueRule);
        set.register(ChildAfterParentRule);
        set.register(DependencyConflictRule);
        set
    }

    /// Append a rule; it runs after those already registered
    pub fn register<R: ComplianceRule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Drop every rule of `kind`
    pub fn disable(&mut self, kind: ViolationKind) {
        self.rules.retain(|rule| rule.kind() != kind);
    }

    /// Kinds of the registered rules, in order
    #[must_use]
    pub fn kinds(&self) -> Vec<ViolationKind> {
        self.rules.iter().map(|rule| rule.kind()).collect()
    }

    /// Number of rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Result of a compliance evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// All violations, by item input order then rule order
    pub violations: Vec<Violation>,
    /// Violations grouped by kind
    pub by_kind: BTreeMap<ViolationKind, Vec<Violation>>,
    /// Counts by severity
    pub summary: SeveritySummary,
    /// Items evaluated
    pub items_checked: usize,
    /// Items with at least one violation
    pub items_with_violations: usize,
}

impl ComplianceReport {
    /// Violations of one kind
    #[must_use]
    pub fn of_kind(&self, kind: ViolationKind) -> &[Violation] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Violations for one item
    pub fn for_item<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.item_key == key)
    }

    /// Whether nothing was flagged
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Runs a [`RuleSet`] over work items
#[derive(Debug)]
pub struct ComplianceEngine {
    config: ComplianceConfig,
    rules: RuleSet,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(ComplianceConfig::default())
    }
}

impl ComplianceEngine {
    /// Standard rules minus those the config disables
    #[must_use]
    pub fn new(config: ComplianceConfig) -> Self {
        let mut rules = RuleSet::standard();
        for kind in &config.disabled_rules {
            rules.disable(*kind);
        }
        Self { config, rules }
    }

    /// Use a custom rule set
    #[inline]
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Active rules
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate every rule against every item as of `today`
    #[must_use]
    pub fn evaluate(&self, items: &[WorkItem], today: NaiveDate) -> ComplianceReport {
        let ctx = RuleContext::new(items, today, self.config.overdue_error_after_days);
        let mut violations = Vec::new();
        let mut items_with_violations = 0;

        for item in items {
            let before = violations.len();
            for rule in &self.rules.rules {
                violations.extend(rule.evaluate(item, &ctx));
            }
            if violations.len() > before {
                items_with_violations += 1;
            }
        }

        let mut by_kind: BTreeMap<ViolationKind, Vec<Violation>> = BTreeMap::new();
        for violation in &violations {
            by_kind.entry(violation.kind).or_default().push(violation.clone());
        }
        let summary: SeveritySummary = violations.iter().collect();

        tracing::info!(
            "Compliance: {} violations ({} errors, {} warnings, {} infos) across {} items",
            summary.total,
            summary.errors,
            summary.warnings,
            summary.infos,
            items.len()
        );

        ComplianceReport {
            violations,
            by_kind,
            summary,
            items_checked: items.len(),
            items_with_violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::Severity;
    use bb_model::StatusCategory;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn standard_set_order() {
        assert_eq!(RuleSet::standard().kinds(), ViolationKind::ALL.to_vec());
    }

    #[test]
    fn empty_items_give_clean_report() {
        let report = ComplianceEngine::default().evaluate(&[], d("2024-01-08"));
        assert!(report.is_clean());
        assert!(report.by_kind.is_empty());
        assert_eq!(report.summary.total, 0);
    }

    #[test]
    fn done_items_are_never_overdue() {
        let items = vec![WorkItem::new("A", "a")
            .with_status(StatusCategory::Done)
            .with_dates(Some(d("2024-01-01")), Some(d("2024-01-05")))
            .with_estimates(Some(8.0), Some(4.0))];
        let report = ComplianceEngine::default().evaluate(&items, d("2024-01-15"));
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::DoneWithRemaining);
        assert_eq!(report.violations[0].severity, Severity::Error);
    }

    #[test]
    fn one_item_trips_several_rules() {
        let items = vec![
            WorkItem::new("A", "a")
                .with_dates(Some(d("2024-01-08")), Some(d("2024-01-12")))
                .blocking("B"),
            WorkItem::new("B", "b")
                .with_dates(Some(d("2024-01-10")), Some(d("2024-01-11")))
                .with_estimates(None, Some(0.0))
                .with_parent("A", None),
        ];
        let report = ComplianceEngine::default().evaluate(&items, d("2024-01-22"));
        let kinds: Vec<ViolationKind> = report.for_item("B").map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::MissingEstimate,
                ViolationKind::Overdue,
                ViolationKind::DependencyConflict,
            ]
        );
        assert_eq!(report.items_with_violations, 2);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = ComplianceConfig::default().without_rule(ViolationKind::MissingDates);
        let engine = ComplianceEngine::new(config);
        assert_eq!(engine.rules().len(), 5);
        let report = engine.evaluate(&[WorkItem::new("A", "a")], d("2024-01-08"));
        assert!(report.is_clean());
    }

    #[test]
    fn threshold_is_configurable() {
        let items = vec![WorkItem::new("A", "a")
            .with_dates(Some(d("2024-01-01")), Some(d("2024-01-12")))
            .with_estimates(Some(8.0), Some(8.0))];
        let strict =
            ComplianceEngine::new(ComplianceConfig::default().with_overdue_error_after_days(2));
        let report = strict.evaluate(&items, d("2024-01-15"));
        assert_eq!(report.of_kind(ViolationKind::Overdue)[0].severity, Severity::Error);
    }
}
