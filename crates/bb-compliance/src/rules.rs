//! Compliance rules
//!
//! Each rule looks at one item at a time. Cross-item lookups (parents,
//! blockers) go through the shared [`RuleContext`], built once per
//! evaluation.

use crate::violation::{Severity, Violation, ViolationKind};
use bb_model::{calendar, WorkItem, HOURS_EPSILON};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

/// A single planning-data check
pub trait ComplianceRule: Send + Sync + Debug {
    /// Kind of violation this rule produces
    fn kind(&self) -> ViolationKind;

    /// Violations for `item`; empty when it passes
    fn evaluate(&self, item: &WorkItem, ctx: &RuleContext<'_>) -> Vec<Violation>;
}

/// Inputs shared by all rules during one evaluation
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    today: NaiveDate,
    overdue_error_after_days: u32,
    by_key: HashMap<&'a str, &'a WorkItem>,
    blockers: HashMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> RuleContext<'a> {
    /// Index `items` for lookups as of `today`
    ///
    /// Blockers are collected from both link directions. When keys repeat,
    /// the first item wins.
    #[must_use]
    pub fn new(items: &'a [WorkItem], today: NaiveDate, overdue_error_after_days: u32) -> Self {
        let mut by_key: HashMap<&'a str, &'a WorkItem> = HashMap::with_capacity(items.len());
        for item in items {
            by_key.entry(item.key.as_str()).or_insert(item);
        }

        let mut blockers: HashMap<&'a str, BTreeSet<&'a str>> = HashMap::new();
        for item in items {
            for blocked in &item.blocks {
                blockers.entry(blocked.as_str()).or_default().insert(item.key.as_str());
            }
            for blocker in &item.blocked_by {
                blockers.entry(item.key.as_str()).or_default().insert(blocker.as_str());
            }
        }

        Self {
            today,
            overdue_error_after_days,
            by_key,
            blockers,
        }
    }

    /// Evaluation date
    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Overdue days tolerated as a warning
    #[inline]
    #[must_use]
    pub fn overdue_error_after_days(&self) -> u32 {
        self.overdue_error_after_days
    }

    /// Item by key
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&'a WorkItem> {
        self.by_key.get(key).copied()
    }

    /// In-set items blocking `key`, in key order
    pub fn blockers_of<'s>(&'s self, key: &'s str) -> impl Iterator<Item = &'a WorkItem> + 's {
        self.blockers
            .get(key)
            .into_iter()
            .flatten()
            .filter(move |blocker| **blocker != key)
            .filter_map(|blocker| self.by_key.get(blocker).copied())
    }
}

/// Start and/or due date absent
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingDatesRule;

impl ComplianceRule for MissingDatesRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::MissingDates
    }

    fn evaluate(&self, item: &WorkItem, _ctx: &RuleContext<'_>) -> Vec<Violation> {
        let (severity, message) = match (item.start_date, item.due_date) {
            (Some(_), Some(_)) => return Vec::new(),
            (None, None) => (Severity::Warning, "Missing start and due dates"),
            (Some(_), None) => (Severity::Warning, "Missing due date"),
            (None, Some(_)) => (Severity::Info, "Missing start date"),
        };
        vec![Violation::new(self.kind(), severity, item, message)]
    }
}

/// Dated item with no positive estimate
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingEstimateRule;

impl ComplianceRule for MissingEstimateRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::MissingEstimate
    }

    fn evaluate(&self, item: &WorkItem, _ctx: &RuleContext<'_>) -> Vec<Violation> {
        if item.start_date.is_none() || item.due_date.is_none() {
            return Vec::new();
        }
        let positive = |hours: Option<f64>| hours.is_some_and(|h| h > HOURS_EPSILON);
        if positive(item.original_estimate) || positive(item.remaining_estimate) {
            return Vec::new();
        }
        vec![Violation::new(
            self.kind(),
            Severity::Warning,
            item,
            "Scheduled but has no time estimate",
        )]
    }
}

/// Done item with remaining estimate above zero
#[derive(Debug, Clone, Copy, Default)]
pub struct DoneWithRemainingRule;

impl ComplianceRule for DoneWithRemainingRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::DoneWithRemaining
    }

    fn evaluate(&self, item: &WorkItem, _ctx: &RuleContext<'_>) -> Vec<Violation> {
        match item.remaining_estimate {
            Some(remaining) if item.is_done() && remaining > HOURS_EPSILON => vec![Violation::new(
                self.kind(),
                Severity::Error,
                item,
                format!("Marked done with {remaining:.1}h remaining"),
            )],
            _ => Vec::new(),
        }
    }
}

/// Due before today and not done
#[derive(Debug, Clone, Copy, Default)]
pub struct OverdueRule;

impl ComplianceRule for OverdueRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Overdue
    }

    fn evaluate(&self, item: &WorkItem, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(due) = item.due_date else {
            return Vec::new();
        };
        if item.is_done() || due >= ctx.today() {
            return Vec::new();
        }

        let days = calendar::days_between(due, ctx.today());
        let severity = if days <= i64::from(ctx.overdue_error_after_days()) {
            Severity::Warning
        } else {
            Severity::Error
        };
        vec![Violation::new(
            self.kind(),
            severity,
            item,
            format!(
                "Overdue by {days} day{} (due {})",
                if days == 1 { "" } else { "s" },
                calendar::format_date(due)
            ),
        )]
    }
}

/// Due after the parent's due date
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildAfterParentRule;

impl ComplianceRule for ChildAfterParentRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::ChildAfterParent
    }

    fn evaluate(&self, item: &WorkItem, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let (Some(due), Some(parent)) = (item.due_date, item.parent.as_ref()) else {
            return Vec::new();
        };
        let parent_due = ctx
            .item(&parent.key)
            .and_then(|p| p.due_date)
            .or(parent.due_date);

        match parent_due {
            Some(parent_due) if due > parent_due => vec![Violation::new(
                self.kind(),
                Severity::Error,
                item,
                format!(
                    "Due {} after parent {} (due {})",
                    calendar::format_date(due),
                    parent.key,
                    calendar::format_date(parent_due)
                ),
            )],
            _ => Vec::new(),
        }
    }
}

/// Blocker due after this item starts; one violation per blocker
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyConflictRule;

impl ComplianceRule for DependencyConflictRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::DependencyConflict
    }

    fn evaluate(&self, item: &WorkItem, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(start) = item.start_date else {
            return Vec::new();
        };

        ctx.blockers_of(&item.key)
            .filter_map(|blocker| {
                let blocker_due = blocker.due_date.filter(|due| *due > start)?;
                Some(Violation::new(
                    self.kind(),
                    Severity::Error,
                    item,
                    format!(
                        "Blocked by {} due {}, after this starts {}",
                        blocker.key,
                        calendar::format_date(blocker_due),
                        calendar::format_date(start)
                    ),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_model::StatusCategory;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dated(key: &str, start: &str, due: &str) -> WorkItem {
        WorkItem::new(key, key)
            .with_dates(Some(d(start)), Some(d(due)))
            .with_estimates(Some(8.0), Some(8.0))
    }

    fn run(rule: &dyn ComplianceRule, items: &[WorkItem], today: &str) -> Vec<Vec<Violation>> {
        let ctx = RuleContext::new(items, d(today), 7);
        items.iter().map(|item| rule.evaluate(item, &ctx)).collect()
    }

    #[test]
    fn missing_dates_severity() {
        let items = vec![
            WorkItem::new("A", "a"),
            WorkItem::new("B", "b").with_dates(Some(d("2024-01-08")), None),
            WorkItem::new("C", "c").with_dates(None, Some(d("2024-01-08"))),
            dated("D", "2024-01-08", "2024-01-09"),
        ];
        let results = run(&MissingDatesRule, &items, "2024-01-08");
        assert_eq!(results[0][0].severity, Severity::Warning);
        assert_eq!(results[1][0].severity, Severity::Warning);
        assert_eq!(results[2][0].severity, Severity::Info);
        assert!(results[3].is_empty());
    }

    #[test]
    fn missing_estimate_needs_both_dates() {
        let items = vec![
            WorkItem::new("A", "a").with_dates(Some(d("2024-01-08")), Some(d("2024-01-09"))),
            WorkItem::new("B", "b")
                .with_dates(Some(d("2024-01-08")), Some(d("2024-01-09")))
                .with_estimates(Some(0.0), None),
            WorkItem::new("C", "c").with_dates(None, Some(d("2024-01-09"))),
            WorkItem::new("D", "d")
                .with_dates(Some(d("2024-01-08")), Some(d("2024-01-09")))
                .with_estimates(None, Some(2.0)),
        ];
        let results = run(&MissingEstimateRule, &items, "2024-01-08");
        assert_eq!(results[0].len(), 1);
        assert_eq!(results[1].len(), 1);
        assert!(results[2].is_empty());
        assert!(results[3].is_empty());
    }

    #[test]
    fn done_with_remaining_is_error() {
        let items = vec![
            dated("A", "2024-01-08", "2024-01-09").with_status(StatusCategory::Done),
            dated("B", "2024-01-08", "2024-01-09")
                .with_status(StatusCategory::Done)
                .with_estimates(Some(8.0), Some(0.0)),
            dated("C", "2024-01-08", "2024-01-09"),
        ];
        let results = run(&DoneWithRemainingRule, &items, "2024-01-08");
        assert_eq!(results[0][0].severity, Severity::Error);
        assert!(results[1].is_empty());
        assert!(results[2].is_empty());
    }

    #[test]
    fn overdue_threshold() {
        let items = vec![
            dated("A", "2024-01-01", "2024-01-05"),
            dated("B", "2024-01-01", "2024-01-12"),
            dated("C", "2024-01-01", "2024-01-08"),
            dated("D", "2024-01-01", "2024-01-15"),
            dated("E", "2024-01-01", "2024-01-05").with_status(StatusCategory::Done),
        ];
        let results = run(&OverdueRule, &items, "2024-01-15");
        assert_eq!(results[0][0].severity, Severity::Error);
        assert_eq!(results[1][0].severity, Severity::Warning);
        // Exactly at the threshold stays a warning
        assert_eq!(results[2][0].severity, Severity::Warning);
        assert!(results[3].is_empty());
        assert!(results[4].is_empty());
    }

    #[test]
    fn child_after_parent_prefers_in_set_parent() {
        let items = vec![
            dated("EPIC", "2024-01-01", "2024-01-10"),
            dated("A", "2024-01-01", "2024-01-12").with_parent("EPIC", Some(d("2024-02-01"))),
            dated("B", "2024-01-01", "2024-01-12").with_parent("OTHER", Some(d("2024-01-11"))),
            dated("C", "2024-01-01", "2024-01-12").with_parent("OTHER", None),
        ];
        let results = run(&ChildAfterParentRule, &items, "2024-01-01");
        assert!(results[0].is_empty());
        assert_eq!(results[1].len(), 1);
        assert_eq!(results[2].len(), 1);
        assert!(results[3].is_empty());
    }

    #[test]
    fn dependency_conflict_per_blocker() {
        let items = vec![
            dated("A", "2024-01-01", "2024-01-20").blocking("C"),
            dated("B", "2024-01-01", "2024-01-18"),
            dated("C", "2024-01-15", "2024-01-25").blocked_by("B").blocked_by("MISSING"),
            dated("D", "2024-01-01", "2024-01-05").blocking("C"),
        ];
        let results = run(&DependencyConflictRule, &items, "2024-01-01");
        assert_eq!(results[2].len(), 2);
        assert!(results[2][0].message.contains("A"));
        assert!(results[2][1].message.contains("B"));
        assert!(results[0].is_empty());
    }
}
