use bb_compliance::{
    ComplianceConfig, ComplianceEngine, RuleSet, Severity, ViolationKind,
};
use bb_model::{StatusCategory, WorkItem};
use bb_test_utils::{date, dated_item, sample_project, undated_item};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_fifteen_undated_items() {
    let items: Vec<WorkItem> = (1..=15).map(|i| undated_item(&format!("U-{i}"), 4.0)).collect();
    let report = ComplianceEngine::default().evaluate(&items, date("2024-01-08"));

    let missing = report.of_kind(ViolationKind::MissingDates);
    assert_eq!(missing.len(), 15);
    assert!(missing.iter().all(|v| v.severity == Severity::Warning));
    assert_eq!(report.by_kind.len(), 1);
    assert_eq!(report.summary.warnings, 15);
    assert_eq!(report.items_with_violations, 15);
}

#[test]
fn test_overdue_ten_days_is_error() {
    let items = vec![dated_item("A", "2024-01-01", "2024-01-05", 8.0)];
    let report = ComplianceEngine::default().evaluate(&items, date("2024-01-15"));
    let overdue = report.of_kind(ViolationKind::Overdue);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].severity, Severity::Error);
    assert_eq!(overdue[0].item_key, "A");
}

#[test]
fn test_overdue_three_days_is_warning() {
    let items = vec![dated_item("A", "2024-01-01", "2024-01-12", 8.0)];
    let report = ComplianceEngine::default().evaluate(&items, date("2024-01-15"));
    let overdue = report.of_kind(ViolationKind::Overdue);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].severity, Severity::Warning);
}

#[test]
fn test_sample_project_report() {
    let report = ComplianceEngine::default().evaluate(&sample_project(), date("2024-01-22"));

    assert_eq!(report.items_checked, 6);
    // WEB-3 is due after its epic
    let child = report.of_kind(ViolationKind::ChildAfterParent);
    assert_eq!(child.len(), 1);
    assert_eq!(child[0].item_key, "WEB-3");
    // WEB-4 has dates but no estimate
    assert_eq!(report.of_kind(ViolationKind::MissingEstimate)[0].item_key, "WEB-4");
    // WEB-5 has no dates at all
    assert_eq!(report.of_kind(ViolationKind::MissingDates)[0].item_key, "WEB-5");
    // WEB-6 is done, so never overdue
    assert!(report.for_item("WEB-6").next().is_none());
    assert_eq!(
        report.summary.total,
        report.by_kind.values().map(Vec::len).sum::<usize>()
    );
}

#[test]
fn test_custom_rule_set() {
    let mut rules = RuleSet::empty();
    rules.register(bb_compliance::rules::OverdueRule);
    let engine = ComplianceEngine::new(ComplianceConfig::default()).with_rules(rules);

    let items = vec![WorkItem::new("A", "a")
        .with_dates(None, Some(date("2024-01-01")))
        .with_status(StatusCategory::InProgress)];
    let report = engine.evaluate(&items, date("2024-01-03"));
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::Overdue);
}

fn arbitrary_item() -> impl Strategy<Value = WorkItem> {
    (
        0usize..8,
        proptest::option::of(0i64..40),
        proptest::option::of(0i64..40),
        proptest::option::of(0.0f64..20.0),
        proptest::option::of(0.0f64..20.0),
        any::<bool>(),
        proptest::option::of(0usize..8),
    )
        .prop_map(|(key, start, due, original, remaining, done, blocks)| {
            let base = date("2024-01-01");
            let offset = |days: i64| base + chrono::Duration::days(days);
            let mut item = WorkItem::new(format!("K-{key}"), "generated")
                .with_dates(start.map(offset), due.map(offset))
                .with_estimates(original, remaining);
            if done {
                item = item.with_status(StatusCategory::Done);
            }
            if let Some(target) = blocks {
                item = item.blocking(format!("K-{target}"));
            }
            item
        })
}

proptest! {
    #[test]
    fn prop_rules_are_independent(items in proptest::collection::vec(arbitrary_item(), 0..20)) {
        let today = date("2024-01-20");
        let all = ComplianceEngine::default().evaluate(&items, today);

        for kind in ViolationKind::ALL {
            let mut only = RuleSet::standard();
            for other in ViolationKind::ALL.into_iter().filter(|k| *k != kind) {
                only.disable(other);
            }
            let single = ComplianceEngine::default().with_rules(only).evaluate(&items, today);
            prop_assert_eq!(all.of_kind(kind), single.violations.as_slice());
        }

        prop_assert_eq!(all.summary.total, all.violations.len());
        prop_assert!(all.items_with_violations <= items.len());
    }
}
