use bb_compliance::{ComplianceConfig, Severity, ViolationKind};
use bb_core::prelude::*;
use bb_core::ScenarioDefaults;
use bb_envelope::ForecastStatus;
use bb_test_utils::{chain, date, dated_item, sample_project};
use pretty_assertions::assert_eq;

fn analyze(items: &[WorkItem], config: EngineConfig) -> AnalysisResult {
    FeasibilityEngine::new(config)
        .analyze(items, &CapacityConfig::team_per_week(40.0), date("2024-01-22"))
        .unwrap()
}

#[test]
fn test_sample_project_analysis() {
    let result = analyze(&sample_project(), EngineConfig::default());
    let summary = &result.summary;

    assert_eq!(summary.as_of, date("2024-01-22"));
    assert_eq!(summary.total_items, 6);
    assert_eq!(summary.done_items, 1);
    assert_eq!(summary.circular_dependencies, 0);
    assert_eq!(summary.feasibility_score, result.envelope.feasibility_score);
    assert_eq!(summary.total_violations, result.compliance.violations.len());
    assert_eq!(summary.forecast_status, ForecastStatus::OnTrack);

    assert_eq!(result.dependencies.critical_path, vec!["WEB-1", "WEB-2", "WEB-3"]);
    assert_eq!(result.compliance.of_kind(ViolationKind::Overdue).len(), 3);
    assert_eq!(result.scope.summary.original_scope, 110.0);
}

#[test]
fn test_disabled_rules_are_skipped() {
    let config = EngineConfig::default()
        .with_compliance(ComplianceConfig::default().without_rule(ViolationKind::Overdue));
    let result = analyze(&sample_project(), config);
    assert!(result.compliance.of_kind(ViolationKind::Overdue).is_empty());
    assert!(!result.compliance.of_kind(ViolationKind::MissingDates).is_empty());
}

#[test]
fn test_overdue_threshold_from_toml() {
    let config = EngineConfig::from_toml_str("[compliance]\noverdue_error_after_days = 2").unwrap();
    let result = analyze(&sample_project(), config);
    // WEB-1, WEB-2 and WEB-4 are all more than two days late
    let overdue = result.compliance.of_kind(ViolationKind::Overdue);
    assert!(overdue.iter().all(|v| v.severity == Severity::Error));
    assert_eq!(overdue.len(), 3);
    // plus WEB-3 due after its epic
    assert_eq!(result.summary.error_violations, 4);
}

#[test]
fn test_cycle_is_reported_in_summary_and_report() {
    let mut items = chain(&["A", "B", "C", "D"]);
    items[0] = items[0].clone().blocked_by("D");

    let result = analyze(&items, EngineConfig::default());
    assert_eq!(result.summary.circular_dependencies, 1);

    let report = StatusReport::from_analysis(&result, date("2024-01-22"));
    assert_eq!(report.risks[0].level, HealthStatus::Red);
    assert_ne!(report.headline.health, HealthStatus::Green);
}

#[test]
fn test_status_report_for_sample_project() {
    let result = analyze(&sample_project(), EngineConfig::default());
    let report = StatusReport::from_analysis(&result, date("2024-01-22"));

    // overdue errors keep a fully covered plan out of green
    assert_eq!(report.headline.health, HealthStatus::Amber);
    assert_eq!(report.schedule.overdue_items, 3);
    assert_eq!(report.schedule.window_start, Some(date("2024-01-08")));
    assert_eq!(report.progress.total_items, 6);
    assert_eq!(report.progress.done_items, 1);
    assert!(report.risks.iter().any(|r| r.title.contains("planning errors")));
}

#[test]
fn test_what_if_on_overloaded_plan() {
    let items = vec![dated_item("A", "2024-01-08", "2024-01-19", 160.0)];
    let result = FeasibilityEngine::default()
        .analyze(&items, &CapacityConfig::team_per_week(40.0), date("2024-01-08"))
        .unwrap();
    assert!(result.envelope.feasibility_score < 100);

    let request = WhatIfRequest {
        add_developers: Some(1.0),
        ..WhatIfRequest::default()
    };
    let outcome = WhatIfOutcome::evaluate(&result.envelope, &request, &ScenarioDefaults::default());
    assert_eq!(outcome.baseline_score, result.envelope.feasibility_score);
    assert_eq!(outcome.scenarios.len(), 1);
    // ten business days at eight hours
    assert_eq!(outcome.combined.delta.capacity, 80.0);
    assert!(outcome.combined.outcome.feasibility_score > outcome.baseline_score);
}

#[test]
fn test_results_serialize_to_json() {
    let result = analyze(&sample_project(), EngineConfig::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["summary"]["total_items"], 6);
    assert_eq!(json["summary"]["forecast_status"], "on_track");
    assert!(json["envelope"]["days"].is_array());
}
