//! Plain-text rendering

use bb_core::{AnalysisResult, StatusReport, WhatIfOutcome};
use bb_envelope::PeriodBucket;
use bb_model::calendar::format_iso;

pub(crate) fn summary(result: &AnalysisResult) -> String {
    let envelope = &result.envelope;
    let totals = &envelope.totals;
    let summary = &result.summary;

    let mut lines = vec![format!(
        "Feasibility score: {}/100 (forecast: {})",
        summary.feasibility_score, summary.forecast_status
    )];
    match envelope.window {
        Some(window) => lines.push(format!(
            "Window: {} .. {} ({} business days)",
            format_iso(window.start),
            format_iso(window.end),
            totals.total_days
        )),
        None => lines.push("Window: none (no dated items)".to_string()),
    }
    lines.push(format!(
        "Capacity: {:.1}h  Demand: {:.1}h  Overloaded days: {}",
        totals.total_capacity, totals.total_demand, totals.overloaded_days
    ));
    lines.push(format!(
        "Items: {} ({} done, {} unscheduled)",
        summary.total_items, summary.done_items, totals.unscheduled_items
    ));
    lines.push(format!(
        "Violations: {} ({} errors)",
        summary.total_violations, summary.error_violations
    ));

    let deps = &result.dependencies;
    let mut dep_line = format!(
        "Dependencies: {} links, {} cycles",
        deps.edges.len(),
        deps.cycles.len()
    );
    if !deps.critical_path.is_empty() {
        dep_line.push_str(&format!(", critical path {}", deps.critical_path.join(" -> ")));
    }
    lines.push(dep_line);

    let scope = &result.scope.summary;
    lines.push(format!(
        "Scope: {:.1}h original, {:.1}h current ({:+.1}%)",
        scope.original_scope, scope.current_scope, scope.scope_change_percent
    ));
    lines.push(envelope.forecast.message.clone());
    lines.join("\n")
}

pub(crate) fn report(report: &StatusReport) -> String {
    let mut lines = vec![
        format!("Status as of {}: {}", format_iso(report.as_of), report.headline.health),
        report.headline.message.clone(),
        String::new(),
        "Schedule".to_string(),
    ];

    let schedule = &report.schedule;
    if let (Some(start), Some(end)) = (schedule.window_start, schedule.window_end) {
        lines.push(format!(
            "  {} .. {} ({} business days)",
            format_iso(start),
            format_iso(end),
            schedule.business_days
        ));
    }
    lines.push(format!("  Forecast: {}", schedule.forecast_status));
    if let Some(date) = schedule.projected_completion {
        lines.push(format!("  Projected completion: {}", format_iso(date)));
    }
    lines.push(format!("  Overdue items: {}", schedule.overdue_items));

    let capacity = &report.capacity;
    lines.push("Capacity".to_string());
    lines.push(format!(
        "  {:.1}h available, {:.1}h owed{}",
        capacity.total_capacity,
        capacity.total_demand,
        capacity
            .utilization_percent
            .map(|p| format!(" ({p:.0}% utilized)"))
            .unwrap_or_default()
    ));
    if !capacity.overloaded_members.is_empty() {
        lines.push(format!("  Overloaded: {}", capacity.overloaded_members.join(", ")));
    }

    let progress = &report.progress;
    lines.push("Progress".to_string());
    lines.push(format!(
        "  {}/{} items done, {:.0}% of original estimate logged",
        progress.done_items, progress.total_items, progress.completion_percent
    ));

    if !report.risks.is_empty() {
        lines.push("Risks".to_string());
        for risk in &report.risks {
            lines.push(format!("  [{}] {}: {}", risk.level, risk.title, risk.detail));
        }
    }
    lines.join("\n")
}

pub(crate) fn what_if(outcome: &WhatIfOutcome) -> String {
    let mut lines = vec![format!("Baseline score: {}", outcome.baseline_score)];
    for scenario in outcome.scenarios.scenarios() {
        lines.push(format!(
            "  {}: {} ({:+})",
            scenario.label, scenario.outcome.feasibility_score, scenario.outcome.score_change
        ));
    }
    let combined = &outcome.combined.outcome;
    lines.push(format!(
        "Combined: {} ({:+}), capacity {:.1}h, demand {:.1}h, {} business days",
        combined.feasibility_score,
        combined.score_change,
        combined.capacity,
        combined.demand,
        combined.total_days
    ));
    lines.join("\n")
}

pub(crate) fn periods(buckets: &[PeriodBucket]) -> String {
    let mut lines = vec![format!(
        "{:<12} {:>4} {:>10} {:>10} {:>12} {:>12}",
        "period", "days", "capacity", "demand", "cum_cap", "cum_demand"
    )];
    for bucket in buckets {
        lines.push(format!(
            "{:<12} {:>4} {:>10.1} {:>10.1} {:>12.1} {:>12.1}{}",
            format_iso(bucket.period_start),
            bucket.day_count,
            bucket.capacity,
            bucket.demand,
            bucket.cumulative_capacity,
            bucket.cumulative_demand,
            if bucket.overloaded { "  overloaded" } else { "" }
        ));
    }
    lines.join("\n")
}
