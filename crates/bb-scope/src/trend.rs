//! Weekly scope trend and growth alerts

use bb_model::{calendar, WorkItem};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scope movement in one Monday-keyed week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendWeek {
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Scope hours of items starting this week
    pub added: f64,
    /// Completed hours of done items due this week
    pub removed: f64,
    /// `added - removed`
    pub net_change: f64,
    /// Running total of net change through this week
    pub total_scope: f64,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Growth above the threshold
    Warning,
    /// Growth above twice the threshold
    Error,
}

/// A week whose scope grew faster than the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeAlert {
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Severity
    pub severity: AlertSeverity,
    /// `net_change / prior_total` as a percentage
    pub growth_percent: f64,
    /// Human-readable explanation
    pub message: String,
}

pub(crate) fn weekly(items: &[WorkItem], first: NaiveDate, last: NaiveDate) -> Vec<TrendWeek> {
    let mut added: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut removed: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for item in items {
        if let Some(start) = item.start_date {
            *added.entry(calendar::week_start(start)).or_default() += item.scope_hours();
        }
        if let (true, Some(due)) = (item.is_done(), item.due_date) {
            *removed.entry(calendar::week_start(due)).or_default() += item.completed_hours();
        }
    }

    let mut weeks = Vec::new();
    let mut total_scope = 0.0;
    let mut week = calendar::week_start(first);
    let end = calendar::week_start(last);

    while week <= end {
        let added = added.get(&week).copied().unwrap_or(0.0);
        let removed = removed.get(&week).copied().unwrap_or(0.0);
        let net_change = added - removed;
        total_scope += net_change;
        weeks.push(TrendWeek {
            week_start: week,
            added,
            removed,
            net_change,
            total_scope,
        });

        match week.checked_add_days(Days::new(7)) {
            Some(next) => week = next,
            None => break,
        }
    }

    weeks
}

pub(crate) fn alerts(weeks: &[TrendWeek], threshold_percent: f64) -> Vec<ScopeAlert> {
    let mut prior_total = 0.0;
    let mut alerts = Vec::new();

    for week in weeks {
        if prior_total > 0.0 {
            let growth_percent = week.net_change / prior_total * 100.0;
            if growth_percent > threshold_percent {
                let severity = if growth_percent > threshold_percent * 2.0 {
                    AlertSeverity::Error
                } else {
                    AlertSeverity::Warning
                };
                alerts.push(ScopeAlert {
                    week_start: week.week_start,
                    severity,
                    growth_percent,
                    message: format!(
                        "Scope grew {growth_percent:.1}% in the week of {} ({:+.1}h)",
                        calendar::format_date(week.week_start),
                        week.net_change
                    ),
                });
            }
        }
        prior_total = week.total_scope;
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn week(start: &str, net: f64, total: f64) -> TrendWeek {
        TrendWeek {
            week_start: d(start),
            added: net.max(0.0),
            removed: (-net).max(0.0),
            net_change: net,
            total_scope: total,
        }
    }

    #[test]
    fn gap_weeks_are_filled() {
        let items = vec![
            WorkItem::new("A", "a")
                .with_dates(Some(d("2024-01-08")), Some(d("2024-01-09")))
                .with_estimates(Some(10.0), Some(10.0)),
            WorkItem::new("B", "b")
                .with_dates(Some(d("2024-01-24")), Some(d("2024-01-25")))
                .with_estimates(Some(4.0), Some(4.0)),
        ];
        let weeks = weekly(&items, d("2024-01-08"), d("2024-01-25"));
        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[1].added, 0.0);
        assert_eq!(weeks[1].total_scope, 10.0);
        assert_eq!(weeks[2].week_start, d("2024-01-22"));
        assert_eq!(weeks[2].total_scope, 14.0);
    }

    #[test]
    fn growth_alert_severity() {
        let weeks = vec![
            week("2024-01-01", 100.0, 100.0),
            week("2024-01-08", 5.0, 105.0),
            week("2024-01-15", 15.75, 120.75),
            week("2024-01-22", 30.0, 150.75),
        ];
        let alerts = alerts(&weeks, 10.0);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].week_start, d("2024-01-15"));
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert_eq!(alerts[1].severity, AlertSeverity::Error);
    }

    #[test]
    fn no_alert_without_prior_scope() {
        let weeks = vec![week("2024-01-01", 50.0, 50.0)];
        assert!(alerts(&weeks, 10.0).is_empty());
    }
}
