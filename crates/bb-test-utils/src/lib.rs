//! Testing utilities for the Beyond Burndown workspace
//!
//! Shared fixtures for work items, capacity and envelopes.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use bb_envelope::{Envelope, EnvelopeTotals, ForecastThresholds};
use bb_model::{calendar, CapacityConfig, ResolvedCapacity, StatusCategory, WorkItem};
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Monday 2024-01-08, the anchor date most fixtures use
pub fn monday() -> NaiveDate {
    date("2024-01-08")
}

/// Open item spanning `start..=due` with `hours` both estimated and remaining
pub fn dated_item(key: &str, start: &str, due: &str, hours: f64) -> WorkItem {
    WorkItem::new(key, format!("Item {key}"))
        .with_dates(Some(date(start)), Some(date(due)))
        .with_estimates(Some(hours), Some(hours))
}

/// Open item with an estimate and no dates
pub fn undated_item(key: &str, hours: f64) -> WorkItem {
    WorkItem::new(key, format!("Item {key}")).with_estimates(Some(hours), Some(hours))
}

/// Open item with dates and no estimates
pub fn unestimated_item(key: &str, start: &str, due: &str) -> WorkItem {
    WorkItem::new(key, format!("Item {key}")).with_dates(Some(date(start)), Some(date(due)))
}

/// Done item with all hours logged
pub fn done_item(key: &str, start: &str, due: &str, hours: f64) -> WorkItem {
    dated_item(key, start, due, hours)
        .with_status(StatusCategory::Done)
        .with_estimates(Some(hours), Some(0.0))
        .with_time_spent(hours)
}

/// `count` items of `hours` each, one business week apart from `start`
pub fn weekly_backlog(count: usize, start: NaiveDate, hours: f64) -> Vec<WorkItem> {
    (0..count)
        .map(|i| {
            let offset = u32::try_from(i * 5).unwrap();
            let first =
                calendar::add_business_days(calendar::next_business_day_on_or_after(start), offset);
            let due = calendar::add_business_days(first, 4);
            WorkItem::new(format!("BB-{}", i + 1), format!("Item {}", i + 1))
                .with_dates(Some(first), Some(due))
                .with_estimates(Some(hours), Some(hours))
        })
        .collect()
}

/// Link items so that each blocks the next
pub fn chain(keys: &[&str]) -> Vec<WorkItem> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let mut item = undated_item(key, 1.0);
            if let Some(next) = keys.get(i + 1) {
                item = item.blocking(*next);
            }
            if i > 0 {
                item = item.blocked_by(keys[i - 1]);
            }
            item
        })
        .collect()
}

/// Validated team capacity in hours per week
pub fn team_capacity(hours_per_week: f64) -> ResolvedCapacity {
    CapacityConfig::team_per_week(hours_per_week).validate().unwrap()
}

/// Envelope carrying only totals, with the average daily capacity derived
pub fn envelope_with_totals(capacity: f64, demand: f64, days: u32) -> Envelope {
    envelope_with_overload(capacity, demand, days, 0)
}

/// Totals-only envelope with `overloaded_days` flagged
pub fn envelope_with_overload(
    capacity: f64,
    demand: f64,
    days: u32,
    overloaded_days: u32,
) -> Envelope {
    Envelope::from_totals(
        EnvelopeTotals {
            total_capacity: capacity,
            total_demand: demand,
            total_days: days,
            overloaded_days,
            avg_daily_capacity: if days == 0 { 0.0 } else { capacity / f64::from(days) },
            ..EnvelopeTotals::default()
        },
        &ForecastThresholds::default(),
    )
}

/// A small project touching every analysis: overdue, unestimated,
/// undated, blocked and done items under two parents
pub fn sample_project() -> Vec<WorkItem> {
    vec![
        dated_item("WEB-1", "2024-01-08", "2024-01-12", 24.0)
            .with_assignee("ana")
            .with_parent("EPIC-1", Some(date("2024-01-31")))
            .blocking("WEB-2"),
        dated_item("WEB-2", "2024-01-15", "2024-01-19", 32.0)
            .with_assignee("bo")
            .with_parent("EPIC-1", Some(date("2024-01-31")))
            .blocked_by("WEB-1")
            .blocking("WEB-3"),
        dated_item("WEB-3", "2024-01-22", "2024-02-09", 40.0)
            .with_parent("EPIC-1", Some(date("2024-01-31")))
            .blocked_by("WEB-2"),
        unestimated_item("WEB-4", "2024-01-10", "2024-01-16").with_assignee("ana"),
        undated_item("WEB-5", 8.0).with_parent("EPIC-2", None),
        done_item("WEB-6", "2024-01-08", "2024-01-09", 6.0).with_assignee("bo"),
    ]
}
