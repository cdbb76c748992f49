//! Per-day scope timeline

use bb_model::{WorkItem, HOURS_EPSILON};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scope state on one business day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopePoint {
    /// Business day
    pub date: NaiveDate,
    /// Total scope of every item, constant across the timeline
    pub original_scope: f64,
    /// `completed + remaining`
    pub current_scope: f64,
    /// Hours of items done as of this day
    pub completed: f64,
    /// Hours of present items not yet completed
    pub remaining: f64,
}

/// Completed and remaining hours of `items` as of `date`
///
/// With no date, every item is present and done items count as completed.
pub(crate) fn snapshot(items: &[WorkItem], date: Option<NaiveDate>) -> (f64, f64) {
    let mut completed = 0.0;
    let mut remaining = 0.0;

    for item in items {
        let present = match (item.start_date, date) {
            (Some(start), Some(day)) => start <= day,
            _ => true,
        };
        if !present {
            continue;
        }

        if item.is_done() {
            let finished = match (item.due_date, date) {
                (Some(due), Some(day)) => due <= day,
                _ => true,
            };
            if finished {
                completed += item.completed_hours();
            } else {
                remaining += item.completed_hours();
            }
        } else {
            remaining += item.owed_hours();
        }
    }

    (completed, remaining)
}

pub(crate) fn build(
    items: &[WorkItem],
    days: &[NaiveDate],
    original_scope: f64,
) -> Vec<ScopePoint> {
    days.iter()
        .map(|&date| {
            let (completed, remaining) = snapshot(items, Some(date));
            ScopePoint {
                date,
                original_scope,
                current_scope: completed + remaining,
                completed,
                remaining,
            }
        })
        .collect()
}

impl ScopePoint {
    /// `current / original` as a percentage change
    #[must_use]
    pub fn change_percent(&self) -> f64 {
        if self.original_scope > HOURS_EPSILON {
            (self.current_scope - self.original_scope) / self.original_scope * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_model::StatusCategory;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn items_appear_on_their_start_date() {
        let items = vec![
            WorkItem::new("A", "a")
                .with_dates(Some(d("2024-01-08")), Some(d("2024-01-10")))
                .with_estimates(Some(10.0), Some(10.0)),
            WorkItem::new("B", "b")
                .with_dates(Some(d("2024-01-10")), Some(d("2024-01-12")))
                .with_estimates(Some(6.0), Some(6.0)),
        ];
        let days = bb_model::calendar::business_days(d("2024-01-08"), d("2024-01-12"));
        let timeline = build(&items, &days, 16.0);
        assert_eq!(timeline[0].current_scope, 10.0);
        assert_eq!(timeline[2].current_scope, 16.0);
        assert_eq!(timeline[0].change_percent(), -37.5);
    }

    #[test]
    fn done_items_complete_on_due_date() {
        let items = vec![WorkItem::new("A", "a")
            .with_status(StatusCategory::Done)
            .with_dates(Some(d("2024-01-08")), Some(d("2024-01-10")))
            .with_estimates(Some(8.0), Some(0.0))
            .with_time_spent(12.0)];
        assert_eq!(snapshot(&items, Some(d("2024-01-09"))), (0.0, 12.0));
        assert_eq!(snapshot(&items, Some(d("2024-01-10"))), (12.0, 0.0));
        assert_eq!(snapshot(&items, None), (12.0, 0.0));
    }

    #[test]
    fn undated_items_are_always_present() {
        let items = vec![WorkItem::new("A", "a").with_estimates(Some(5.0), Some(3.0))];
        assert_eq!(snapshot(&items, Some(d("2024-01-08"))), (0.0, 3.0));
    }
}
