//! Envelope builder
//!
//! Each item is turned into an [`ItemSpread`] over a day-index range of the
//! window. Spreads are folded into a [`DayArena`] addressed by offset from
//! the window start, and one walk over the arena produces the cumulative
//! series.

use crate::envelope::{overloaded_periods, DayBucket, Envelope, EnvelopeTotals};
use crate::forecast::{Forecast, ForecastThresholds};
use crate::score::feasibility_score;
use bb_model::{AnalysisWindow, ResolvedCapacity, WorkItem, HOURS_EPSILON};
use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// Builds a feasibility [`Envelope`]
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder<'a> {
    capacity: &'a ResolvedCapacity,
    thresholds: ForecastThresholds,
}

impl<'a> EnvelopeBuilder<'a> {
    /// Create a builder over a resolved capacity
    #[inline]
    #[must_use]
    pub fn new(capacity: &'a ResolvedCapacity, thresholds: ForecastThresholds) -> Self {
        Self {
            capacity,
            thresholds,
        }
    }

    /// Build the envelope for `items` as of `today`
    ///
    /// Never fails: items with missing or inverted dates still count toward
    /// totals but are left out of the day series.
    #[must_use]
    pub fn build(&self, items: &[WorkItem], today: NaiveDate) -> Envelope {
        let window = AnalysisWindow::from_items(items);
        let days = window.map(|w| w.business_days()).unwrap_or_default();

        let spreads: Vec<Option<ItemSpread>> = items
            .iter()
            .map(|item| ItemSpread::for_item(item, &days, today))
            .collect();
        let scheduled_items = spreads.iter().filter(|s| s.is_some()).count();

        let arena = spreads
            .iter()
            .flatten()
            .fold(DayArena::new(days.len()), DayArena::absorb);

        let buckets = self.walk(&days, &arena);
        let overloaded_periods = overloaded_periods(&buckets);

        let total_capacity: f64 = buckets.iter().map(|b| b.capacity).sum();
        let total_days = u32::try_from(buckets.len()).unwrap_or(u32::MAX);
        let overloaded_days = overloaded_periods.iter().map(|p| p.day_count).sum();

        let totals = EnvelopeTotals {
            total_capacity,
            total_demand: items.iter().map(WorkItem::owed_hours).sum(),
            total_original_estimate: items.iter().map(WorkItem::original_hours).sum(),
            total_time_spent: items.iter().map(WorkItem::spent_hours).sum(),
            total_days,
            overloaded_days,
            avg_daily_capacity: if total_days == 0 {
                0.0
            } else {
                total_capacity / f64::from(total_days)
            },
            scheduled_items,
            unscheduled_items: items.len() - scheduled_items,
        };

        let feasibility_score = feasibility_score(
            totals.total_capacity,
            totals.total_demand,
            totals.overloaded_days,
            totals.total_days,
        );
        let forecast = Forecast::from_totals(&totals, window.map(|w| w.end), &self.thresholds);

        tracing::debug!(
            "Envelope over {} business days: capacity {:.1}h, demand {:.1}h, {} overloaded periods",
            totals.total_days,
            totals.total_capacity,
            totals.total_demand,
            overloaded_periods.len()
        );

        Envelope {
            window,
            days: buckets,
            overloaded_periods,
            feasibility_score,
            totals,
            forecast,
        }
    }

    fn walk(&self, days: &[NaiveDate], arena: &DayArena) -> Vec<DayBucket> {
        let mut cumulative_capacity = 0.0;
        let mut cumulative_demand = 0.0;
        let mut cumulative_original = 0.0;
        let mut cumulative_spent = 0.0;

        days.iter()
            .enumerate()
            .map(|(index, &date)| {
                let capacity = self.capacity.hours_on(date);
                let demand = arena.demand[index];

                cumulative_capacity += capacity;
                cumulative_demand += demand;
                cumulative_original += arena.original[index];
                cumulative_spent += arena.spent[index];

                let overload = (cumulative_demand - cumulative_capacity).max(0.0);
                let completion_percent = if cumulative_original > HOURS_EPSILON {
                    (cumulative_spent / cumulative_original * 100.0).clamp(0.0, 100.0)
                } else {
                    0.0
                };

                DayBucket {
                    date,
                    capacity,
                    demand,
                    cumulative_capacity,
                    cumulative_demand,
                    cumulative_original_estimate: cumulative_original,
                    cumulative_time_spent: cumulative_spent,
                    completion_percent,
                    overload,
                    overloaded: overload > HOURS_EPSILON,
                }
            })
            .collect()
    }
}

/// Where one item's hours land in the day arena
#[derive(Debug, Clone, PartialEq)]
struct ItemSpread {
    days: RangeInclusive<usize>,
    spent_days: RangeInclusive<usize>,
    owed: f64,
    original: f64,
    spent: f64,
}

impl ItemSpread {
    /// Spread for an item, `None` when it has no place in the series
    fn for_item(item: &WorkItem, days: &[NaiveDate], today: NaiveDate) -> Option<Self> {
        let (Some(start), Some(due)) = (item.start_date, item.due_date) else {
            return None;
        };
        if due < start {
            tracing::debug!("{}: due date before start date, left out of day spread", item.key);
            return None;
        }
        if days.is_empty() {
            return None;
        }

        let first = days.partition_point(|d| *d < start);
        let end = days.partition_point(|d| *d <= due);

        let range = if first < end {
            first..=end - 1
        } else {
            // Zero business days in range: next business day, clipped to the window
            let index = first.min(days.len() - 1);
            index..=index
        };

        let spent_end = days[range.clone()].partition_point(|d| *d <= today);
        let spent_days = if spent_end == 0 {
            *range.start()..=*range.start()
        } else {
            *range.start()..=*range.start() + spent_end - 1
        };

        Some(Self {
            days: range,
            spent_days,
            owed: item.owed_hours(),
            original: item.original_hours(),
            spent: item.spent_hours(),
        })
    }
}

/// Per-day hour contributions indexed by offset from the window start
#[derive(Debug, Clone)]
struct DayArena {
    demand: Vec<f64>,
    original: Vec<f64>,
    spent: Vec<f64>,
}

impl DayArena {
    fn new(len: usize) -> Self {
        Self {
            demand: vec![0.0; len],
            original: vec![0.0; len],
            spent: vec![0.0; len],
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn absorb(mut self, spread: &ItemSpread) -> Self {
        let span = spread.days.clone().count() as f64;
        let spent_span = spread.spent_days.clone().count() as f64;

        for index in spread.days.clone() {
            self.demand[index] += spread.owed / span;
            self.original[index] += spread.original / span;
        }
        for index in spread.spent_days.clone() {
            self.spent[index] += spread.spent / spent_span;
        }
        self
    }
}
