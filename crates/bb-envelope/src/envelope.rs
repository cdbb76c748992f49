//! Envelope output types

use crate::forecast::{Forecast, ForecastThresholds};
use crate::score::feasibility_score;
use bb_model::AnalysisWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One business day of the envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Business day
    pub date: NaiveDate,
    /// Capacity hours available that day
    pub capacity: f64,
    /// Demand hours scheduled that day
    pub demand: f64,
    /// Running capacity total
    pub cumulative_capacity: f64,
    /// Running demand total
    pub cumulative_demand: f64,
    /// Running original-estimate total
    pub cumulative_original_estimate: f64,
    /// Running time-spent total
    pub cumulative_time_spent: f64,
    /// `cumulative_time_spent / cumulative_original_estimate` as a percentage
    pub completion_percent: f64,
    /// `max(0, cumulative_demand - cumulative_capacity)`
    pub overload: f64,
    /// Cumulative demand exceeds cumulative capacity
    pub overloaded: bool,
}

/// Contiguous run of overloaded days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadedPeriod {
    /// First overloaded day
    pub start_date: NaiveDate,
    /// Last overloaded day
    pub end_date: NaiveDate,
    /// Business days in the run
    pub day_count: u32,
    /// Largest overload inside the run
    pub max_overload_hours: f64,
}

/// Aggregate totals over the window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeTotals {
    /// Capacity hours over all business days in the window
    pub total_capacity: f64,
    /// Hours owed across all items, scheduled or not
    pub total_demand: f64,
    /// Original estimates across all items
    pub total_original_estimate: f64,
    /// Logged hours across all items
    pub total_time_spent: f64,
    /// Business days in the window
    pub total_days: u32,
    /// Days flagged overloaded
    pub overloaded_days: u32,
    /// `total_capacity / total_days`
    pub avg_daily_capacity: f64,
    /// Items spread across the day series
    pub scheduled_items: usize,
    /// Items counted in totals only (missing or inverted dates)
    pub unscheduled_items: usize,
}

/// Capacity-vs-demand time series with derived feasibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Analysis window, `None` when no item carries a date
    pub window: Option<AnalysisWindow>,
    /// One bucket per business day, in order
    pub days: Vec<DayBucket>,
    /// Coalesced overloaded runs
    pub overloaded_periods: Vec<OverloadedPeriod>,
    /// Feasibility score in `0..=100`
    pub feasibility_score: u8,
    /// Aggregate totals
    pub totals: EnvelopeTotals,
    /// Completion forecast
    pub forecast: Forecast,
}

impl Envelope {
    /// Envelope carrying only totals, with no day series
    ///
    /// Score and forecast are derived from the totals. Useful when the host
    /// already holds aggregates, and for previewing scenarios.
    #[must_use]
    pub fn from_totals(totals: EnvelopeTotals, thresholds: &ForecastThresholds) -> Self {
        let feasibility_score = feasibility_score(
            totals.total_capacity,
            totals.total_demand,
            totals.overloaded_days,
            totals.total_days,
        );
        let forecast = Forecast::from_totals(&totals, None, thresholds);
        Self {
            window: None,
            days: Vec::new(),
            overloaded_periods: Vec::new(),
            feasibility_score,
            totals,
            forecast,
        }
    }

    /// Whether any day is overloaded
    #[inline]
    #[must_use]
    pub fn has_overload(&self) -> bool {
        !self.overloaded_periods.is_empty()
    }

    /// Last day of the series
    #[inline]
    #[must_use]
    pub fn last_day(&self) -> Option<&DayBucket> {
        self.days.last()
    }

    /// Bucket for a specific date
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days
            .binary_search_by_key(&date, |bucket| bucket.date)
            .ok()
            .map(|index| &self.days[index])
    }

    /// Largest overload over the whole series
    #[must_use]
    pub fn peak_overload(&self) -> f64 {
        self.overloaded_periods
            .iter()
            .map(|p| p.max_overload_hours)
            .fold(0.0, f64::max)
    }
}

/// Coalesce consecutive overloaded buckets
pub(crate) fn overloaded_periods(days: &[DayBucket]) -> Vec<OverloadedPeriod> {
    let mut periods: Vec<OverloadedPeriod> = Vec::new();
    let mut open = false;

    for bucket in days {
        if !bucket.overloaded {
            open = false;
            continue;
        }
        match periods.last_mut() {
            Some(period) if open => {
                period.end_date = bucket.date;
                period.day_count += 1;
                period.max_overload_hours = period.max_overload_hours.max(bucket.overload);
            }
            _ => {
                periods.push(OverloadedPeriod {
                    start_date: bucket.date,
                    end_date: bucket.date,
                    day_count: 1,
                    max_overload_hours: bucket.overload,
                });
                open = true;
            }
        }
    }

    periods
}
