//! Period rollups of the day series for weekly and monthly chart views

use crate::envelope::Envelope;
use bb_model::calendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bucket size for a rollup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One bucket per business day
    #[default]
    Day,
    /// One bucket per Monday-started week
    Week,
    /// One bucket per calendar month
    Month,
}

impl Granularity {
    fn key(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => calendar::week_start(date),
            Self::Month => calendar::month_start(date),
        }
    }
}

/// Aggregated envelope values for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Start of the period (Monday, first of month, or the day itself)
    pub period_start: NaiveDate,
    /// Last business day of the window inside the period
    pub last_day: NaiveDate,
    /// Business days aggregated
    pub day_count: u32,
    /// Capacity hours in the period
    pub capacity: f64,
    /// Demand hours in the period
    pub demand: f64,
    /// Running capacity at period end
    pub cumulative_capacity: f64,
    /// Running demand at period end
    pub cumulative_demand: f64,
    /// Running time spent at period end
    pub cumulative_time_spent: f64,
    /// Overload at period end
    pub overload: f64,
    /// Any day in the period was overloaded
    pub overloaded: bool,
}

impl Envelope {
    /// Aggregate the day series into periods
    #[must_use]
    pub fn rollup(&self, granularity: Granularity) -> Vec<PeriodBucket> {
        let mut periods: Vec<PeriodBucket> = Vec::new();

        for bucket in &self.days {
            let key = granularity.key(bucket.date);
            match periods.last_mut() {
                Some(period) if period.period_start == key => {
                    period.last_day = bucket.date;
                    period.day_count += 1;
                    period.capacity += bucket.capacity;
                    period.demand += bucket.demand;
                    period.cumulative_capacity = bucket.cumulative_capacity;
                    period.cumulative_demand = bucket.cumulative_demand;
                    period.cumulative_time_spent = bucket.cumulative_time_spent;
                    period.overload = bucket.overload;
                    period.overloaded |= bucket.overloaded;
                }
                _ => periods.push(PeriodBucket {
                    period_start: key,
                    last_day: bucket.date,
                    day_count: 1,
                    capacity: bucket.capacity,
                    demand: bucket.demand,
                    cumulative_capacity: bucket.cumulative_capacity,
                    cumulative_demand: bucket.cumulative_demand,
                    cumulative_time_spent: bucket.cumulative_time_spent,
                    overload: bucket.overload,
                    overloaded: bucket.overloaded,
                }),
            }
        }

        periods
    }
}
