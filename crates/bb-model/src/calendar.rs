//! Business-day calendar
//!
//! All capacity and demand is bucketed by business day (Mon-Fri). Dates are
//! plain [`NaiveDate`]s normalized to UTC; nothing here reads the clock.

use crate::WorkItem;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

const HOST_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse a date-like string into a UTC calendar date
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and the host's
/// `YYYY-MM-DDTHH:MM:SS.sss+hhmm` timestamps. Timestamps carrying an offset
/// are converted to UTC first. Returns `None` for anything else.
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_str(input, HOST_DATETIME_FORMAT))
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Whether the date falls Monday through Friday
#[inline]
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The date itself if it is a business day, else the following Monday
#[must_use]
pub fn next_business_day_on_or_after(date: NaiveDate) -> NaiveDate {
    let skip = match date.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(skip)).unwrap_or(date)
}

/// Move forward by `count` business days
///
/// Starting on a weekend counts from the next Monday, so adding zero days to
/// a Saturday yields that Monday.
#[must_use]
pub fn add_business_days(date: NaiveDate, count: u32) -> NaiveDate {
    let mut current = next_business_day_on_or_after(date);
    let mut remaining = count;
    while remaining > 0 {
        let Some(next) = current.succ_opt() else {
            return current;
        };
        current = next_business_day_on_or_after(next);
        remaining -= 1;
    }
    current
}

/// Inclusive count of business days in `[start, end]`
///
/// An inverted range counts zero.
#[must_use]
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    let span = days_between(start, end) + 1;
    let full_weeks = span / 7;
    let mut count = full_weeks * 5;

    let mut day = start
        .checked_add_days(Days::new(u64::try_from(full_weeks * 7).unwrap_or(0)))
        .unwrap_or(end);
    while day <= end {
        if is_business_day(day) {
            count += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Ordered business days in `[start, end]`
#[must_use]
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_business_day(*day))
        .collect()
}

/// Signed calendar-day difference `b - a`
#[inline]
#[must_use]
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Monday of the week containing `date`
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// First day of the month containing `date`
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Number of business days in the month containing `date`
#[must_use]
pub fn business_days_in_month(date: NaiveDate) -> u32 {
    business_days_between(month_start(date), month_end(date))
}

/// Display form, e.g. `Jan 5, 2024`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// ISO form, e.g. `2024-01-05`
#[must_use]
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Inclusive date range an analysis runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    /// First calendar day of the window
    pub start: NaiveDate,
    /// Last calendar day of the window
    pub end: NaiveDate,
}

impl AnalysisWindow {
    /// Create a window, swapping the bounds if they arrive inverted
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Window spanning the earliest start and the latest due date of `items`
    ///
    /// An item with only one date contributes that date to both ends.
    /// Returns `None` when no item carries any date.
    #[must_use]
    pub fn from_items(items: &[WorkItem]) -> Option<Self> {
        let mut start: Option<NaiveDate> = None;
        let mut end: Option<NaiveDate> = None;

        for item in items {
            let (first, last) = match (item.start_date, item.due_date) {
                (Some(s), Some(d)) => (s.min(d), s.max(d)),
                (Some(s), None) => (s, s),
                (None, Some(d)) => (d, d),
                (None, None) => continue,
            };
            start = Some(start.map_or(first, |current| current.min(first)));
            end = Some(end.map_or(last, |current| current.max(last)));
        }

        Some(Self::new(start?, end?))
    }

    /// Business days in the window, in order
    #[must_use]
    pub fn business_days(&self) -> Vec<NaiveDate> {
        business_days(self.start, self.end)
    }

    /// Number of business days in the window
    #[must_use]
    pub fn business_day_count(&self) -> u32 {
        business_days_between(self.start, self.end)
    }

    /// Whether `date` lies inside the window
    #[inline]
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
