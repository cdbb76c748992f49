//! Work items
//!
//! Defines the demand records the engine analyzes:
//! - [`RawWorkItem`]: loosely typed host record (string dates, optional everything)
//! - [`WorkItem`]: normalized, immutable record used by every component
//! - [`StatusCategory`]: the three status buckets the rules care about

use crate::calendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Status category of a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// Not started
    New,
    /// Work underway
    InProgress,
    /// Finished
    Done,
}

impl StatusCategory {
    /// Check if the item is finished
    #[inline]
    #[must_use]
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl Default for StatusCategory {
    fn default() -> Self {
        Self::New
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "new" | "to do" | "todo" | "open" => Ok(Self::New),
            "in_progress" | "in progress" | "indeterminate" => Ok(Self::InProgress),
            "done" | "closed" | "resolved" => Ok(Self::Done),
            other => Err(format!("unknown status category: {other}")),
        }
    }
}

/// Parent reference resolved by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    /// Parent item key
    pub key: String,
    /// Parent due date, if the host attached one
    pub due_date: Option<NaiveDate>,
}

/// Normalized demand record
///
/// Constructed fresh for every analysis and never mutated by the engine.
/// Hours are stored as given; use the `*_hours` accessors for
/// contribution values, which are never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique key
    pub key: String,
    /// Summary text
    pub summary: String,
    /// Status category
    pub status: StatusCategory,
    /// Assignee display name
    pub assignee: Option<String>,
    /// Planned start
    pub start_date: Option<NaiveDate>,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Original estimate in hours
    pub original_estimate: Option<f64>,
    /// Remaining estimate in hours
    pub remaining_estimate: Option<f64>,
    /// Logged hours
    pub time_spent: Option<f64>,
    /// Parent item
    pub parent: Option<ParentRef>,
    /// Keys of items this item blocks
    pub blocks: BTreeSet<String>,
    /// Keys of items blocking this item
    pub blocked_by: BTreeSet<String>,
}

impl WorkItem {
    /// Create an item with only key and summary set
    #[must_use]
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            status: StatusCategory::New,
            assignee: None,
            start_date: None,
            due_date: None,
            original_estimate: None,
            remaining_estimate: None,
            time_spent: None,
            parent: None,
            blocks: BTreeSet::new(),
            blocked_by: BTreeSet::new(),
        }
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: StatusCategory) -> Self {
        self.status = status;
        self
    }

    /// With start and due dates
    #[inline]
    #[must_use]
    pub fn with_dates(mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.due_date = due;
        self
    }

    /// With original and remaining estimates
    #[inline]
    #[must_use]
    pub fn with_estimates(mut self, original: Option<f64>, remaining: Option<f64>) -> Self {
        self.original_estimate = original;
        self.remaining_estimate = remaining;
        self
    }

    /// With logged hours
    #[inline]
    #[must_use]
    pub fn with_time_spent(mut self, hours: f64) -> Self {
        self.time_spent = Some(hours);
        self
    }

    /// With assignee
    #[inline]
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// With parent reference
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, key: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        self.parent = Some(ParentRef {
            key: key.into(),
            due_date,
        });
        self
    }

    /// Add an outgoing "blocks" link
    #[inline]
    #[must_use]
    pub fn blocking(mut self, key: impl Into<String>) -> Self {
        self.blocks.insert(key.into());
        self
    }

    /// Add an inward "is blocked by" link
    #[inline]
    #[must_use]
    pub fn blocked_by(mut self, key: impl Into<String>) -> Self {
        self.blocked_by.insert(key.into());
        self
    }

    /// Check if the item is finished
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Both start and due date are known
    #[inline]
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.start_date.is_some() && self.due_date.is_some()
    }

    /// Hours still owed: zero when done, else the remaining estimate,
    /// else original minus spent
    #[must_use]
    pub fn owed_hours(&self) -> f64 {
        if self.is_done() {
            return 0.0;
        }
        match self.remaining_estimate {
            Some(remaining) => non_negative(remaining),
            None => non_negative(
                non_negative(self.original_estimate.unwrap_or(0.0))
                    - non_negative(self.time_spent.unwrap_or(0.0)),
            ),
        }
    }

    /// Hours credited as completed: time spent, or the original estimate
    /// when nothing was logged
    #[must_use]
    pub fn completed_hours(&self) -> f64 {
        let spent = non_negative(self.time_spent.unwrap_or(0.0));
        if spent > 0.0 {
            spent
        } else {
            non_negative(self.original_estimate.unwrap_or(0.0))
        }
    }

    /// Total scope the item represents: original estimate, else remaining
    /// plus spent
    #[must_use]
    pub fn scope_hours(&self) -> f64 {
        match self.original_estimate {
            Some(original) => non_negative(original),
            None => {
                non_negative(self.remaining_estimate.unwrap_or(0.0))
                    + non_negative(self.time_spent.unwrap_or(0.0))
            }
        }
    }

    /// Original estimate contribution (zero when absent)
    #[inline]
    #[must_use]
    pub fn original_hours(&self) -> f64 {
        non_negative(self.original_estimate.unwrap_or(0.0))
    }

    /// Logged hours contribution (zero when absent)
    #[inline]
    #[must_use]
    pub fn spent_hours(&self) -> f64 {
        non_negative(self.time_spent.unwrap_or(0.0))
    }

    /// Normalize a host record
    ///
    /// Unparseable dates and negative or non-finite hours are dropped with a
    /// warning; an unknown status falls back to [`StatusCategory::New`].
    #[must_use]
    pub fn from_raw(raw: RawWorkItem) -> Self {
        let key = raw.key;

        let status = match raw.status.as_deref() {
            None => StatusCategory::New,
            Some(s) => s.parse().unwrap_or_else(|err| {
                tracing::warn!("{key}: {err}, treating as new");
                StatusCategory::New
            }),
        };

        let start_date = normalize_date(&key, "start_date", raw.start_date.as_deref());
        let due_date = normalize_date(&key, "due_date", raw.due_date.as_deref());
        let original_estimate = normalize_hours(&key, "original_estimate", raw.original_estimate);
        let remaining_estimate =
            normalize_hours(&key, "remaining_estimate", raw.remaining_estimate);
        let time_spent = normalize_hours(&key, "time_spent", raw.time_spent);

        let parent = raw.parent.filter(|p| !p.trim().is_empty()).map(|parent_key| ParentRef {
            key: parent_key,
            due_date: normalize_date(&key, "parent_due_date", raw.parent_due_date.as_deref()),
        });

        Self {
            summary: raw.summary.unwrap_or_default(),
            status,
            assignee: raw.assignee.filter(|a| !a.trim().is_empty()),
            start_date,
            due_date,
            original_estimate,
            remaining_estimate,
            time_spent,
            parent,
            blocks: clean_keys(raw.blocks),
            blocked_by: clean_keys(raw.blocked_by),
            key,
        }
    }
}

impl From<RawWorkItem> for WorkItem {
    fn from(raw: RawWorkItem) -> Self {
        Self::from_raw(raw)
    }
}

/// Host-shaped work item record
///
/// Field names accept both snake_case and the host's camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWorkItem {
    /// Unique key
    pub key: String,
    /// Summary text
    pub summary: Option<String>,
    /// Status category name
    #[serde(alias = "statusCategory")]
    pub status: Option<String>,
    /// Assignee display name
    pub assignee: Option<String>,
    /// Start date string
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    /// Due date string
    #[serde(alias = "dueDate", alias = "duedate")]
    pub due_date: Option<String>,
    /// Original estimate in hours
    #[serde(alias = "originalEstimate")]
    pub original_estimate: Option<f64>,
    /// Remaining estimate in hours
    #[serde(alias = "remainingEstimate")]
    pub remaining_estimate: Option<f64>,
    /// Logged hours
    #[serde(alias = "timeSpent")]
    pub time_spent: Option<f64>,
    /// Parent key
    pub parent: Option<String>,
    /// Parent due date string
    #[serde(alias = "parentDueDate")]
    pub parent_due_date: Option<String>,
    /// Outgoing "blocks" link keys
    pub blocks: Vec<String>,
    /// Inward "is blocked by" link keys
    #[serde(alias = "blockedBy")]
    pub blocked_by: Vec<String>,
}

#[inline]
fn non_negative(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

fn normalize_date(key: &str, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    let parsed = calendar::parse_date(value);
    if parsed.is_none() {
        tracing::warn!("{key}: dropping unparseable {field} {value:?}");
    }
    parsed
}

fn normalize_hours(key: &str, field: &str, value: Option<f64>) -> Option<f64> {
    let value = value?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        tracing::warn!("{key}: dropping invalid {field} {value}");
        None
    }
}

fn clean_keys(keys: Vec<String>) -> BTreeSet<String> {
    keys.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
