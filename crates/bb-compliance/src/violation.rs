//! Violation types

use bb_model::WorkItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six rule kinds, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Start and/or due date absent
    MissingDates,
    /// Dated item without a positive estimate
    MissingEstimate,
    /// Done item still carrying remaining work
    DoneWithRemaining,
    /// Past due and not done
    Overdue,
    /// Due after its parent is due
    ChildAfterParent,
    /// A blocker is due after this item starts
    DependencyConflict,
}

impl ViolationKind {
    /// All kinds in evaluation order
    pub const ALL: [Self; 6] = [
        Self::MissingDates,
        Self::MissingEstimate,
        Self::DoneWithRemaining,
        Self::Overdue,
        Self::ChildAfterParent,
        Self::DependencyConflict,
    ];

    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingDates => "missing_dates",
            Self::MissingEstimate => "missing_estimate",
            Self::DoneWithRemaining => "done_with_remaining",
            Self::Overdue => "overdue",
            Self::ChildAfterParent => "child_after_parent",
            Self::DependencyConflict => "dependency_conflict",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Plan is inconsistent
    Error,
    /// Plan is likely wrong
    Warning,
    /// Worth a look
    Info,
}

impl Severity {
    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule failure on one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that failed
    pub kind: ViolationKind,
    /// Severity
    pub severity: Severity,
    /// Offending item key
    pub item_key: String,
    /// Offending item summary
    pub item_summary: String,
    /// Human-readable explanation
    pub message: String,
}

impl Violation {
    /// Violation on `item`
    #[must_use]
    pub fn new(
        kind: ViolationKind,
        severity: Severity,
        item: &WorkItem,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            item_key: item.key.clone(),
            item_summary: item.summary.clone(),
            message: message.into(),
        }
    }
}

/// Violation counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    /// Error count
    pub errors: usize,
    /// Warning count
    pub warnings: usize,
    /// Info count
    pub infos: usize,
    /// All violations
    pub total: usize,
}

impl SeveritySummary {
    /// Count one violation
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.infos += 1,
        }
        self.total += 1;
    }

    /// Most severe level present
    #[must_use]
    pub fn worst(&self) -> Option<Severity> {
        if self.errors > 0 {
            Some(Severity::Error)
        } else if self.warnings > 0 {
            Some(Severity::Warning)
        } else if self.infos > 0 {
            Some(Severity::Info)
        } else {
            None
        }
    }
}

impl<'a> FromIterator<&'a Violation> for SeveritySummary {
    fn from_iter<I: IntoIterator<Item = &'a Violation>>(iter: I) -> Self {
        let mut summary = Self::default();
        for violation in iter {
            summary.record(violation.severity);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts() {
        let item = WorkItem::new("A", "a");
        let violations = vec![
            Violation::new(ViolationKind::Overdue, Severity::Error, &item, "late"),
            Violation::new(ViolationKind::MissingDates, Severity::Info, &item, "no start"),
            Violation::new(ViolationKind::MissingEstimate, Severity::Warning, &item, "no estimate"),
            Violation::new(ViolationKind::Overdue, Severity::Warning, &item, "late"),
        ];
        let summary: SeveritySummary = violations.iter().collect();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 2);
        assert_eq!(summary.infos, 1);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.worst(), Some(Severity::Error));
        assert_eq!(SeveritySummary::default().worst(), None);
    }

    #[test]
    fn kinds_serialize_snake_case() {
        let json = serde_json::to_string(&ViolationKind::DoneWithRemaining).unwrap();
        assert_eq!(json, "\"done_with_remaining\"");
        for kind in ViolationKind::ALL {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{kind}\""));
        }
    }
}
