//! Compliance rule engine
//!
//! Checks each work item against independent planning-data rules and
//! groups the resulting violations by kind and severity.
//!
//! # Core Concepts
//!
//! - [`ComplianceRule`]: one check, producing zero or more [`Violation`]s per item
//! - [`RuleSet`]: ordered rules; [`RuleSet::standard`] registers all six
//! - [`ComplianceEngine`]: runs a rule set over items as of a given day
//! - [`ComplianceReport`]: flat list, per-kind grouping and [`SeveritySummary`]
//!
//! # Example
//!
//! ```rust,ignore
//! use bb_compliance::{ComplianceConfig, ComplianceEngine, ViolationKind};
//!
//! let engine = ComplianceEngine::new(ComplianceConfig::default());
//! let report = engine.evaluate(&items, today);
//! let overdue = report.of_kind(ViolationKind::Overdue);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod engine;
pub mod rules;
mod violation;

pub use engine::{ComplianceConfig, ComplianceEngine, ComplianceReport, RuleSet};
pub use rules::{ComplianceRule, RuleContext};
pub use violation::{Severity, SeveritySummary, Violation, ViolationKind};

/// Days overdue beyond which an overdue item is an error
pub const DEFAULT_OVERDUE_ERROR_AFTER_DAYS: u32 = 7;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
