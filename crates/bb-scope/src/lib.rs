//! Scope history and trend
//!
//! Reconstructs how planned scope evolved over the analysis window from
//! item dates, and flags weeks where scope grew faster than a threshold.
//!
//! # Core Concepts
//!
//! - [`ScopePoint`]: original, current, completed and remaining scope on one business day
//! - [`TrendWeek`]: hours added and removed per Monday-keyed week
//! - [`ScopeAlert`]: a week whose net growth exceeded the threshold
//! - [`ScopeAnalyzer`]: runs all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use bb_scope::{ScopeAnalyzer, ScopeConfig};
//!
//! let analysis = ScopeAnalyzer::new(ScopeConfig::default()).analyze(&items);
//! println!("scope changed {:.1}%", analysis.summary.scope_change_percent);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod analyzer;
mod timeline;
mod trend;

pub use analyzer::{ScopeAnalysis, ScopeAnalyzer, ScopeConfig, ScopeSummary};
pub use timeline::ScopePoint;
pub use trend::{AlertSeverity, ScopeAlert, TrendWeek};

/// Default weekly growth percentage that raises an alert
pub const DEFAULT_GROWTH_ALERT_PERCENT: f64 = 10.0;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
