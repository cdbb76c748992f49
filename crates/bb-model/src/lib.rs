//! Beyond Burndown data model
//!
//! The typed boundary every analysis component works against:
//! - [`WorkItem`]: immutable demand records, normalized once from [`RawWorkItem`]
//! - [`CapacityConfig`]: team or per-member supply, fixed or scheduled
//! - [`calendar`]: business-day arithmetic and the shared [`AnalysisWindow`]
//!
//! # Example
//!
//! ```rust
//! use bb_model::{calendar, CapacityConfig, WorkItem};
//!
//! let capacity = CapacityConfig::team_per_week(80.0).validate().unwrap();
//! let monday = calendar::parse_date("2024-01-08").unwrap();
//! assert_eq!(capacity.hours_on(monday), 16.0);
//!
//! let item = WorkItem::new("BB-1", "Design feasibility chart");
//! assert!(item.start_date.is_none());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod calendar;
mod capacity;
mod error;
mod item;

pub use calendar::AnalysisWindow;
pub use capacity::{
    CapacityConfig, CapacityMode, CapacityPeriod, CapacitySchedulePeriod, ResolvedCapacity,
    ScheduleAllocation, TeamMember,
};
pub use error::ConfigError;
pub use item::{ParentRef, RawWorkItem, StatusCategory, WorkItem};

/// Tolerance used when comparing accumulated hour values
pub const HOURS_EPSILON: f64 = 1e-9;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
