//! Feasibility envelope
//!
//! Turns work items and a resolved capacity into a business-day time series
//! of capacity against demand, then derives a feasibility score and a
//! completion forecast from it.
//!
//! # Core Concepts
//!
//! - [`EnvelopeBuilder`]: spreads capacity and demand over the analysis window
//! - [`Envelope`]: day buckets, overloaded periods, totals, score, forecast
//! - [`Granularity`]: day/week/month rollups of the same series
//! - [`team_health`]: per-assignee load against member capacity
//! - [`Scenario`]: non-destructive what-if deltas composed into a [`CombinedEffect`]
//!
//! # Example
//!
//! ```rust,ignore
//! use bb_envelope::{EnvelopeBuilder, ForecastThresholds, Scenario};
//!
//! let capacity = config.validate()?;
//! let envelope = EnvelopeBuilder::new(&capacity, ForecastThresholds::default())
//!     .build(&items, today);
//!
//! let hire = Scenario::add_capacity(&envelope, 1.0, 8.0);
//! println!("{} -> {}", envelope.feasibility_score, hire.outcome.feasibility_score);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builder;
mod envelope;
mod forecast;
mod rollup;
pub mod scenario;
mod score;
mod team;

pub use builder::EnvelopeBuilder;
pub use envelope::{DayBucket, Envelope, EnvelopeTotals, OverloadedPeriod};
pub use forecast::{Forecast, ForecastStatus, ForecastThresholds};
pub use rollup::{Granularity, PeriodBucket};
pub use scenario::{
    apply_add_capacity, apply_add_scope, apply_deadline_change, apply_remove_capacity,
    apply_remove_scope, combine, CombinedEffect, Scenario, ScenarioDelta, ScenarioKind,
    ScenarioOutcome, ScenarioSet, ScopeDirection,
};
pub use score::{feasibility_score, MAX_OVERLOAD_PENALTY, OVERLOAD_PENALTY_WEIGHT};
pub use team::{team_health, MemberLoad};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
