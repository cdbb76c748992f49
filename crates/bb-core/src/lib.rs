//! Beyond Burndown feasibility engine
//!
//! Runs every analysis over one snapshot of work items and one capacity
//! configuration, and bundles the results.
//!
//! # Core Concepts
//!
//! - [`FeasibilityEngine`]: validates capacity, then builds the envelope,
//!   team load, compliance report, dependency graph and scope analysis
//! - [`EngineConfig`]: TOML-loadable thresholds for every analysis
//! - [`WhatIfRequest`]: hypothetical changes previewed against the envelope
//! - [`StatusReport`]: headline, schedule, capacity, progress and risks
//!
//! # Example
//!
//! ```rust,ignore
//! use bb_core::prelude::*;
//!
//! let engine = FeasibilityEngine::new(EngineConfig::from_toml_str(&text)?);
//! let result = engine.analyze(&items, &capacity, today)?;
//! println!("feasibility {}", result.summary.feasibility_score);
//!
//! let report = StatusReport::from_analysis(&result, today);
//! let what_if = WhatIfOutcome::evaluate(&result.envelope, &request, &engine.config().scenarios);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod engine;
mod error;
pub mod report;
mod whatif;

pub use config::{EngineConfig, ScenarioDefaults};
pub use engine::{AnalysisResult, AnalysisSummary, FeasibilityEngine};
pub use error::EngineError;
pub use report::{HealthStatus, StatusReport};
pub use whatif::{WhatIfOutcome, WhatIfRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types
pub mod prelude {
    pub use crate::{
        AnalysisResult, EngineConfig, EngineError, FeasibilityEngine, HealthStatus, StatusReport,
        WhatIfOutcome, WhatIfRequest,
    };
    pub use bb_model::{CapacityConfig, RawWorkItem, WorkItem};
}
