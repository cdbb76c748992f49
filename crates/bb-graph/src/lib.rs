//! Dependency graph analysis
//!
//! Builds the blocking graph between work items and reports cycles, roots,
//! leaves, chain depth, the critical path and conflicting edges.
//!
//! # Core Concepts
//!
//! - [`DependencyAnalyzer`]: indexes items and builds the petgraph storage
//! - [`DependencyGraph`]: the analysis result
//! - [`find_cycles`]: elementary cycle enumeration over an adjacency list
//!
//! # Example
//!
//! ```rust,ignore
//! use bb_graph::DependencyAnalyzer;
//!
//! let graph = DependencyAnalyzer::analyze(&items);
//! for cycle in &graph.cycles {
//!     println!("circular: {}", cycle.join(" -> "));
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod analyzer;
mod cycles;
mod graph;

pub use analyzer::DependencyAnalyzer;
pub use cycles::find_cycles;
pub use graph::{DanglingLink, DependencyEdge, DependencyGraph, LinkDirection};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
