//! Dependency analysis result types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One blocking relationship
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Item that must finish first
    pub blocker: String,
    /// Item waiting on the blocker
    pub blocked: String,
    /// Blocker is due after the blocked item starts
    pub has_conflict: bool,
}

/// Which link field produced a dangling reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDirection {
    /// From the item's `blocks` list
    Blocks,
    /// From the item's `blocked_by` list
    BlockedBy,
}

/// Link to a key outside the analyzed item set
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DanglingLink {
    /// Item carrying the link
    pub from: String,
    /// Key that was not found
    pub missing: String,
    /// Link field
    pub direction: LinkDirection,
}

/// Result of analyzing the blocking graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Items that take part in at least one edge
    pub node_count: usize,
    /// De-duplicated edges, ordered by blocker then blocked key
    pub edges: Vec<DependencyEdge>,
    /// Distinct cycles as key sequences, without repeating the first key
    pub cycles: Vec<Vec<String>>,
    /// Keys on any cycle
    pub cyclic_keys: BTreeSet<String>,
    /// Participating items nothing blocks
    pub roots: Vec<String>,
    /// Participating items that block nothing
    pub leaves: Vec<String>,
    /// Longest blocker chain length in edges, ignoring cyclic items
    pub max_depth: u32,
    /// Chain depth per acyclic participating item
    pub depths: BTreeMap<String, u32>,
    /// Keys along one longest chain, blocker first
    pub critical_path: Vec<String>,
    /// Links to keys outside the item set
    pub dangling_links: Vec<DanglingLink>,
}

impl DependencyGraph {
    /// Whether any cycle was found
    #[inline]
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Edges flagged as date conflicts
    pub fn conflicts(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(|edge| edge.has_conflict)
    }

    /// Keys blocking `key`
    pub fn blockers_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.blocked == key)
            .map(|edge| edge.blocker.as_str())
    }

    /// Keys blocked by `key`
    pub fn blocked_by<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.blocker == key)
            .map(|edge| edge.blocked.as_str())
    }
}
