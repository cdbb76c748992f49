//! Blocking-graph analyzer

use crate::cycles::find_cycles;
use crate::graph::{DanglingLink, DependencyEdge, DependencyGraph, LinkDirection};
use bb_model::WorkItem;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};

/// Analyzes blocking relationships between work items
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Build and analyze the blocking graph of `items`
    ///
    /// Nodes are indexed in key order; a repeated key keeps its first item.
    /// Always terminates, whatever cycles the links form.
    #[must_use]
    pub fn analyze(items: &[WorkItem]) -> DependencyGraph {
        let nodes = NodeIndex::new(items);
        let (links, dangling_links) = nodes.links(items);

        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for &(blocker, blocked) in &links {
            graph.add_edge(blocker, blocked, ());
            adjacency[blocker].push(blocked);
        }

        let cycles: Vec<Vec<String>> = find_cycles(&adjacency)
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|i| nodes.key(i).to_string()).collect())
            .collect();
        let cyclic = cyclic_nodes(&graph);

        let mut participating: Vec<usize> = graph.nodes().collect();
        participating.sort_unstable();

        let roots = participating
            .iter()
            .filter(|n| graph.neighbors_directed(**n, Direction::Incoming).next().is_none())
            .map(|n| nodes.key(*n).to_string())
            .collect();
        let leaves = participating
            .iter()
            .filter(|n| graph.neighbors_directed(**n, Direction::Outgoing).next().is_none())
            .map(|n| nodes.key(*n).to_string())
            .collect();

        let chains = Chains::compute(&graph, &participating, &cyclic);

        let edges: Vec<DependencyEdge> = links
            .iter()
            .map(|&(blocker, blocked)| {
                let blocker_item = nodes.item(blocker);
                let blocked_item = nodes.item(blocked);
                let has_conflict = match (blocker_item.due_date, blocked_item.start_date) {
                    (Some(due), Some(start)) => due > start,
                    _ => false,
                };
                DependencyEdge {
                    blocker: blocker_item.key.clone(),
                    blocked: blocked_item.key.clone(),
                    has_conflict,
                }
            })
            .collect();

        tracing::info!(
            "Dependencies: {} edges between {} items, {} cycles, max depth {}",
            edges.len(),
            participating.len(),
            cycles.len(),
            chains.max_depth
        );
        if !dangling_links.is_empty() {
            tracing::debug!("{} links point outside the item set", dangling_links.len());
        }

        DependencyGraph {
            node_count: participating.len(),
            edges,
            cycles,
            cyclic_keys: cyclic.iter().map(|n| nodes.key(*n).to_string()).collect(),
            roots,
            leaves,
            max_depth: chains.max_depth,
            depths: chains
                .depths
                .iter()
                .map(|(n, depth)| (nodes.key(*n).to_string(), *depth))
                .collect(),
            critical_path: chains.path.iter().map(|n| nodes.key(*n).to_string()).collect(),
            dangling_links,
        }
    }
}

/// Items addressed by position in key order
struct NodeIndex<'a> {
    items: Vec<&'a WorkItem>,
    by_key: BTreeMap<&'a str, usize>,
}

impl<'a> NodeIndex<'a> {
    fn new(items: &'a [WorkItem]) -> Self {
        let mut unique: BTreeMap<&'a str, &'a WorkItem> = BTreeMap::new();
        for item in items {
            unique.entry(item.key.as_str()).or_insert(item);
        }
        let by_key = unique.keys().enumerate().map(|(i, key)| (*key, i)).collect();
        Self {
            items: unique.into_values().collect(),
            by_key,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn key(&self, index: usize) -> &'a str {
        self.items[index].key.as_str()
    }

    fn item(&self, index: usize) -> &'a WorkItem {
        self.items[index]
    }

    /// Blocker-to-blocked pairs from both link fields, plus unresolved links
    fn links(&self, items: &'a [WorkItem]) -> (BTreeSet<(usize, usize)>, Vec<DanglingLink>) {
        let mut links = BTreeSet::new();
        let mut dangling = BTreeSet::new();

        for item in items {
            let Some(&this) = self.by_key.get(item.key.as_str()) else {
                continue;
            };
            for (targets, direction) in [
                (&item.blocks, LinkDirection::Blocks),
                (&item.blocked_by, LinkDirection::BlockedBy),
            ] {
                for target in targets {
                    match self.by_key.get(target.as_str()) {
                        Some(&other) => {
                            links.insert(match direction {
                                LinkDirection::Blocks => (this, other),
                                LinkDirection::BlockedBy => (other, this),
                            });
                        }
                        None => {
                            dangling.insert(DanglingLink {
                                from: item.key.clone(),
                                missing: target.clone(),
                                direction,
                            });
                        }
                    }
                }
            }
        }

        (links, dangling.into_iter().collect())
    }
}

/// Nodes in a non-trivial strongly connected component or with a self-loop
fn cyclic_nodes(graph: &DiGraphMap<usize, ()>) -> BTreeSet<usize> {
    tarjan_scc(graph)
        .into_iter()
        .filter(|component| component.len() > 1 || graph.contains_edge(component[0], component[0]))
        .flatten()
        .collect()
}

/// Longest blocker chains over the acyclic part of the graph
struct Chains {
    depths: BTreeMap<usize, u32>,
    max_depth: u32,
    path: Vec<usize>,
}

impl Chains {
    fn compute(
        graph: &DiGraphMap<usize, ()>,
        participating: &[usize],
        cyclic: &BTreeSet<usize>,
    ) -> Self {
        let mut acyclic: DiGraphMap<usize, ()> = DiGraphMap::new();
        for &node in participating.iter().filter(|n| !cyclic.contains(*n)) {
            acyclic.add_node(node);
        }
        for (from, to, _) in graph.all_edges() {
            if acyclic.contains_node(from) && acyclic.contains_node(to) {
                acyclic.add_edge(from, to, ());
            }
        }

        let order = match toposort(&acyclic, None) {
            Ok(order) => order,
            Err(cycle) => {
                tracing::warn!(
                    "Unexpected cycle at node {} after removing cyclic items",
                    cycle.node_id()
                );
                Vec::new()
            }
        };

        let mut depths: BTreeMap<usize, u32> = BTreeMap::new();
        let mut previous: BTreeMap<usize, usize> = BTreeMap::new();
        for node in order {
            let mut blockers: Vec<usize> =
                acyclic.neighbors_directed(node, Direction::Incoming).collect();
            blockers.sort_unstable();

            let mut depth = 0;
            for blocker in blockers {
                let candidate = depths.get(&blocker).map_or(0, |d| d + 1);
                if candidate > depth {
                    depth = candidate;
                    previous.insert(node, blocker);
                }
            }
            depths.insert(node, depth);
        }

        let deepest = depths
            .iter()
            .fold(None, |best: Option<(usize, u32)>, (&node, &depth)| match best {
                Some((_, top)) if top >= depth => best,
                _ => Some((node, depth)),
            });

        let (max_depth, path) = match deepest {
            Some((node, depth)) if depth > 0 => {
                let mut path = vec![node];
                let mut current = node;
                while let Some(&blocker) = previous.get(&current) {
                    path.push(blocker);
                    current = blocker;
                }
                path.reverse();
                (depth, path)
            }
            _ => (0, Vec::new()),
        };

        Self {
            depths,
            max_depth,
            path,
        }
    }
}
