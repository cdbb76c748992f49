//! Cycle search
//!
//! Johnson's elementary-circuit enumeration. Start nodes are taken in index
//! order; each search is confined to the strongly connected component of the
//! least remaining node that still holds a cycle. The circuit search and the
//! unblock cascade both run on explicit stacks so deep graphs cannot
//! overflow the call stack.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::BTreeSet;

/// Distinct elementary cycles in a graph given as an adjacency list over `0..n`
///
/// Every cycle is reported once, starting from its smallest node, with
/// neighbors followed in the order given. A self-edge is a cycle of one.
/// Neighbor indices outside `0..n` are ignored.
#[must_use]
pub fn find_cycles(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut search = CircuitSearch::new(adjacency);
    let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut cycles = Vec::new();

    let mut from = 0;
    while let Some((start, component)) = least_cyclic_component(adjacency, from) {
        for cycle in search.circuits_from(start, &component) {
            if seen.insert(canonical(&cycle)) {
                cycles.push(cycle);
            }
        }
        from = start + 1;
    }

    cycles
}

/// Component holding the smallest node `>= from` that lies on a cycle of the
/// subgraph induced by nodes `>= from`
fn least_cyclic_component(adjacency: &[Vec<usize>], from: usize) -> Option<(usize, Vec<usize>)> {
    let n = adjacency.len();
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (node, neighbors) in adjacency.iter().enumerate().skip(from) {
        graph.add_node(node);
        for &neighbor in neighbors.iter().filter(|&&w| w >= from && w < n) {
            graph.add_edge(node, neighbor, ());
        }
    }

    tarjan_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1 || graph.contains_edge(component[0], component[0]))
        .filter_map(|component| {
            let least = *component.iter().min()?;
            Some((least, component))
        })
        .min_by_key(|(least, _)| *least)
}

struct Frame {
    node: usize,
    next: usize,
    closed: bool,
}

/// Reusable blocked-set state for circuit searches
struct CircuitSearch<'a> {
    adjacency: &'a [Vec<usize>],
    member: Vec<bool>,
    blocked: Vec<bool>,
    blocked_by: Vec<BTreeSet<usize>>,
}

impl<'a> CircuitSearch<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            member: vec![false; n],
            blocked: vec![false; n],
            blocked_by: vec![BTreeSet::new(); n],
        }
    }

    /// Every elementary circuit through `start` inside `component`
    fn circuits_from(&mut self, start: usize, component: &[usize]) -> Vec<Vec<usize>> {
        for &node in component {
            self.member[node] = true;
            self.blocked[node] = false;
            self.blocked_by[node].clear();
        }

        let mut circuits = Vec::new();
        let mut path = vec![start];
        let mut frames = vec![Frame {
            node: start,
            next: 0,
            closed: false,
        }];
        self.blocked[start] = true;

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            if let Some(&neighbor) = self.adjacency[node].get(frame.next) {
                frame.next += 1;
                if neighbor >= self.member.len() || !self.member[neighbor] {
                    continue;
                }
                if neighbor == start {
                    circuits.push(path.clone());
                    frame.closed = true;
                } else if !self.blocked[neighbor] {
                    self.blocked[neighbor] = true;
                    path.push(neighbor);
                    frames.push(Frame {
                        node: neighbor,
                        next: 0,
                        closed: false,
                    });
                }
                continue;
            }

            let closed = frame.closed;
            frames.pop();
            path.pop();
            if closed {
                self.unblock(node);
            } else {
                for &neighbor in &self.adjacency[node] {
                    if neighbor < self.member.len() && self.member[neighbor] {
                        self.blocked_by[neighbor].insert(node);
                    }
                }
            }
            if let Some(parent) = frames.last_mut() {
                parent.closed |= closed;
            }
        }

        for &node in component {
            self.member[node] = false;
        }
        circuits
    }

    fn unblock(&mut self, node: usize) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if !self.blocked[current] {
                continue;
            }
            self.blocked[current] = false;
            pending.extend(std::mem::take(&mut self.blocked_by[current]));
        }
    }
}

/// Rotation starting at the smallest node
fn canonical(cycle: &[usize]) -> Vec<usize> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, node)| **node)
        .map_or(0, |(index, _)| index);
    let mut rotated = cycle[pivot..].to_vec();
    rotated.extend_from_slice(&cycle[..pivot]);
    rotated
}
