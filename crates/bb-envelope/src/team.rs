//! Team health: assigned load per person against their capacity

use crate::envelope::Envelope;
use bb_model::{ResolvedCapacity, WorkItem, HOURS_EPSILON};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Load of one assignee over the analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLoad {
    /// Assignee name; `None` groups unassigned work
    pub assignee: Option<String>,
    /// Items assigned
    pub item_count: usize,
    /// Hours still owed on those items
    pub assigned_hours: f64,
    /// Member capacity over the window, when the configuration has a
    /// per-member figure
    pub capacity_hours: Option<f64>,
    /// `assigned_hours / capacity_hours` as a percentage
    pub utilization_percent: Option<f64>,
    /// Assigned hours exceed capacity
    pub overloaded: bool,
}

/// Per-assignee load, named members first (alphabetical), unassigned last
///
/// Configured members with nothing assigned are listed with zero load.
#[must_use]
pub fn team_health(
    items: &[WorkItem],
    capacity: &ResolvedCapacity,
    envelope: &Envelope,
) -> Vec<MemberLoad> {
    let mut assigned: BTreeMap<String, (usize, f64)> = capacity
        .members()
        .iter()
        .map(|m| (m.name.clone(), (0, 0.0)))
        .collect();
    let mut unassigned = (0usize, 0.0f64);

    for item in items {
        let slot = match &item.assignee {
            Some(name) => assigned.entry(name.clone()).or_insert((0, 0.0)),
            None => &mut unassigned,
        };
        slot.0 += 1;
        slot.1 += item.owed_hours();
    }

    let mut loads: Vec<MemberLoad> = assigned
        .into_iter()
        .map(|(name, (item_count, assigned_hours))| {
            let capacity_hours = member_capacity(capacity, envelope, &name);
            load(Some(name), item_count, assigned_hours, capacity_hours)
        })
        .collect();

    if unassigned.0 > 0 {
        loads.push(load(None, unassigned.0, unassigned.1, None));
    }

    loads
}

fn member_capacity(capacity: &ResolvedCapacity, envelope: &Envelope, name: &str) -> Option<f64> {
    envelope
        .days
        .iter()
        .filter_map(|bucket| capacity.member_hours_on(name, bucket.date))
        .fold(None, |total: Option<f64>, hours| Some(total.unwrap_or(0.0) + hours))
}

fn load(
    assignee: Option<String>,
    item_count: usize,
    assigned_hours: f64,
    capacity_hours: Option<f64>,
) -> MemberLoad {
    let utilization_percent = capacity_hours
        .filter(|c| *c > HOURS_EPSILON)
        .map(|c| assigned_hours / c * 100.0);
    let overloaded = match capacity_hours {
        Some(c) => assigned_hours > c + HOURS_EPSILON,
        None => false,
    };

    MemberLoad {
        assignee,
        item_count,
        assigned_hours,
        capacity_hours,
        utilization_percent,
        overloaded,
    }
}
