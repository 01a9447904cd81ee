//! Process graph reconstruction.
//!
//! [`ProcessGraphBuilder`] turns a flat record collection into processes:
//!
//! 1. **Classification**: a record whose resolved operation is a real
//!    operation is a process-start candidate; `measurement` records are
//!    measurements; everything else is a continuation.
//! 2. **Boundaries**: every candidate is its own process (the union rule),
//!    except a harvest that closes its parent process, which is absorbed as
//!    that process's end.
//! 3. **Ends**: a process ends at its earliest direct child candidate
//!    (ties broken by input order). More than one such child is a split.
//! 4. **Measurements**: attached to the process of their nearest candidate
//!    ancestor; without one they are orphaned and dropped.
//! 5. **Parents and layout**: a process's parent is the process of its
//!    nearest candidate ancestor; coordinates come from [`crate::layout`].
//!
//! Building never fails. Data-quality conditions are reported as `debug`
//! events and resolved as [`LineageIndex`] resolves them.

use std::collections::HashMap;

use tracing::{debug, trace};

use culture_types::{
    Edge, ProcessGraph, ProcessId, ProcessNode, ProcessStatus, Position, StateId, StateRecord,
};

use crate::config::{LayoutConfig, TrackerConfig};
use crate::layout;
use crate::lineage::{LineageIndex, LineageIssue};

/// Builds [`ProcessGraph`]s from record snapshots.
#[derive(Debug, Clone, Default)]
pub struct ProcessGraphBuilder {
    layout: LayoutConfig,
    selected: Option<StateId>,
}

impl ProcessGraphBuilder {
    /// A builder with the given layout spacing.
    pub const fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            selected: None,
        }
    }

    /// A builder using the layout section of a loaded config.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.layout.clone())
    }

    /// Mark the process containing `selected` for display emphasis.
    #[must_use]
    pub const fn with_selected(mut self, selected: Option<StateId>) -> Self {
        self.selected = selected;
        self
    }

    /// Reconstruct the process graph of a record collection.
    pub fn build(&self, records: &[StateRecord]) -> ProcessGraph {
        let index = LineageIndex::new(records);
        report_issues(&index);

        let candidates: Vec<&StateRecord> = index
            .records()
            .filter(|record| record.is_process_start())
            .collect();
        let successors: HashMap<StateId, Successors<'_>> = candidates
            .iter()
            .map(|start| (start.id, successors_of(&index, start)))
            .collect();
        let absorbed = absorbed_ends(&index, &candidates, &successors);
        let starts_above = nearest_starts(&index);

        let mut nodes: Vec<ProcessNode> = candidates
            .iter()
            .filter(|start| !absorbed.contains_key(&start.id))
            .map(|start| {
                let next = successors.get(&start.id).copied().unwrap_or_default();
                let end_state = next.first.cloned();
                let status = if end_state.is_some() || start.is_terminal() {
                    ProcessStatus::Completed
                } else {
                    ProcessStatus::Open
                };
                ProcessNode {
                    id: ProcessId::from(start.id),
                    start_state: (*start).clone(),
                    end_state,
                    status,
                    measurements: Vec::new(),
                    position: Position::default(),
                    parent_process_id: owning_process(&starts_above, &absorbed, start.id),
                    successor_count: next.count,
                    selected: false,
                }
            })
            .collect();

        let slots: HashMap<ProcessId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.id, slot))
            .collect();

        for measurement in index.records().filter(|record| record.is_measurement()) {
            let node = owning_process(&starts_above, &absorbed, measurement.id)
                .and_then(|process| slots.get(&process).copied())
                .and_then(|slot| nodes.get_mut(slot));
            match node {
                Some(node) => node.measurements.push(measurement.clone()),
                None => debug!(state = %measurement.id, "measurement has no process ancestor, dropped"),
            }
        }

        if let Some(selected) = self.selected {
            for node in &mut nodes {
                node.selected = contains_state(node, selected);
            }
        }

        layout::assign_positions(&mut nodes, &self.layout);

        let edges: Vec<Edge> = nodes
            .iter()
            .filter_map(|node| {
                node.parent_process_id
                    .map(|parent| Edge::between(parent, node.id))
            })
            .collect();

        debug!(
            records = records.len(),
            processes = nodes.len(),
            edges = edges.len(),
            absorbed = absorbed.len(),
            "process graph built"
        );

        ProcessGraph { nodes, edges }
    }
}

/// Build with default layout and an optional selection.
pub fn build_process_graph(records: &[StateRecord], selected: Option<StateId>) -> ProcessGraph {
    ProcessGraphBuilder::default()
        .with_selected(selected)
        .build(records)
}

/// Direct successor operations of a process start.
#[derive(Debug, Clone, Copy, Default)]
struct Successors<'a> {
    /// The earliest successor, which ends the process.
    first: Option<&'a StateRecord>,
    /// How many successors exist.
    count: u32,
}

fn successors_of<'a>(index: &LineageIndex<'a>, start: &StateRecord) -> Successors<'a> {
    let mut children: Vec<&'a StateRecord> = index
        .traversal_children(start.id)
        .filter(|child| child.is_process_start())
        .collect();
    // Stable: equal timestamps keep input order.
    children.sort_by_key(|child| child.timestamp);
    Successors {
        first: children.first().copied(),
        count: u32::try_from(children.len()).unwrap_or(u32::MAX),
    }
}

/// Harvests that end their parent process, mapped to that parent.
///
/// Candidates are visited shallowest first so a harvest is only absorbed by
/// a parent that is itself a process node.
fn absorbed_ends(
    index: &LineageIndex<'_>,
    candidates: &[&StateRecord],
    successors: &HashMap<StateId, Successors<'_>>,
) -> HashMap<StateId, StateId> {
    let generations = index.generations();
    let mut ordered: Vec<(usize, &StateRecord)> = candidates
        .iter()
        .map(|record| (generations.get(&record.id).copied().unwrap_or_default(), *record))
        .collect();
    ordered.sort_by_key(|(generation, _)| *generation);

    let mut absorbed = HashMap::new();
    for (_, record) in ordered {
        if !record.is_terminal() {
            continue;
        }
        let Some(parent) = index.parent(record.id) else {
            continue;
        };
        let ends_parent = !absorbed.contains_key(&parent.id)
            && successors
                .get(&parent.id)
                .and_then(|next| next.first)
                .is_some_and(|end| end.id == record.id);
        if ends_parent {
            trace!(harvest = %record.id, process = %parent.id, "harvest absorbed as process end");
            absorbed.insert(record.id, parent.id);
        }
    }
    absorbed
}

/// Nearest candidate strictly above each record, filled in one top-down pass.
fn nearest_starts(index: &LineageIndex<'_>) -> HashMap<StateId, StateId> {
    let mut above = HashMap::with_capacity(index.len());
    for record in index.top_down() {
        let Some(parent) = index.parent(record.id) else {
            continue;
        };
        let start = if parent.is_process_start() {
            Some(parent.id)
        } else {
            above.get(&parent.id).copied()
        };
        if let Some(start) = start {
            above.insert(record.id, start);
        }
    }
    above
}

/// Process owning the nearest candidate strictly above `id`.
fn owning_process(
    starts_above: &HashMap<StateId, StateId>,
    absorbed: &HashMap<StateId, StateId>,
    id: StateId,
) -> Option<ProcessId> {
    let ancestor = starts_above.get(&id).copied()?;
    let start = absorbed.get(&ancestor).copied().unwrap_or(ancestor);
    Some(ProcessId::from(start))
}

fn contains_state(node: &ProcessNode, id: StateId) -> bool {
    node.start_state.id == id
        || node.end_state.as_ref().is_some_and(|end| end.id == id)
        || node.measurements.iter().any(|m| m.id == id)
}

fn report_issues(index: &LineageIndex<'_>) {
    for issue in index.issues() {
        match issue {
            LineageIssue::DuplicateId { id } => {
                debug!(state = %id, "duplicate state id, keeping first record");
            }
            LineageIssue::DanglingParent { id, parent } => {
                debug!(state = %id, %parent, "parent not found, treating state as root");
            }
            LineageIssue::CycleMember { id } => {
                debug!(state = %id, "state is on a parent cycle, treating as root");
            }
            LineageIssue::HarvestedParent { parent, child } => {
                debug!(%parent, %child, "operation recorded under a harvested state");
            }
        }
    }
}
