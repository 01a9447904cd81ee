//! Display adapters over a built [`ProcessGraph`].
//!
//! - [`to_tree`]: a strict single-root tree for dendrogram views.
//! - [`to_flow`]: a multi-root DAG with string ids for flow views.

use std::collections::{HashMap, HashSet};

use culture_types::{
    FlowEdge, FlowGraph, FlowNode, FlowNodeData, ProcessGraph, ProcessId, ProcessNode,
    ProcessStatus, TreeNode,
};

/// Name of the synthetic root used when a graph has zero or several roots.
pub const SYNTHETIC_ROOT_NAME: &str = "Cultures";

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Convert a process graph into a single-root tree.
///
/// With exactly one root process that process is the tree root. Otherwise
/// every root hangs below a synthetic node named [`SYNTHETIC_ROOT_NAME`].
/// Processes whose parent is not in the graph count as roots.
pub fn to_tree(graph: &ProcessGraph) -> TreeNode {
    let slots: HashMap<ProcessId, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(slot, node)| (node.id, slot))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes.len()];
    let mut roots = Vec::new();
    for (slot, node) in graph.nodes.iter().enumerate() {
        match node.parent_process_id.and_then(|p| slots.get(&p).copied()) {
            Some(parent) if parent != slot => {
                if let Some(list) = children.get_mut(parent) {
                    list.push(slot);
                }
            }
            _ => roots.push(slot),
        }
    }

    // Pre-order from the roots; building in reverse guarantees children are
    // finished before their parent.
    let mut order = Vec::with_capacity(graph.nodes.len());
    let mut visited = HashSet::new();
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(slot) = stack.pop() {
        if !visited.insert(slot) {
            continue;
        }
        order.push(slot);
        for child in children.get(slot).into_iter().flatten().rev() {
            stack.push(*child);
        }
    }

    let mut built: Vec<Option<TreeNode>> = vec![None; graph.nodes.len()];
    for slot in order.into_iter().rev() {
        let Some(node) = graph.nodes.get(slot) else {
            continue;
        };
        let subtree: Vec<TreeNode> = children
            .get(slot)
            .into_iter()
            .flatten()
            .filter_map(|child| built.get_mut(*child).and_then(Option::take))
            .collect();
        if let Some(entry) = built.get_mut(slot) {
            *entry = Some(tree_node(node, subtree));
        }
    }

    let mut top: Vec<TreeNode> = roots
        .iter()
        .filter_map(|slot| built.get_mut(*slot).and_then(Option::take))
        .collect();

    if top.len() == 1
        && let Some(root) = top.pop()
    {
        return root;
    }

    TreeNode {
        process: None,
        name: SYNTHETIC_ROOT_NAME.to_owned(),
        status: ProcessStatus::Open,
        measurement_count: 0,
        children: top,
    }
}

fn tree_node(node: &ProcessNode, children: Vec<TreeNode>) -> TreeNode {
    TreeNode {
        process: Some(node.id),
        name: node.start_state.label(),
        status: node.status,
        measurement_count: count(node.measurements.len()),
        children,
    }
}

/// Convert a process graph into a flow graph.
///
/// Edges into open processes are marked `animated`.
pub fn to_flow(graph: &ProcessGraph) -> FlowGraph {
    let status: HashMap<ProcessId, ProcessStatus> = graph
        .nodes
        .iter()
        .map(|node| (node.id, node.status))
        .collect();

    let nodes = graph
        .nodes
        .iter()
        .map(|node| FlowNode {
            id: node.id.to_string(),
            position: node.position,
            data: FlowNodeData {
                label: node.start_state.label(),
                operation: node
                    .start_state
                    .operation()
                    .map_or("none", |op| op.as_str())
                    .to_owned(),
                status: node.status,
                measurement_count: count(node.measurements.len()),
                selected: node.selected,
            },
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| FlowEdge {
            id: edge.id.clone(),
            source: edge.source_process_id.to_string(),
            target: edge.target_process_id.to_string(),
            animated: status.get(&edge.target_process_id) == Some(&ProcessStatus::Open),
        })
        .collect();

    FlowGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use culture_types::{OperationType, StateId, StateRecord};

    use super::*;
    use crate::process::build_process_graph;

    fn record(id: i64, parent: Option<i64>, op: OperationType) -> StateRecord {
        let base = Utc
            .with_ymd_and_hms(2024, 4, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        StateRecord::new(StateId(id), parent.map(StateId), base + Duration::hours(id))
            .with_operation(op)
    }

    #[test]
    fn single_root_becomes_tree_root() {
        let records = vec![
            record(1, None, OperationType::StartNewCulture).with_name("HEK293"),
            record(2, Some(1), OperationType::Passage),
            record(3, Some(2), OperationType::Freeze),
            record(4, Some(1), OperationType::Split),
        ];
        let tree = to_tree(&build_process_graph(&records, None));

        assert_eq!(tree.process, Some(ProcessId(1)));
        assert_eq!(tree.name, "HEK293");
        let child_ids: Vec<Option<ProcessId>> = tree.children.iter().map(|c| c.process).collect();
        assert_eq!(child_ids, vec![Some(ProcessId(2)), Some(ProcessId(4))]);
        let grandchild = tree
            .children
            .first()
            .and_then(|c| c.children.first())
            .and_then(|c| c.process);
        assert_eq!(grandchild, Some(ProcessId(3)));
    }

    #[test]
    fn several_roots_get_a_synthetic_parent() {
        let records = vec![
            record(1, None, OperationType::Passage),
            record(2, None, OperationType::Thaw),
        ];
        let tree = to_tree(&build_process_graph(&records, None));
        assert_eq!(tree.process, None);
        assert_eq!(tree.name, SYNTHETIC_ROOT_NAME);
        assert_eq!(tree.children.len(), 2);
    }

    #[test]
    fn empty_graph_yields_empty_synthetic_root() {
        let tree = to_tree(&ProcessGraph::default());
        assert_eq!(tree.process, None);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn flow_uses_string_ids_and_animates_open_targets() {
        let records = vec![
            record(1, None, OperationType::Passage),
            record(2, Some(1), OperationType::Passage),
            record(3, Some(2), OperationType::Measurement),
        ];
        let flow = to_flow(&build_process_graph(&records, None));

        let ids: Vec<&str> = flow.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(flow.edges.len(), 1);
        let edge = flow.edges.first();
        assert!(edge.is_some_and(|e| e.id == "e1-2" && e.source == "1" && e.animated));
        let open = flow.nodes.get(1);
        assert!(open.is_some_and(|n| n.data.measurement_count == 1 && n.data.operation == "passage"));
    }
}
