//! Output shapes of the process-graph builder and its export adapters.
//!
//! These are consumed by the rendering collaborator, so every type is
//! serializable and exported to `TypeScript`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ProcessStatus;
use crate::ids::ProcessId;
use crate::state::StateRecord;

// ---------------------------------------------------------------------------
// Process graph
// ---------------------------------------------------------------------------

/// Layout coordinates of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate (grows with rank).
    pub x: f64,
    /// Vertical coordinate (grows with slot inside a rank).
    pub y: f64,
}

/// One derived process: a start operation, its optional terminating
/// successor, and the measurements taken while it ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProcessNode {
    /// Process id (the start state's id).
    pub id: ProcessId,
    /// The record that started the process.
    pub start_state: StateRecord,
    /// The nearest successor operation, if any.
    pub end_state: Option<StateRecord>,
    /// `open` while no successor exists.
    pub status: ProcessStatus,
    /// Measurements whose nearest process-start ancestor is this process.
    pub measurements: Vec<StateRecord>,
    /// Deterministic layout coordinates.
    pub position: Position,
    /// Parent process in the display graph; `None` for roots.
    pub parent_process_id: Option<ProcessId>,
    /// Number of direct successor operations (more than one on a split).
    pub successor_count: u32,
    /// Whether the caller's selected record belongs to this process.
    pub selected: bool,
}

/// A parent-to-child link between two processes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Edge {
    /// Stable edge id, `e{source}-{target}`.
    pub id: String,
    /// Parent process.
    pub source_process_id: ProcessId,
    /// Child process.
    pub target_process_id: ProcessId,
}

impl Edge {
    /// Create an edge with the canonical id.
    pub fn between(source: ProcessId, target: ProcessId) -> Self {
        Self {
            id: format!("e{source}-{target}"),
            source_process_id: source,
            target_process_id: target,
        }
    }
}

/// The builder's complete output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProcessGraph {
    /// Processes in insertion order.
    pub nodes: Vec<ProcessNode>,
    /// Parent-to-child links in node order.
    pub edges: Vec<Edge>,
}

impl ProcessGraph {
    /// Look up a node by process id.
    pub fn node(&self, id: ProcessId) -> Option<&ProcessNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Processes with no parent process.
    pub fn roots(&self) -> impl Iterator<Item = &ProcessNode> {
        self.nodes
            .iter()
            .filter(|node| node.parent_process_id.is_none())
    }
}

// ---------------------------------------------------------------------------
// Tree export (dendrogram-style display)
// ---------------------------------------------------------------------------

/// A node of the strict single-root tree export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TreeNode {
    /// The process this node stands for; `None` for the synthetic root.
    pub process: Option<ProcessId>,
    /// Display label.
    pub name: String,
    /// Process status; the synthetic root reports `open`.
    pub status: ProcessStatus,
    /// Number of measurements attached to the process.
    pub measurement_count: u32,
    /// Child processes in node order.
    pub children: Vec<TreeNode>,
}

// ---------------------------------------------------------------------------
// Flow export (multi-root DAG display)
// ---------------------------------------------------------------------------

/// Display payload of a flow node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowNodeData {
    /// Display label of the start state.
    pub label: String,
    /// Operation name of the start state.
    pub operation: String,
    /// Process status.
    pub status: ProcessStatus,
    /// Number of measurements attached to the process.
    pub measurement_count: u32,
    /// Whether the node is emphasized.
    pub selected: bool,
}

/// A node of the flow export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowNode {
    /// String form of the process id.
    pub id: String,
    /// Layout coordinates.
    pub position: Position,
    /// Display payload.
    pub data: FlowNodeData,
}

/// An edge of the flow export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowEdge {
    /// Edge id.
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Edges into open (ongoing) processes are animated.
    pub animated: bool,
}

/// Multi-root DAG export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlowGraph {
    /// Nodes in process order.
    pub nodes: Vec<FlowNode>,
    /// Edges in process order.
    pub edges: Vec<FlowEdge>,
}
