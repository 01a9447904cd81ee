//! Shared type definitions for the culture lineage tracker.
//!
//! This crate is the single source of truth for the record model and for
//! the shapes the core hands to its collaborators. Output types flow
//! downstream to `TypeScript` via `ts-rs` for the lineage views.
//!
//! # Modules
//!
//! - [`ids`] -- Integer id wrappers for states and processes
//! - [`enums`] -- Operation types and process status
//! - [`state`] -- The [`StateRecord`] model and its two-level parameters
//! - [`graph`] -- Process graph, tree, and flow export shapes
//! - [`timestamp`] -- Timestamp parsing for every accepted layout

pub mod enums;
pub mod graph;
pub mod ids;
pub mod state;
pub mod timestamp;

// Re-export all public types at crate root for convenience.
pub use enums::{OperationType, ProcessStatus};
pub use graph::{
    Edge, FlowEdge, FlowGraph, FlowNode, FlowNodeData, Position, ProcessGraph, ProcessNode,
    TreeNode,
};
pub use ids::{ProcessId, StateId};
pub use state::{Parameters, StateRecord, keys, value_as_f64};
pub use timestamp::{TimestampError, parse_timestamp};
