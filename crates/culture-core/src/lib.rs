//! Lineage inference and growth kinetics for cell-culture records.
//!
//! The core takes a snapshot of [`StateRecord`]s in any order, with no
//! guarantee of uniqueness or acyclicity, and derives processes, a display
//! graph, and growth figures from it. Everything here is a pure function of
//! its input except [`debounce`], which coalesces recomputation triggers at
//! the boundary.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `culture-config.yaml` into
//!   strongly-typed structs.
//! - [`lineage`] -- Cycle-safe ancestor, descendant, sibling, and
//!   generation queries over parent links.
//! - [`process`] -- [`ProcessGraphBuilder`]: classification, end
//!   resolution, measurement attachment, and parent edges.
//! - [`layout`] -- Deterministic rank/slot coordinates.
//! - [`export`] -- Tree and flow adapters for the rendering layer.
//! - [`kinetics`] -- Doubling time, density prediction, and population
//!   doublings.
//! - [`parameters`] -- Catalogue of known parameters per operation.
//! - [`debounce`] -- Per-call-site trailing debounce.
//! - [`error`] -- [`KineticsError`].
//!
//! [`StateRecord`]: culture_types::StateRecord
//! [`ProcessGraphBuilder`]: process::ProcessGraphBuilder
//! [`KineticsError`]: error::KineticsError

pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod kinetics;
pub mod layout;
pub mod lineage;
pub mod parameters;
pub mod process;

pub use config::{ConfigError, DebounceConfig, LayoutConfig, LoggingConfig, TrackerConfig};
pub use debounce::Debouncer;
pub use error::KineticsError;
pub use export::{to_flow, to_tree};
pub use kinetics::{
    DoublingTimeInput, GrowthEdit, GrowthModel, MeasuredGrowth, MeasurementOutcome,
    apply_growth_edit, doubling_time, doubling_time_from_records, doubling_time_from_scalars,
    measure_growth, measured_doubling_time, predicted_density,
};
pub use lineage::{LineageIndex, LineageIssue};
pub use process::{ProcessGraphBuilder, build_process_graph};
