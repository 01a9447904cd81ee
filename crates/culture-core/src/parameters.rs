//! Catalogue of known state parameters and which operations they apply to.
//!
//! Forms use this to decide which inputs to show for a given operation.
//! Keys outside the catalogue are still stored; they are simply never
//! offered.

use serde::Serialize;

use culture_types::OperationType;

/// Metadata of one known parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    /// Key inside a record's parameters.
    pub key: &'static str,
    /// Label shown next to the input.
    pub display_name: &'static str,
    /// Whether the parameter applies to records with no operation.
    pub applicable_to_all_nodes: bool,
}

const fn entry(key: &'static str, display_name: &'static str, all: bool) -> ParameterSpec {
    ParameterSpec {
        key,
        display_name,
        applicable_to_all_nodes: all,
    }
}

/// Every known parameter, in display order.
pub const CATALOGUE: &[ParameterSpec] = &[
    entry("temperature_c", "Temperature (°C)", true),
    entry("volume_ml", "Volume (ml)", true),
    entry("location", "Location", true),
    entry("cell_density", "Initial Cell Density", true),
    entry("start_viability", "Start Viability (%)", false),
    entry("parent_end_viability", "Parent End Viability (%)", false),
    entry("growth_rate", "Hypothesized Growth Rate", true),
    entry("doubling_time", "Hypothesized Doubling Time", true),
    entry("density_limit", "Hypothesized Density Limit", true),
    entry("measured_doubling_time", "Measured Doubling Time", true),
    entry("cell_type", "Cell Type", true),
    entry("parent_end_density", "Parent End Density", false),
    entry("number_of_vials", "Number of Vials", false),
    entry("total_cells", "Total Cells", false),
    entry("number_of_passages", "Number of Passages", false),
    entry("end_density", "End Density", false),
    entry("measured_value", "Measured Value", false),
    entry("operation_type", "Operation Type", true),
];

/// Parameter keys offered for an operation, in form order.
pub const fn operation_parameters(operation: OperationType) -> &'static [&'static str] {
    match operation {
        OperationType::StartNewCulture => &[
            "temperature_c",
            "volume_ml",
            "location",
            "cell_density",
            "start_viability",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "cell_type",
            "operation_type",
        ],
        OperationType::Passage => &[
            "temperature_c",
            "volume_ml",
            "location",
            "cell_density",
            "start_viability",
            "parent_end_viability",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "parent_end_density",
            "cell_type",
            "operation_type",
        ],
        OperationType::Freeze => &[
            "temperature_c",
            "volume_ml",
            "location",
            "cell_density",
            "parent_end_viability",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "parent_end_density",
            "number_of_vials",
            "total_cells",
            "cell_type",
            "operation_type",
        ],
        OperationType::Thaw => &[
            "temperature_c",
            "volume_ml",
            "location",
            "cell_density",
            "start_viability",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "number_of_passages",
            "cell_type",
            "operation_type",
        ],
        OperationType::Measurement => &[
            "temperature_c",
            "volume_ml",
            "location",
            "cell_density",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "measured_value",
            "cell_type",
            "operation_type",
        ],
        OperationType::Split => &[
            "temperature_c",
            "volume_ml",
            "location",
            "cell_density",
            "parent_end_viability",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "parent_end_density",
            "cell_type",
            "operation_type",
        ],
        OperationType::Harvest => &[
            "temperature_c",
            "volume_ml",
            "location",
            "parent_end_viability",
            "growth_rate",
            "doubling_time",
            "density_limit",
            "measured_doubling_time",
            "end_density",
            "cell_type",
            "operation_type",
        ],
        OperationType::None => &[],
    }
}

/// Catalogue entry for a key.
pub fn lookup(key: &str) -> Option<&'static ParameterSpec> {
    CATALOGUE.iter().find(|entry| entry.key == key)
}

/// Display label for a key, falling back to the key itself.
pub fn display_name(key: &str) -> &str {
    lookup(key).map_or(key, |entry| entry.display_name)
}

/// Whether a parameter is offered for an operation.
///
/// Without an operation only parameters applicable to all nodes apply.
pub fn is_parameter_applicable(key: &str, operation: Option<OperationType>) -> bool {
    match operation.filter(|op| *op != OperationType::None) {
        Some(op) => operation_parameters(op).iter().any(|known| *known == key),
        None => lookup(key).is_some_and(|entry| entry.applicable_to_all_nodes),
    }
}

/// Parameter keys to offer, in form order.
pub fn applicable_parameters(operation: Option<OperationType>) -> Vec<&'static str> {
    match operation.filter(|op| *op != OperationType::None) {
        Some(op) => operation_parameters(op).to_vec(),
        None => CATALOGUE
            .iter()
            .filter(|entry| entry.applicable_to_all_nodes)
            .map(|entry| entry.key)
            .collect(),
    }
}
