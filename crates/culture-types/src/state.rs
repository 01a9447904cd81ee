//! The state record: one point-in-time snapshot of a culture.
//!
//! A record is created once with immutable core fields (`id`, `parent_id`,
//! `timestamp`, operation type). Only [`StateRecord::parameters`] and
//! [`StateRecord::additional_notes`] are patched afterwards, e.g. to backfill
//! a computed doubling time.
//!
//! Parameters are stored in two levels: top-level values and a nested
//! `operation_parameters` map holding fields specific to the operation
//! (parent end density, vial count, ...). [`Parameters::flatten`] merges the
//! two with a single documented precedence rule.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::enums::OperationType;
use crate::ids::StateId;

/// Well-known parameter keys read by the core.
pub mod keys {
    /// Legacy location of the operation type inside `parameters`.
    pub const OPERATION_TYPE: &str = "operation_type";
    /// Initial cell density of the state.
    pub const CELL_DENSITY: &str = "cell_density";
    /// Density reached at the end of a process (harvest).
    pub const END_DENSITY: &str = "end_density";
    /// Density the parent reached before this operation.
    pub const PARENT_END_DENSITY: &str = "parent_end_density";
    /// Hypothesized growth rate (per hour).
    pub const GROWTH_RATE: &str = "growth_rate";
    /// Hypothesized doubling time (hours).
    pub const DOUBLING_TIME: &str = "doubling_time";
    /// Hypothesized density limit (carrying capacity).
    pub const DENSITY_LIMIT: &str = "density_limit";
    /// Doubling time measured from observed densities (hours).
    pub const MEASURED_DOUBLING_TIME: &str = "measured_doubling_time";
    /// Growth rate measured from observed densities (per hour).
    pub const MEASURED_GROWTH_RATE: &str = "measured_growth_rate";
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Two-level parameter mapping of a state record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Operation-specific fields (`operationParameters` on older clients).
    #[serde(
        default,
        alias = "operationParameters",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub operation_parameters: BTreeMap<String, Value>,

    /// Top-level named measurements and settings.
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl Parameters {
    /// Merge both levels into one mapping.
    ///
    /// Nested operation parameters are laid down first; a top-level value
    /// then wins unless it is empty (`null` or a blank string), in which case
    /// the nested value, if any, is kept.
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        let mut merged = self.operation_parameters.clone();
        for (key, value) in &self.values {
            if !is_empty_value(value) || !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Look up a single key with the same precedence as [`Self::flatten`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.values.get(key) {
            Some(top) if !is_empty_value(top) => Some(top),
            top => self.operation_parameters.get(key).or(top),
        }
    }

    /// Read a merged value as a number.
    ///
    /// Accepts JSON numbers and numeric strings (form inputs arrive as
    /// strings). Non-finite values are rejected.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_as_f64)
    }

    /// Read a value from the nested operation parameters only.
    pub fn operation_number(&self, key: &str) -> Option<f64> {
        self.operation_parameters.get(key).and_then(value_as_f64)
    }

    /// Set a top-level value, replacing any previous one.
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_owned(), value);
    }
}

/// Whether a parameter value counts as empty for merge precedence.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Interpret a JSON value as a finite number.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

// ---------------------------------------------------------------------------
// StateRecord
// ---------------------------------------------------------------------------

/// A timestamped node in the culture lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateRecord {
    /// Unique id assigned at creation.
    pub id: StateId,

    /// Parent record; `None` marks a root.
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<StateId>,

    /// When the state was recorded.
    #[serde(with = "crate::timestamp")]
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,

    /// Optional human label.
    #[serde(default)]
    pub name: Option<String>,

    /// The operation this record documents.
    #[serde(default, alias = "operationType")]
    pub operation_type: Option<OperationType>,

    /// Legacy free-form operation tag from the transition-based schema.
    #[serde(default, alias = "transitionType", skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<String>,

    /// Named measurements plus nested operation parameters.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub parameters: Parameters,

    /// Free-text notes.
    #[serde(default, alias = "additionalNotes")]
    pub additional_notes: Option<String>,
}

impl StateRecord {
    /// Create a bare record with no operation type and no parameters.
    pub fn new(id: StateId, parent_id: Option<StateId>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            parent_id,
            timestamp,
            name: None,
            operation_type: None,
            transition_type: None,
            parameters: Parameters::default(),
            additional_notes: None,
        }
    }

    /// Builder-style setter for the operation type.
    #[must_use]
    pub fn with_operation(mut self, operation: OperationType) -> Self {
        self.operation_type = Some(operation);
        self
    }

    /// Builder-style setter for the label.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Builder-style setter for a top-level parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: &str, value: Value) -> Self {
        self.parameters.set(key, value);
        self
    }

    /// Builder-style setter for a nested operation parameter.
    #[must_use]
    pub fn with_operation_parameter(mut self, key: &str, value: Value) -> Self {
        self.parameters
            .operation_parameters
            .insert(key.to_owned(), value);
        self
    }

    /// The effective operation type.
    ///
    /// Resolution order: the `operation_type` field, then the legacy
    /// `transition_type` tag, then an `operation_type` entry inside the
    /// parameters. [`OperationType::None`] and unknown legacy tags resolve to
    /// `None` (unclassified).
    pub fn operation(&self) -> Option<OperationType> {
        let resolved = self.operation_type.or_else(|| {
            self.transition_type
                .as_deref()
                .and_then(OperationType::parse)
                .or_else(|| {
                    self.parameters
                        .get(keys::OPERATION_TYPE)
                        .and_then(Value::as_str)
                        .and_then(OperationType::parse)
                })
        })?;
        (resolved != OperationType::None).then_some(resolved)
    }

    /// Whether this record starts a process.
    pub fn is_process_start(&self) -> bool {
        self.operation().is_some_and(OperationType::is_process_start)
    }

    /// Whether this record is a measurement.
    pub fn is_measurement(&self) -> bool {
        self.operation().is_some_and(OperationType::is_measurement)
    }

    /// Whether no further operation may follow this record.
    pub fn is_terminal(&self) -> bool {
        self.operation().is_some_and(OperationType::is_terminal)
    }

    /// Display label: the name if non-blank, else `State {id}`.
    pub fn label(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => format!("State {}", self.id),
        }
    }

    /// Merged parameter view, see [`Parameters::flatten`].
    pub fn flattened_parameters(&self) -> BTreeMap<String, Value> {
        self.parameters.flatten()
    }
}
