//! Enumeration types for the culture lineage tracker.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Operation types
// ---------------------------------------------------------------------------

/// The lab operation a state record documents.
///
/// Every variant except [`OperationType::Measurement`] and
/// [`OperationType::None`] marks a process boundary. The wire form is the
/// snake_case name (`start_new_culture`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum OperationType {
    /// A culture started from scratch (seeding).
    StartNewCulture,
    /// Cells transferred into fresh vessels/media.
    Passage,
    /// Cells cryopreserved into vials.
    Freeze,
    /// Cryopreserved cells revived.
    Thaw,
    /// One culture divided into several.
    Split,
    /// Cells collected; no further operations may follow.
    Harvest,
    /// A passive observation that does not start a process.
    Measurement,
    /// Explicitly unclassified; behaves like an absent type.
    None,
}

impl OperationType {
    /// All variants in declaration order.
    pub const ALL: [Self; 8] = [
        Self::StartNewCulture,
        Self::Passage,
        Self::Freeze,
        Self::Thaw,
        Self::Split,
        Self::Harvest,
        Self::Measurement,
        Self::None,
    ];

    /// The snake_case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartNewCulture => "start_new_culture",
            Self::Passage => "passage",
            Self::Freeze => "freeze",
            Self::Thaw => "thaw",
            Self::Split => "split",
            Self::Harvest => "harvest",
            Self::Measurement => "measurement",
            Self::None => "none",
        }
    }

    /// Parse a wire name, tolerating surrounding whitespace and case.
    ///
    /// Returns `None` for names outside the closed set (legacy tags such as
    /// `"seeding"` are treated as unclassified by callers).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
    }

    /// Whether a record of this type starts a new process.
    pub const fn is_process_start(self) -> bool {
        !matches!(self, Self::Measurement | Self::None)
    }

    /// Whether a record of this type is a measurement.
    pub const fn is_measurement(self) -> bool {
        matches!(self, Self::Measurement)
    }

    /// Whether no further operation may follow a record of this type.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Harvest)
    }
}

impl core::fmt::Display for OperationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Process status
// ---------------------------------------------------------------------------

/// Whether a process has been terminated by a successor operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ProcessStatus {
    /// No successor operation exists yet; the culture is ongoing.
    Open,
    /// A successor operation exists, or the start itself is terminal.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_variant() {
        for op in OperationType::ALL {
            assert_eq!(OperationType::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn parse_is_lenient_about_case_and_whitespace() {
        assert_eq!(OperationType::parse("  Passage "), Some(OperationType::Passage));
        assert_eq!(OperationType::parse("HARVEST"), Some(OperationType::Harvest));
        assert_eq!(OperationType::parse("seeding"), None);
        assert_eq!(OperationType::parse(""), None);
    }

    #[test]
    fn classification() {
        assert!(OperationType::Passage.is_process_start());
        assert!(OperationType::Harvest.is_process_start());
        assert!(!OperationType::Measurement.is_process_start());
        assert!(!OperationType::None.is_process_start());
        assert!(OperationType::Measurement.is_measurement());
        assert!(OperationType::Harvest.is_terminal());
        assert!(!OperationType::Split.is_terminal());
    }

    #[test]
    fn wire_names_are_snake_case() {
        let json = serde_json::to_string(&OperationType::StartNewCulture).ok();
        assert_eq!(json.as_deref(), Some("\"start_new_culture\""));

        let status = serde_json::to_string(&ProcessStatus::Completed).ok();
        assert_eq!(status.as_deref(), Some("\"completed\""));
    }
}
