//! Type-safe identifier wrappers around the integer keys assigned by the
//! persistence layer.
//!
//! State records are keyed by database integers. A process is identified
//! by the id of the state record that starts it, but the two are kept as
//! distinct types so a process id can never be looked up as a state id by
//! accident.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a transparent newtype wrapper around `i64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner integer value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier of a state record, assigned at creation.
    StateId
}

define_id! {
    /// Identifier of a derived process. Equal to its start state's id.
    ProcessId
}

impl From<StateId> for ProcessId {
    fn from(id: StateId) -> Self {
        Self(id.0)
    }
}
