//! Error types for the calculation entry points.
//!
//! Only contract violations by the caller are errors. Expected domain
//! variance (no growth, missing densities) is reported as `None`.

use culture_types::TimestampError;

/// Errors returned by growth-kinetics entry points that accept raw strings.
#[derive(Debug, thiserror::Error)]
pub enum KineticsError {
    /// A timestamp argument could not be parsed.
    #[error("invalid kinetics input: {source}")]
    Timestamp {
        /// The underlying parse error.
        #[from]
        source: TimestampError,
    },
}
