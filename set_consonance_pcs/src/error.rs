// Error type shared by every set-theory operation and the optimizer above it.
//
// All failures are local and recoverable: they are returned to the caller as
// `Err(SetError)` and never silently swallowed. `LookupFailure` in particular
// signals a gap in the static reference tables rather than a search bug, so
// it carries the offending set so the driver can say which input to add.

use thiserror::Error;

/// Failure kinds for digit, pitch-class, catalog and search operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// Malformed input, e.g. a zero radix or a forced spacing index past
    /// the number of accepted spacings.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A value fell outside its permitted range `0..limit`.
    #[error("value {value} out of range (limit {limit})")]
    OutOfRange { value: u64, limit: u64 },

    /// A bounded sequence would grow past its compile-time capacity.
    #[error("capacity of {capacity} elements exceeded")]
    CapacityExceeded { capacity: usize },

    /// No spacing can fit the structural groups into one octave.
    #[error("groups spanning {range_sum} tones cannot fit in a {octave}-tone octave")]
    ConstraintUnsatisfiable { range_sum: u32, octave: u32 },

    /// A derived set has no catalog entry or no usable harmonization.
    #[error("lookup failed for {set}: {reason}")]
    LookupFailure { set: String, reason: String },

    /// An operation was called on data that breaks its precondition
    /// (empty set, pitches not ascending, ...).
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

impl SetError {
    pub fn lookup(set: impl ToString, reason: impl Into<String>) -> Self {
        SetError::LookupFailure {
            set: set.to_string(),
            reason: reason.into(),
        }
    }
}
