//! Control block error types
//!
//! Contract violations on a task control block are reported through these
//! variants instead of aborting, so the caller decides how to react.

use core::fmt;

/// Errors from control block operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlBlockError {
    /// Requested priority is above the scheduler's maximum
    PriorityOutOfRange {
        /// Priority passed at creation
        priority: u8,
        /// Highest priority the thread collaborator accepts
        max: u8,
    },
    /// History index outside `[0, capacity)`
    HistoryIndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of slots in the history
        capacity: usize,
    },
    /// Bulk history write with a length outside `[1, capacity]`
    InvalidLength {
        /// Length of the supplied slice
        len: usize,
        /// Number of slots in the history
        capacity: usize,
    },
    /// Every history slot already holds a counted sample
    HistoryFull {
        /// Number of slots in the history
        capacity: usize,
    },
    /// Negative (or NaN) value where a non-negative one is required
    NegativeValue {
        /// Name of the rejected quantity
        field: &'static str,
        /// Rejected value
        value: f64,
    },
    /// Activation-dependent operation before `set_activation`
    NotActivated,
    /// Sample buffers could not be allocated
    AllocationFailed {
        /// Requested number of slots per buffer
        capacity: usize,
    },
}

impl fmt::Display for ControlBlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlBlockError::PriorityOutOfRange { priority, max } => {
                write!(f, "priority {} exceeds maximum {}", priority, max)
            }
            ControlBlockError::HistoryIndexOutOfRange { index, capacity } => {
                write!(f, "history index {} out of range (capacity {})", index, capacity)
            }
            ControlBlockError::InvalidLength { len, capacity } => {
                write!(f, "history length {} not in 1..={}", len, capacity)
            }
            ControlBlockError::HistoryFull { capacity } => {
                write!(f, "sample history full ({} samples)", capacity)
            }
            ControlBlockError::NegativeValue { field, value } => {
                write!(f, "{} must be non-negative, got {}", field, value)
            }
            ControlBlockError::NotActivated => write!(f, "task has not been activated"),
            ControlBlockError::AllocationFailed { capacity } => {
                write!(f, "failed to allocate sample history of {} slots", capacity)
            }
        }
    }
}

impl core::error::Error for ControlBlockError {}

/// Rejects negative values and NaN for quantities that must be non-negative.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ControlBlockError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ControlBlockError::NegativeValue { field, value })
    }
}
