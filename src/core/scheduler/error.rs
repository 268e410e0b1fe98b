//! Task store error types

use rt_taskmon_core::scheduler::ControlBlockError;

use crate::platform::ThreadError;

/// Errors returned by the task store and task contexts
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Slot index at or beyond the store capacity
    #[error("Task index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Slot already holds a task that has not been joined
    #[error("Task slot {0} is already occupied")]
    SlotOccupied(usize),

    /// No task in this slot
    #[error("Task slot {0} holds no task")]
    NotCreated(usize),

    /// Control block contract violation
    #[error(transparent)]
    ControlBlock(#[from] ControlBlockError),

    /// The task thread could not be started
    #[error("Task {index}: thread creation failed")]
    Thread {
        index: usize,
        #[source]
        source: ThreadError,
    },

    /// The task thread panicked
    #[error("Task {0}: thread panicked")]
    JoinFailed(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_control_block_error_is_transparent() {
        let err: TaskError = ControlBlockError::NotActivated.into();
        assert_eq!(err.to_string(), ControlBlockError::NotActivated.to_string());
    }

    #[test]
    fn test_thread_error_is_source() {
        let err = TaskError::Thread {
            index: 2,
            source: ThreadError::PermissionDenied { priority: 50 },
        };
        assert_eq!(err.to_string(), "Task 2: thread creation failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Permission denied for real-time priority 50"));
    }
}
