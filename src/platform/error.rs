//! Platform error types
//!
//! This module defines error types for thread creation under an explicit
//! scheduling class.

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Thread creation errors
///
/// All spawner implementations map OS failures to these variants.
#[derive(Debug, thiserror::Error)]
pub enum ThreadError {
    /// The OS could not start the thread
    #[error("Thread spawn failed: {0}")]
    Spawn(#[from] std::io::Error),

    /// Caller lacks the privilege to use a real-time scheduling class
    #[error("Permission denied for real-time priority {priority}")]
    PermissionDenied { priority: u8 },

    /// Priority outside the range accepted by the scheduling class
    #[error("Priority {0} rejected by the scheduling class")]
    InvalidPriority(u8),

    /// Any other error number returned while configuring the thread
    #[error("Scheduling setup failed with OS error {0}")]
    Os(i32),

    /// Thread terminated before reporting its scheduling setup
    #[error("Thread exited before it started running")]
    Exited,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ThreadError::PermissionDenied { priority: 40 }.to_string(),
            "Permission denied for real-time priority 40"
        );
        assert_eq!(
            ThreadError::InvalidPriority(0).to_string(),
            "Priority 0 rejected by the scheduling class"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no stack");
        let err: ThreadError = io.into();
        assert!(matches!(err, ThreadError::Spawn(_)));
    }
}
