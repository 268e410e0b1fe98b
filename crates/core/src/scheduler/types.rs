//! Core types for periodic task bookkeeping
//!
//! This module defines the value types shared by the control block and its
//! readers:
//! - Task configuration (fixed at creation)
//! - Lifecycle state
//! - Response-time statistics (derived aggregates)
//! - Read-only snapshots handed to supervisors

use super::error::ControlBlockError;

/// Sentinel returned by the standard deviation when fewer than two samples
/// exist.
pub const STD_DEV_UNDEFINED: f64 = f64::MAX;

/// Static configuration of a periodic task
///
/// Immutable once the task is created. Non-negativity of every field is
/// guaranteed by the unsigned types; only the priority ceiling depends on
/// the thread collaborator and is checked by [`TaskConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConfig {
    /// Interval between consecutive activations in milliseconds
    pub period_ms: u32,

    /// Maximum allowed time from activation to completion in milliseconds
    pub relative_deadline_ms: u32,

    /// Fixed scheduling priority (higher = more important)
    ///
    /// Under `SCHED_RR` on Linux the useful range is 1-99.
    pub priority: u8,
}

impl TaskConfig {
    /// Create a configuration
    pub const fn new(period_ms: u32, relative_deadline_ms: u32, priority: u8) -> Self {
        Self {
            period_ms,
            relative_deadline_ms,
            priority,
        }
    }

    /// Create a configuration with an implicit deadline (deadline = period)
    pub const fn implicit_deadline(period_ms: u32, priority: u8) -> Self {
        Self::new(period_ms, period_ms, priority)
    }

    /// Check the configuration against the scheduler's priority ceiling
    pub fn validate(&self, max_priority: u8) -> Result<(), ControlBlockError> {
        if self.priority > max_priority {
            return Err(ControlBlockError::PriorityOutOfRange {
                priority: self.priority,
                max: max_priority,
            });
        }
        Ok(())
    }
}

/// Lifecycle state of a created task
///
/// ```text
///   Created ──set_activation──► Activated ──wait──► WaitingForPeriod
///                                             ▲             │
///                                             └── Running ◄─┘
/// ```
///
/// `Unstarted` and `Joined` have no variant: both are an empty store slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Control block populated, thread started, no activation yet
    Created,
    /// First activation and absolute deadline computed
    Activated,
    /// Executing the body of the current period
    Running,
    /// Suspended until the next absolute activation time
    WaitingForPeriod,
}

/// Response-time aggregates of a task
///
/// All times are milliseconds; utilizations are ratios of response time to
/// period. Every field is non-negative once computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStats {
    /// Average response time
    pub rt_avg: f64,
    /// Maximum response time observed
    pub rt_max: f64,
    /// Minimum response time observed (`f64::MAX` before the first sample)
    pub rt_min: f64,
    /// Sum of all response times
    pub rt_total: f64,
    /// Sample standard deviation (`STD_DEV_UNDEFINED` with a single sample)
    pub rt_std: f64,
    /// Latest response time over period
    pub util_inst: f64,
    /// Maximum response time over period
    pub util_inst_max: f64,
    /// Total response time over total elapsed periods
    pub util_avg: f64,
}

impl Default for TaskStats {
    fn default() -> Self {
        Self {
            rt_avg: 0.0,
            rt_max: 0.0,
            rt_min: f64::MAX,
            rt_total: 0.0,
            rt_std: 0.0,
            util_inst: 0.0,
            util_inst_max: 0.0,
            util_avg: 0.0,
        }
    }
}

impl TaskStats {
    /// Reset all statistics to initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the standard deviation holds a real value
    pub fn has_std_dev(&self) -> bool {
        self.rt_std != STD_DEV_UNDEFINED
    }
}

/// Copy of a control block without its sample history
///
/// Supervisors read snapshots so that every field comes from the same
/// instant of the owning task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskSnapshot {
    /// Task index in the store
    pub index: usize,
    /// Configuration given at creation
    pub config: TaskConfig,
    /// Lifecycle state at snapshot time
    pub state: TaskState,
    /// Deadline misses counted so far
    pub deadline_misses: u32,
    /// Samples recorded so far (history write cursor)
    pub execution_count: usize,
    /// Response-time aggregates
    pub stats: TaskStats,
}
