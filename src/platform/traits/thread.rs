//! Thread creation interface trait
//!
//! Defines how the task store starts one OS thread per task with an
//! explicit scheduling class and priority.

use std::thread::JoinHandle;

use crate::platform::Result;

/// Scheduling class requested for a task thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedPolicy {
    /// Fixed-priority round-robin (`SCHED_RR`)
    RoundRobin,
    /// Fixed-priority first-in first-out (`SCHED_FIFO`)
    Fifo,
}

/// Everything a spawner needs to start a task thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSpec {
    /// Thread name (visible in `/proc` and debuggers)
    pub name: String,
    /// Fixed priority within the scheduling class
    pub priority: u8,
    /// Scheduling class, set explicitly rather than inherited
    pub policy: SchedPolicy,
}

impl ThreadSpec {
    /// Round-robin thread spec
    pub fn round_robin(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
            policy: SchedPolicy::RoundRobin,
        }
    }

    /// First-in first-out thread spec
    pub fn fifo(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
            policy: SchedPolicy::Fifo,
        }
    }
}

/// Thread creation interface
///
/// Implementations must not run `body` unless the thread was configured as
/// requested, and must report any setup failure through the returned
/// `Result` rather than by panicking.
///
/// # Example
///
/// ```
/// use rt_taskmon::platform::host::InheritedSpawner;
/// use rt_taskmon::platform::traits::{ThreadSpawner, ThreadSpec};
///
/// let spawner = InheritedSpawner::new();
/// let handle = spawner
///     .spawn(ThreadSpec::round_robin("worker", 10), Box::new(|| {}))
///     .unwrap();
/// handle.join().unwrap();
/// ```
pub trait ThreadSpawner: Send + Sync {
    /// Start a thread running `body` under `spec`
    fn spawn(
        &self,
        spec: ThreadSpec,
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> Result<JoinHandle<()>>;

    /// Highest priority this spawner accepts
    fn max_priority(&self) -> u8;
}
