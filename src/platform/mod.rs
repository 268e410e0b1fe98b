//! Platform abstraction layer
//!
//! Clock and thread-creation implementations. Every OS-specific call is
//! isolated to this module; the task store only sees the
//! [`TimeSource`](rt_taskmon_core::traits::TimeSource) and
//! [`ThreadSpawner`] traits.

pub mod error;
pub mod host;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod linux;

pub use error::{Result, ThreadError};
pub use traits::{SchedPolicy, ThreadSpawner, ThreadSpec};
