//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.
//! Time is abstracted by `rt_taskmon_core::traits::TimeSource`; thread
//! creation lives here because it needs `std`.

pub mod thread;

pub use thread::{SchedPolicy, ThreadSpawner, ThreadSpec};
