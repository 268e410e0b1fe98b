//! Core task-monitoring functionality
//!
//! This module contains the task store, the task context handed to every
//! task thread, the supervisor monitor and the crate's logging macros.

pub mod logging;
pub mod scheduler;
