//! rt_taskmon - periodic real-time tasks with timing statistics
//!
//! Runs each periodic task on its own OS thread under a fixed-priority
//! round-robin class, releases it at absolute times, counts deadline
//! misses and keeps per-task response-time statistics that supervisors can
//! read while the tasks run.
//!
//! The control block and statistics engine live in the `no_std` crate
//! `rt_taskmon_core` and are re-exported here.

// Build-time capacities
pub mod config;

// Task store, task context, monitor and logging
pub mod core;

// Clock and thread creation (Linux real-time and portable)
pub mod platform;

pub use rt_taskmon_core::scheduler::{
    classify_utilization, liu_layland_bound, ControlBlockError, Feasibility, StatsAudit,
    TaskConfig, TaskControlBlock, TaskSnapshot, TaskState, TaskStats, STD_DEV_UNDEFINED,
};
pub use rt_taskmon_core::traits::{AbsoluteTime, MockTime, TimeSource};

pub use crate::core::scheduler::{
    collect_and_report_stats, collect_report, InstanceReport, SchedulerReport, TaskContext,
    TaskError, TaskStore,
};
