//! Periodic task bookkeeping without any threading or OS dependencies
//!
//! The actual threads and clocks are provided by the root crate; this
//! module holds everything that can be computed from timestamps alone.
//!
//! # Components
//!
//! - [`types`]: Core types (TaskConfig, TaskState, TaskStats, TaskSnapshot)
//! - [`control_block`]: Per-task control block, activation and deadline monitor
//! - [`history`]: Bounded response-time and tag buffers
//! - [`stats`]: Incremental and from-scratch statistics engine
//! - [`feasibility`]: Liu & Layland utilization bound
//! - [`error`]: Control block error taxonomy
//!
//! # Example
//!
//! ```rust
//! use rt_taskmon_core::scheduler::{TaskConfig, TaskControlBlock};
//! use rt_taskmon_core::traits::AbsoluteTime;
//!
//! let config = TaskConfig::new(100, 100, 20);
//! let mut tcb = TaskControlBlock::new(0, config, 1024).unwrap();
//!
//! tcb.set_activation(AbsoluteTime::ZERO);
//! tcb.record_sample(12.5, 0).unwrap();
//!
//! assert_eq!(tcb.get_ex_tot(), 1);
//! assert_eq!(tcb.get_rt_max(), 12.5);
//! assert!(!tcb.check_deadline_miss(AbsoluteTime::from_millis(50)).unwrap());
//! ```

pub mod control_block;
pub mod error;
pub mod feasibility;
pub mod history;
pub mod stats;
pub mod types;

pub use control_block::TaskControlBlock;
pub use error::ControlBlockError;
pub use feasibility::{classify_utilization, liu_layland_bound, Feasibility};
pub use history::SampleHistory;
pub use stats::StatsAudit;
pub use types::{TaskConfig, TaskSnapshot, TaskState, TaskStats, STD_DEV_UNDEFINED};
