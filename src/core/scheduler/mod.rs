//! Periodic real-time task store
//!
//! One OS thread per task, released at absolute times every period, with
//! response times recorded into the task's control block. The store
//! provides:
//!
//! - Task creation under an explicit round-robin scheduling class
//! - Drift-free periodic waits
//! - Deadline miss detection
//! - Response-time and utilization statistics
//!
//! # Example
//!
//! ```
//! use rt_taskmon::core::scheduler::{collect_report, TaskStore};
//! use rt_taskmon::platform::host::{InheritedSpawner, StdClock};
//! use rt_taskmon::TaskConfig;
//!
//! let store = TaskStore::new(StdClock::new(), InheritedSpawner::new());
//! store
//!     .create_task(0, TaskConfig::implicit_deadline(5, 10), |mut ctx| {
//!         ctx.set_activation();
//!         for job in 0..4 {
//!             ctx.execute_instance(job, || ()).unwrap();
//!             ctx.wait_for_period().unwrap();
//!         }
//!     })
//!     .unwrap();
//!
//! let report = collect_report(&store);
//! assert_eq!(report.tasks.len(), 1);
//! store.wait_for_end(0).unwrap();
//! ```

pub mod error;
pub mod monitor;
pub mod store;
pub mod task;

pub use error::TaskError;
pub use monitor::{collect_and_report_stats, collect_report, SchedulerReport};
pub use store::TaskStore;
pub use task::{InstanceReport, TaskContext};
