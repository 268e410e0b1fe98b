//! rt_taskmon_core - Pure no_std bookkeeping for periodic real-time tasks
//!
//! This crate contains the platform-agnostic part of the task monitor:
//! control blocks, the deadline monitor and the response-time statistics
//! engine. It can be tested on host without threads or an OS clock.
//!
//! # Design Principles
//!
//! - **Pure no_std**: only `core` and `alloc` (sample buffers)
//! - **Trait abstractions**: the monotonic clock is injected via [`traits::TimeSource`]
//! - **Typed errors**: contract violations surface as [`scheduler::ControlBlockError`]
//!
//! # Modules
//!
//! - [`traits`]: Time abstractions (AbsoluteTime, TimeSource, MockTime)
//! - [`scheduler`]: Task control block, sample history, statistics and feasibility

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod scheduler;
pub mod traits;
