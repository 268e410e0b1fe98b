//! Core traits for platform-agnostic task monitoring.
//!
//! This module provides the time abstraction that decouples activation and
//! deadline bookkeeping from the host clock.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - OS implementations live in the root crate's `platform` module

pub mod time;

pub use time::{AbsoluteTime, MockTime, TimeSource};
