//! Linux platform implementation
//!
//! `CLOCK_MONOTONIC` time source with absolute `clock_nanosleep`, and a
//! spawner that places each task thread in an explicit real-time
//! scheduling class. Real-time classes need `CAP_SYS_NICE` (or a suitable
//! `RLIMIT_RTPRIO`); without it thread creation fails with
//! `ThreadError::PermissionDenied` and callers may fall back to
//! [`crate::platform::host::InheritedSpawner`].

mod clock;
mod thread;

pub use clock::MonotonicClock;
pub use thread::RoundRobinSpawner;
