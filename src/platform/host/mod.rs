//! Portable platform implementation
//!
//! Built on `std` only. Threads inherit the scheduling class of the
//! creating thread, so nothing here needs privileges; used on non-Linux
//! hosts and in tests.

mod clock;
mod thread;

pub use clock::StdClock;
pub use thread::InheritedSpawner;
