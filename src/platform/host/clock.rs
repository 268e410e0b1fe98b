//! `std::time::Instant` time source

use std::time::{Duration, Instant};

use rt_taskmon_core::traits::{AbsoluteTime, TimeSource};

/// Monotonic clock measured from the moment it was created
///
/// Copies share the same origin, so times taken through any copy compare
/// meaningfully.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for StdClock {
    fn now(&self) -> AbsoluteTime {
        let nanos = self.origin.elapsed().as_nanos();
        AbsoluteTime::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn sleep_until(&self, target: AbsoluteTime) {
        // thread::sleep may wake early on some platforms
        loop {
            let now = self.now();
            if now >= target {
                break;
            }
            std::thread::sleep(Duration::from_nanos(target.nanos_since(now)));
        }
    }
}
