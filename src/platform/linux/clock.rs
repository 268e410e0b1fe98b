//! `CLOCK_MONOTONIC` time source

use rt_taskmon_core::traits::{AbsoluteTime, TimeSource};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Monotonic clock backed by `clock_gettime` / `clock_nanosleep`
///
/// `sleep_until` uses `TIMER_ABSTIME`, so a periodic task sleeping to
/// successive absolute targets accumulates no drift from wake-up latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

fn zeroed_timespec() -> libc::timespec {
    // SAFETY: timespec is plain old data; all-zero is a valid value.
    unsafe { std::mem::zeroed() }
}

fn to_timespec(time: AbsoluteTime) -> libc::timespec {
    let nanos = time.as_nanos();
    let mut ts = zeroed_timespec();
    ts.tv_sec = (nanos / NANOS_PER_SEC) as libc::time_t;
    ts.tv_nsec = (nanos % NANOS_PER_SEC) as _;
    ts
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> AbsoluteTime {
        let mut ts = zeroed_timespec();
        // SAFETY: `ts` is a valid, writable timespec and CLOCK_MONOTONIC is
        // always supported on Linux, so the call cannot fail.
        unsafe {
            libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
        }
        AbsoluteTime::from_nanos(ts.tv_sec as u64 * NANOS_PER_SEC + ts.tv_nsec as u64)
    }

    fn sleep_until(&self, target: AbsoluteTime) {
        let ts = to_timespec(target);
        loop {
            // SAFETY: `ts` outlives the call; the remainder pointer may be
            // null with TIMER_ABSTIME.
            let rc = unsafe {
                libc::clock_nanosleep(
                    libc::CLOCK_MONOTONIC,
                    libc::TIMER_ABSTIME,
                    &ts,
                    std::ptr::null_mut(),
                )
            };
            // Interrupted by a signal: the absolute target is unchanged
            if rc != libc::EINTR {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_sleep_until_reaches_target() {
        let clock = MonotonicClock::new();
        let target = clock.now().add_ms(5);
        clock.sleep_until(target);
        assert!(clock.now() >= target);
    }

    #[test]
    fn test_sleep_until_past_target_returns() {
        let clock = MonotonicClock::new();
        let past = clock.now().saturating_sub_ms(10);
        clock.sleep_until(past);
    }

    #[test]
    fn test_to_timespec_split() {
        let ts = to_timespec(AbsoluteTime::from_nanos(3 * NANOS_PER_SEC + 250));
        assert_eq!(ts.tv_sec, 3);
        assert_eq!(ts.tv_nsec, 250);
    }
}
