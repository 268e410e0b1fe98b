//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `AbsoluteTime` instant type and the `TimeSource`
//! trait that abstracts over different monotonic clocks (POSIX, std, mock)
//! so that activation and deadline bookkeeping can be tested on host
//! without sleeping.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

const NANOS_PER_MS: u64 = 1_000_000;
const NANOS_PER_US: u64 = 1_000;

/// Point on a monotonic clock, in nanoseconds since the clock origin.
///
/// Ordering is the three-way comparison of two instants. Arithmetic
/// saturates instead of wrapping so a task with a huge period never
/// produces an activation time in the past.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsoluteTime(u64);

impl AbsoluteTime {
    /// Clock origin
    pub const ZERO: Self = Self(0);

    /// Creates an instant from nanoseconds since the clock origin.
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Creates an instant from milliseconds since the clock origin.
    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(NANOS_PER_MS))
    }

    /// Nanoseconds since the clock origin.
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Whole milliseconds since the clock origin (rounded down).
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / NANOS_PER_MS
    }

    /// Returns this instant shifted forward by `ms` milliseconds.
    #[inline]
    pub const fn add_ms(self, ms: u32) -> Self {
        Self(self.0.saturating_add(ms as u64 * NANOS_PER_MS))
    }

    /// Returns this instant shifted backward by `ms` milliseconds,
    /// clamped at the clock origin.
    #[inline]
    pub const fn saturating_sub_ms(self, ms: u32) -> Self {
        Self(self.0.saturating_sub(ms as u64 * NANOS_PER_MS))
    }

    /// Nanoseconds elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub const fn nanos_since(&self, earlier: AbsoluteTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Milliseconds elapsed from `earlier` to `self`, with sub-millisecond
    /// resolution.
    #[inline]
    pub fn elapsed_ms_since(&self, earlier: AbsoluteTime) -> f64 {
        self.nanos_since(earlier) as f64 / NANOS_PER_MS as f64
    }
}

/// Platform-agnostic monotonic clock.
///
/// This trait abstracts over different time providers:
/// - `MonotonicClock` (root crate) backed by `CLOCK_MONOTONIC`
/// - `StdClock` (root crate) backed by `std::time::Instant`
/// - `MockTime` for host testing with controllable time
///
/// # Example
///
/// ```
/// use rt_taskmon_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let release = time.now().add_ms(10);
///
/// time.sleep_until(release);
/// assert_eq!(time.now_ms(), 10);
/// ```
pub trait TimeSource: Clone + Send + Sync + 'static {
    /// Returns the current reading of the monotonic clock.
    fn now(&self) -> AbsoluteTime;

    /// Blocks the calling thread until the clock reaches `target`.
    ///
    /// Returns immediately if `target` is already in the past.
    fn sleep_until(&self, target: AbsoluteTime);

    /// Returns current time in milliseconds since the clock origin.
    fn now_ms(&self) -> u64 {
        self.now().as_millis()
    }

    /// Returns current time in microseconds since the clock origin.
    fn now_us(&self) -> u64 {
        self.now().as_nanos() / NANOS_PER_US
    }

    /// Returns elapsed time in nanoseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_since(&self, reference: AbsoluteTime) -> u64 {
        self.now().nanos_since(reference)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// Clones share the same underlying counter, so a test can keep one handle
/// while a task thread holds another. `sleep_until` never blocks: it jumps
/// the clock forward to the target.
///
/// # Example
///
/// ```
/// use rt_taskmon_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_us(), 0);
///
/// time.advance_ms(1);
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockTime {
    current_ns: Arc<AtomicU64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(initial: AbsoluteTime) -> Self {
        Self {
            current_ns: Arc::new(AtomicU64::new(initial.as_nanos())),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, time: AbsoluteTime) {
        self.current_ns.store(time.as_nanos(), Ordering::Release);
    }

    /// Advances the current time by the specified number of nanoseconds.
    pub fn advance_nanos(&self, nanos: u64) {
        self.current_ns.fetch_add(nanos, Ordering::AcqRel);
    }

    /// Advances the current time by the specified number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance_nanos(ms.saturating_mul(NANOS_PER_MS));
    }
}

impl TimeSource for MockTime {
    fn now(&self) -> AbsoluteTime {
        AbsoluteTime::from_nanos(self.current_ns.load(Ordering::Acquire))
    }

    fn sleep_until(&self, target: AbsoluteTime) {
        self.current_ns.fetch_max(target.as_nanos(), Ordering::AcqRel);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_time_add_ms() {
        let t = AbsoluteTime::from_millis(5);
        assert_eq!(t.add_ms(10), AbsoluteTime::from_millis(15));
        assert_eq!(t.add_ms(0), t);
    }

    #[test]
    fn absolute_time_add_saturates() {
        let t = AbsoluteTime::from_nanos(u64::MAX - 10);
        assert_eq!(t.add_ms(1).as_nanos(), u64::MAX);
    }

    #[test]
    fn absolute_time_sub_clamps_at_origin() {
        let t = AbsoluteTime::from_millis(3);
        assert_eq!(t.saturating_sub_ms(2), AbsoluteTime::from_millis(1));
        assert_eq!(t.saturating_sub_ms(10), AbsoluteTime::ZERO);
    }

    #[test]
    fn absolute_time_compare() {
        let a = AbsoluteTime::from_millis(1);
        let b = AbsoluteTime::from_millis(2);
        assert!(a < b);
        assert_eq!(a.cmp(&a), core::cmp::Ordering::Equal);
        assert_eq!(b.cmp(&a), core::cmp::Ordering::Greater);
    }

    #[test]
    fn absolute_time_elapsed_ms() {
        let start = AbsoluteTime::from_millis(100);
        let end = AbsoluteTime::from_nanos(112_500_000);
        assert!((end.elapsed_ms_since(start) - 12.5).abs() < 1e-9);
        assert_eq!(start.elapsed_ms_since(end), 0.0);
    }

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now(), AbsoluteTime::ZERO);
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(AbsoluteTime::from_millis(5000));
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5000);
    }

    #[test]
    fn mock_time_advance() {
        let time = MockTime::new();
        time.advance_ms(500);
        assert_eq!(time.now_ms(), 500);

        time.advance_nanos(500_000_000);
        assert_eq!(time.now_ms(), 1000);
    }

    #[test]
    fn mock_time_clones_share_state() {
        let time = MockTime::new();
        let other = time.clone();
        other.advance_ms(7);
        assert_eq!(time.now_ms(), 7);
    }

    #[test]
    fn mock_time_sleep_until_jumps_forward() {
        let time = MockTime::new();
        time.sleep_until(AbsoluteTime::from_millis(40));
        assert_eq!(time.now_ms(), 40);

        // Target in the past leaves the clock untouched
        time.sleep_until(AbsoluteTime::from_millis(10));
        assert_eq!(time.now_ms(), 40);
    }

    #[test]
    fn mock_time_elapsed_since_saturates() {
        let time = MockTime::with_initial(AbsoluteTime::from_millis(1));
        assert_eq!(time.elapsed_since(AbsoluteTime::from_millis(5)), 0);
        assert_eq!(time.elapsed_since(AbsoluteTime::ZERO), 1_000_000);
    }
}
