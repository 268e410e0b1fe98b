//! Task control block
//!
//! One control block exists per created task. It holds the immutable
//! configuration, the activation and deadline bookkeeping, the deadline
//! miss counter, the sample history and the derived statistics. The
//! statistics engine lives in [`super::stats`] as further methods on the
//! same type.

use super::error::{ensure_non_negative, ControlBlockError};
use super::history::SampleHistory;
use super::types::{TaskConfig, TaskSnapshot, TaskState, TaskStats};
use crate::traits::AbsoluteTime;

/// Per-task state owned by a single store slot
#[derive(Debug, Clone)]
pub struct TaskControlBlock {
    index: usize,
    config: TaskConfig,
    state: TaskState,
    next_activation: AbsoluteTime,
    absolute_deadline: AbsoluteTime,
    deadline_misses: u32,
    pub(crate) execution_count: usize,
    pub(crate) history: SampleHistory,
    pub(crate) stats: TaskStats,
}

impl TaskControlBlock {
    /// Create a control block with a history of `capacity` samples
    ///
    /// The caller is expected to have validated `config` against its
    /// priority ceiling; the only failure here is allocation.
    pub fn new(
        index: usize,
        config: TaskConfig,
        capacity: usize,
    ) -> Result<Self, ControlBlockError> {
        Ok(Self {
            index,
            config,
            state: TaskState::Created,
            next_activation: AbsoluteTime::ZERO,
            absolute_deadline: AbsoluteTime::ZERO,
            deadline_misses: 0,
            execution_count: 0,
            history: SampleHistory::with_capacity(capacity)?,
            stats: TaskStats::default(),
        })
    }

    // ------------------------------------------------------------------
    // Identity and configuration
    // ------------------------------------------------------------------

    /// Store index of this task
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Configuration given at creation
    #[inline]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    #[inline]
    pub fn period_ms(&self) -> u32 {
        self.config.period_ms
    }

    #[inline]
    pub fn relative_deadline_ms(&self) -> u32 {
        self.config.relative_deadline_ms
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.config.priority
    }

    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Number of slots in the sample history
    #[inline]
    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    /// Compute the first activation and absolute deadline from `now`
    pub fn set_activation(&mut self, now: AbsoluteTime) {
        self.next_activation = now.add_ms(self.config.period_ms);
        self.absolute_deadline = now.add_ms(self.config.relative_deadline_ms);
        self.state = TaskState::Activated;
    }

    fn ensure_activated(&self) -> Result<(), ControlBlockError> {
        if self.state == TaskState::Created {
            Err(ControlBlockError::NotActivated)
        } else {
            Ok(())
        }
    }

    /// Absolute time of the next activation
    pub fn next_activation(&self) -> AbsoluteTime {
        self.next_activation
    }

    /// Absolute deadline of the current period
    pub fn absolute_deadline(&self) -> AbsoluteTime {
        self.absolute_deadline
    }

    /// Release time of the current period (one period before the next activation)
    pub fn current_release(&self) -> Result<AbsoluteTime, ControlBlockError> {
        self.ensure_activated()?;
        Ok(self.next_activation.saturating_sub_ms(self.config.period_ms))
    }

    /// Enter the periodic wait, returning the absolute wake-up target
    pub fn begin_wait(&mut self) -> Result<AbsoluteTime, ControlBlockError> {
        self.ensure_activated()?;
        self.state = TaskState::WaitingForPeriod;
        Ok(self.next_activation)
    }

    /// Leave the periodic wait: shift activation and deadline by one period
    pub fn complete_wait(&mut self) -> Result<(), ControlBlockError> {
        self.ensure_activated()?;
        self.next_activation = self.next_activation.add_ms(self.config.period_ms);
        self.absolute_deadline = self.absolute_deadline.add_ms(self.config.period_ms);
        self.state = TaskState::Running;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Deadline monitor
    // ------------------------------------------------------------------

    /// Count a miss if `now` is strictly past the absolute deadline
    ///
    /// Call at most once per period: every call past the deadline counts.
    pub fn check_deadline_miss(&mut self, now: AbsoluteTime) -> Result<bool, ControlBlockError> {
        self.ensure_activated()?;
        if now > self.absolute_deadline {
            self.deadline_misses = self.deadline_misses.saturating_add(1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Deadline misses counted so far
    pub fn get_deadline_miss(&self) -> u32 {
        self.deadline_misses
    }

    pub fn set_deadline_miss(&mut self, misses: u32) {
        self.deadline_misses = misses;
    }

    // ------------------------------------------------------------------
    // History accessors
    // ------------------------------------------------------------------

    /// Samples recorded so far, i.e. the history write cursor
    pub fn get_ex_tot(&self) -> usize {
        self.execution_count
    }

    /// Move the history write cursor (`m` must be a valid slot)
    pub fn set_ex_tot(&mut self, m: usize) -> Result<(), ControlBlockError> {
        if m >= self.history.capacity() {
            return Err(ControlBlockError::HistoryIndexOutOfRange {
                index: m,
                capacity: self.history.capacity(),
            });
        }
        self.execution_count = m;
        Ok(())
    }

    pub fn get_rt_value(&self, m: usize) -> Result<f64, ControlBlockError> {
        self.history.value(m)
    }

    pub fn set_rt_value(&mut self, m: usize, rt_value: f64) -> Result<(), ControlBlockError> {
        self.history.set_value(m, rt_value)
    }

    /// Every response-time slot, written or not
    pub fn get_rt_values(&self) -> &[f64] {
        self.history.values()
    }

    pub fn set_rt_values(&mut self, rt_values: &[f64]) -> Result<(), ControlBlockError> {
        self.history.set_values(rt_values)
    }

    pub fn get_rt_index(&self, m: usize) -> Result<u64, ControlBlockError> {
        self.history.tag(m)
    }

    pub fn set_rt_index(&mut self, m: usize, rt_index: u64) -> Result<(), ControlBlockError> {
        self.history.set_tag(m, rt_index)
    }

    /// Every tag slot, written or not
    pub fn get_rt_indexes(&self) -> &[u64] {
        self.history.tags()
    }

    pub fn set_rt_indexes(&mut self, rt_indexes: &[u64]) -> Result<(), ControlBlockError> {
        self.history.set_tags(rt_indexes)
    }

    /// Response times of the samples counted so far
    pub fn recorded_samples(&self) -> &[f64] {
        self.history.prefix(self.execution_count)
    }

    // ------------------------------------------------------------------
    // Aggregate accessors
    // ------------------------------------------------------------------

    /// All aggregates at once
    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    pub fn get_rt_avg(&self) -> f64 {
        self.stats.rt_avg
    }

    pub fn get_rt_max(&self) -> f64 {
        self.stats.rt_max
    }

    pub fn get_rt_min(&self) -> f64 {
        self.stats.rt_min
    }

    pub fn get_rt_tot(&self) -> f64 {
        self.stats.rt_total
    }

    pub fn get_rt_std(&self) -> f64 {
        self.stats.rt_std
    }

    pub fn get_util_inst(&self) -> f64 {
        self.stats.util_inst
    }

    pub fn get_util_inst_max(&self) -> f64 {
        self.stats.util_inst_max
    }

    pub fn get_util_avg(&self) -> f64 {
        self.stats.util_avg
    }

    pub fn set_rt_avg(&mut self, rt_avg: f64) -> Result<(), ControlBlockError> {
        self.stats.rt_avg = ensure_non_negative("rt_avg", rt_avg)?;
        Ok(())
    }

    pub fn set_rt_max(&mut self, rt_max: f64) -> Result<(), ControlBlockError> {
        self.stats.rt_max = ensure_non_negative("rt_max", rt_max)?;
        Ok(())
    }

    pub fn set_rt_min(&mut self, rt_min: f64) -> Result<(), ControlBlockError> {
        self.stats.rt_min = ensure_non_negative("rt_min", rt_min)?;
        Ok(())
    }

    pub fn set_rt_tot(&mut self, rt_tot: f64) -> Result<(), ControlBlockError> {
        self.stats.rt_total = ensure_non_negative("rt_tot", rt_tot)?;
        Ok(())
    }

    pub fn set_rt_std(&mut self, rt_std: f64) -> Result<(), ControlBlockError> {
        self.stats.rt_std = ensure_non_negative("rt_std", rt_std)?;
        Ok(())
    }

    pub fn set_util_inst(&mut self, util_inst: f64) -> Result<(), ControlBlockError> {
        self.stats.util_inst = ensure_non_negative("util_inst", util_inst)?;
        Ok(())
    }

    pub fn set_util_inst_max(&mut self, util_inst_max: f64) -> Result<(), ControlBlockError> {
        self.stats.util_inst_max = ensure_non_negative("util_inst_max", util_inst_max)?;
        Ok(())
    }

    pub fn set_util_avg(&mut self, util_avg: f64) -> Result<(), ControlBlockError> {
        self.stats.util_avg = ensure_non_negative("util_avg", util_avg)?;
        Ok(())
    }

    /// Add `delta` to the running total; a negative delta decreases it
    pub fn increment_rt_tot(&mut self, delta: f64) {
        self.stats.rt_total += delta;
    }

    /// Copy of everything but the history
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            index: self.index,
            config: self.config,
            state: self.state,
            deadline_misses: self.deadline_misses,
            execution_count: self.execution_count,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(period_ms: u32, deadline_ms: u32) -> TaskControlBlock {
        TaskControlBlock::new(2, TaskConfig::new(period_ms, deadline_ms, 10), 16).unwrap()
    }

    #[test]
    fn test_new_block_initial_state() {
        let tcb = block(100, 80);
        assert_eq!(tcb.index(), 2);
        assert_eq!(tcb.period_ms(), 100);
        assert_eq!(tcb.relative_deadline_ms(), 80);
        assert_eq!(tcb.priority(), 10);
        assert_eq!(tcb.state(), TaskState::Created);
        assert_eq!(tcb.get_deadline_miss(), 0);
        assert_eq!(tcb.get_ex_tot(), 0);
        assert_eq!(tcb.get_rt_min(), f64::MAX);
        assert_eq!(tcb.history_capacity(), 16);
    }

    #[test]
    fn test_set_activation() {
        let mut tcb = block(100, 80);
        tcb.set_activation(AbsoluteTime::from_millis(1_000));

        assert_eq!(tcb.state(), TaskState::Activated);
        assert_eq!(tcb.next_activation(), AbsoluteTime::from_millis(1_100));
        assert_eq!(tcb.absolute_deadline(), AbsoluteTime::from_millis(1_080));
        assert_eq!(tcb.current_release(), Ok(AbsoluteTime::from_millis(1_000)));
    }

    #[test]
    fn test_periodic_wait_advances_by_period() {
        let mut tcb = block(100, 80);
        tcb.set_activation(AbsoluteTime::from_millis(0));

        for k in 1..=3u64 {
            let target = tcb.begin_wait().unwrap();
            assert_eq!(tcb.state(), TaskState::WaitingForPeriod);
            assert_eq!(target, AbsoluteTime::from_millis(100 * k));

            tcb.complete_wait().unwrap();
            assert_eq!(tcb.state(), TaskState::Running);
            assert_eq!(tcb.next_activation(), AbsoluteTime::from_millis(100 * (k + 1)));
            assert_eq!(tcb.absolute_deadline(), AbsoluteTime::from_millis(100 * k + 80));
            assert_eq!(tcb.current_release(), Ok(AbsoluteTime::from_millis(100 * k)));
        }
    }

    #[test]
    fn test_wait_requires_activation() {
        let mut tcb = block(100, 80);
        assert_eq!(tcb.begin_wait(), Err(ControlBlockError::NotActivated));
        assert_eq!(tcb.complete_wait(), Err(ControlBlockError::NotActivated));
        assert_eq!(
            tcb.check_deadline_miss(AbsoluteTime::ZERO),
            Err(ControlBlockError::NotActivated)
        );
    }

    #[test]
    fn test_deadline_met() {
        let mut tcb = block(100, 80);
        tcb.set_activation(AbsoluteTime::from_millis(0));

        // Exactly on the deadline is not a miss
        assert_eq!(tcb.check_deadline_miss(AbsoluteTime::from_millis(80)), Ok(false));
        assert_eq!(tcb.get_deadline_miss(), 0);
    }

    #[test]
    fn test_deadline_miss_counts_every_call() {
        let mut tcb = block(100, 0);
        tcb.set_activation(AbsoluteTime::from_millis(0));

        let late = AbsoluteTime::from_nanos(1);
        for expected in 1..=3 {
            assert_eq!(tcb.check_deadline_miss(late), Ok(true));
            assert_eq!(tcb.get_deadline_miss(), expected);
        }
    }

    #[test]
    fn test_set_deadline_miss() {
        let mut tcb = block(100, 80);
        tcb.set_deadline_miss(7);
        assert_eq!(tcb.get_deadline_miss(), 7);
        tcb.set_deadline_miss(0);
        assert_eq!(tcb.get_deadline_miss(), 0);
    }

    #[test]
    fn test_set_ex_tot_bounds() {
        let mut tcb = block(100, 80);
        tcb.set_ex_tot(15).unwrap();
        assert_eq!(tcb.get_ex_tot(), 15);
        assert_eq!(
            tcb.set_ex_tot(16),
            Err(ControlBlockError::HistoryIndexOutOfRange {
                index: 16,
                capacity: 16
            })
        );
        assert_eq!(tcb.get_ex_tot(), 15);
    }

    #[test]
    fn test_rt_values_round_trip() {
        let mut tcb = block(100, 80);
        let values: [f64; 16] = core::array::from_fn(|m| m as f64 * 0.5);
        tcb.set_rt_values(&values).unwrap();

        for (m, value) in values.iter().enumerate() {
            assert_eq!(tcb.get_rt_value(m), Ok(*value));
        }
        assert!(tcb.get_rt_value(16).is_err());
        assert!(tcb.set_rt_value(16, 1.0).is_err());
    }

    #[test]
    fn test_rt_indexes_round_trip() {
        let mut tcb = block(100, 80);
        tcb.set_rt_indexes(&[10, 11, 12]).unwrap();
        assert_eq!(tcb.get_rt_index(1), Ok(11));
        tcb.set_rt_index(15, 99).unwrap();
        assert_eq!(tcb.get_rt_indexes()[15], 99);
        assert!(tcb.get_rt_index(16).is_err());
    }

    #[test]
    fn test_aggregate_setters_reject_negative() {
        let mut tcb = block(100, 80);
        assert!(tcb.set_rt_avg(-0.1).is_err());
        assert!(tcb.set_rt_max(-1.0).is_err());
        assert!(tcb.set_rt_min(-1.0).is_err());
        assert!(tcb.set_rt_tot(-1.0).is_err());
        assert!(tcb.set_rt_std(-1.0).is_err());
        assert!(tcb.set_util_inst(-1.0).is_err());
        assert!(tcb.set_util_inst_max(-1.0).is_err());
        assert!(tcb.set_util_avg(-1.0).is_err());

        tcb.set_rt_avg(4.0).unwrap();
        tcb.set_util_avg(0.25).unwrap();
        assert_eq!(tcb.get_rt_avg(), 4.0);
        assert_eq!(tcb.get_util_avg(), 0.25);
    }

    #[test]
    fn test_increment_rt_tot_accepts_negative_delta() {
        let mut tcb = block(100, 80);
        tcb.increment_rt_tot(10.0);
        tcb.increment_rt_tot(2.5);
        tcb.increment_rt_tot(-4.0);
        assert!((tcb.get_rt_tot() - 8.5).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_copies_counters() {
        let mut tcb = block(100, 80);
        tcb.set_activation(AbsoluteTime::ZERO);
        tcb.set_deadline_miss(2);
        tcb.set_ex_tot(4).unwrap();

        let snapshot = tcb.snapshot();
        assert_eq!(snapshot.index, 2);
        assert_eq!(snapshot.state, TaskState::Activated);
        assert_eq!(snapshot.deadline_misses, 2);
        assert_eq!(snapshot.execution_count, 4);
        assert_eq!(snapshot.config, TaskConfig::new(100, 80, 10));
    }
}
