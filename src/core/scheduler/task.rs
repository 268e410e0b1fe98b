//! Task context and instrumented execution
//!
//! A [`TaskContext`] is handed to the body of every task thread. It is the
//! only handle able to mutate the task's control block: it is not `Clone`
//! and it is moved into the thread, so each block has exactly one writer.
//! Supervisors read the same block through the store.

use std::sync::Arc;

use parking_lot::RwLock;
use rt_taskmon_core::scheduler::{TaskControlBlock, TaskSnapshot};
use rt_taskmon_core::traits::{AbsoluteTime, TimeSource};

use super::error::TaskError;

/// Outcome of one instrumented job
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceReport {
    /// Time from the release of the current period to completion, ms
    pub response_time_ms: f64,
    /// Whether completion came after the absolute deadline
    pub deadline_missed: bool,
    /// Whether the sample made it into the history (false once it is full)
    pub recorded: bool,
}

/// Writer handle for one task's control block
pub struct TaskContext<C: TimeSource> {
    index: usize,
    block: Arc<RwLock<TaskControlBlock>>,
    clock: C,
}

impl<C: TimeSource> TaskContext<C> {
    pub(crate) fn new(index: usize, block: Arc<RwLock<TaskControlBlock>>, clock: C) -> Self {
        Self { index, block, clock }
    }

    /// Store index of the task owning this context
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current time on the store's clock
    pub fn now(&self) -> AbsoluteTime {
        self.clock.now()
    }

    /// Start periodic execution from the current time
    ///
    /// The first activation is one period from now and the first absolute
    /// deadline is one relative deadline from now.
    pub fn set_activation(&mut self) {
        let now = self.clock.now();
        self.block.write().set_activation(now);
    }

    /// Sleep until the next activation, then advance to the following period
    ///
    /// The wake-up target is absolute, so latency in one period does not
    /// shift later ones. No lock is held while sleeping.
    pub fn wait_for_period(&mut self) -> Result<(), TaskError> {
        let target = self.block.write().begin_wait()?;
        self.clock.sleep_until(target);
        self.block.write().complete_wait()?;
        Ok(())
    }

    /// Count a deadline miss if the current time is past the absolute deadline
    ///
    /// Call at most once per period.
    pub fn check_deadline_miss(&mut self) -> Result<bool, TaskError> {
        let now = self.clock.now();
        Ok(self.block.write().check_deadline_miss(now)?)
    }

    /// Record a response-time sample and refresh every aggregate
    pub fn record_sample(&mut self, response_ms: f64, tag: u64) -> Result<(), TaskError> {
        Ok(self.block.write().record_sample(response_ms, tag)?)
    }

    /// Run one job and record its response time
    ///
    /// The response time is measured from the release of the current period
    /// (one period before the next activation) to the return of `f`. The
    /// deadline is checked once, then the sample is stored under `tag`.
    /// A full history does not stop the deadline check; it only clears
    /// `InstanceReport::recorded`. Fails only before `set_activation`.
    ///
    /// # Example
    ///
    /// ```
    /// use rt_taskmon::platform::host::{InheritedSpawner, StdClock};
    /// use rt_taskmon::{TaskConfig, TaskStore};
    ///
    /// let store = TaskStore::new(StdClock::new(), InheritedSpawner::new());
    /// store
    ///     .create_task(0, TaskConfig::new(10, 10, 1), |mut ctx| {
    ///         ctx.set_activation();
    ///         for job in 0..3 {
    ///             let (_, report) = ctx.execute_instance(job, || job * 2).unwrap();
    ///             assert!(report.response_time_ms >= 0.0);
    ///             ctx.wait_for_period().unwrap();
    ///         }
    ///     })
    ///     .unwrap();
    /// let last = store.wait_for_end(0).unwrap();
    /// assert_eq!(last.execution_count, 3);
    /// ```
    pub fn execute_instance<F, R>(
        &mut self,
        tag: u64,
        f: F,
    ) -> Result<(R, InstanceReport), TaskError>
    where
        F: FnOnce() -> R,
    {
        let release = self.block.read().current_release()?;

        let result = f();

        let now = self.clock.now();
        let response_time_ms = now.elapsed_ms_since(release);

        let (deadline_missed, record) = {
            let mut block = self.block.write();
            let missed = block.check_deadline_miss(now)?;
            (missed, block.record_sample(response_time_ms, tag))
        };

        if let Err(err) = record {
            crate::log_warn!("Task {}: job {} not recorded: {}", self.index, tag, err);
        }

        if deadline_missed {
            crate::log_warn!(
                "Task {}: deadline missed (job {} took {:.3}ms, deadline {}ms)",
                self.index,
                tag,
                response_time_ms,
                self.block.read().relative_deadline_ms()
            );
        }

        Ok((
            result,
            InstanceReport {
                response_time_ms,
                deadline_missed,
                recorded: record.is_ok(),
            },
        ))
    }

    /// Consistent copy of this task's control block
    pub fn snapshot(&self) -> TaskSnapshot {
        self.block.read().snapshot()
    }

    /// Read access to the full control block
    pub fn read<R>(&self, f: impl FnOnce(&TaskControlBlock) -> R) -> R {
        f(&self.block.read())
    }

    /// Write access to the full control block
    ///
    /// For the manual compute-then-store cycle (`compute_rt_max` then
    /// `set_rt_max`), bulk history setters and `resync_statistics`.
    /// Supervisors reading through the store never observe a partial
    /// update made inside `f`.
    pub fn write<R>(&mut self, f: impl FnOnce(&mut TaskControlBlock) -> R) -> R {
        f(&mut self.block.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_taskmon_core::scheduler::{ControlBlockError, TaskConfig, TaskState};
    use rt_taskmon_core::traits::MockTime;

    fn context(config: TaskConfig, capacity: usize, clock: MockTime) -> TaskContext<MockTime> {
        let block = TaskControlBlock::new(4, config, capacity).unwrap();
        TaskContext::new(4, Arc::new(RwLock::new(block)), clock)
    }

    #[test]
    fn test_index() {
        let ctx = context(TaskConfig::new(10, 10, 1), 8, MockTime::new());
        assert_eq!(ctx.index(), 4);
    }

    #[test]
    fn test_wait_before_activation_fails() {
        let mut ctx = context(TaskConfig::new(10, 10, 1), 8, MockTime::new());
        assert!(matches!(
            ctx.wait_for_period(),
            Err(TaskError::ControlBlock(ControlBlockError::NotActivated))
        ));
    }

    #[test]
    fn test_wait_for_period_is_drift_free() {
        let clock = MockTime::with_initial(AbsoluteTime::from_millis(1_000));
        let mut ctx = context(TaskConfig::new(50, 50, 1), 8, clock.clone());
        ctx.set_activation();

        for k in 1..=6u64 {
            // Jitter inside the period must not leak into the next target
            clock.advance_nanos(7_300_000 + k * 1_000);
            ctx.wait_for_period().unwrap();
            assert_eq!(clock.now(), AbsoluteTime::from_millis(1_000 + k * 50));
        }
        assert_eq!(ctx.snapshot().state, TaskState::Running);
    }

    #[test]
    fn test_execute_instance_measures_from_release() {
        let clock = MockTime::new();
        let mut ctx = context(TaskConfig::new(100, 30, 1), 8, clock.clone());
        ctx.set_activation();

        let job_clock = clock.clone();
        let (value, report) = ctx
            .execute_instance(11, || {
                job_clock.advance_ms(12);
                "done"
            })
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(report.response_time_ms, 12.0);
        assert!(!report.deadline_missed);

        ctx.wait_for_period().unwrap();
        let job_clock = clock.clone();
        let (_, report) = ctx.execute_instance(12, || job_clock.advance_ms(45)).unwrap();
        assert_eq!(report.response_time_ms, 45.0);
        assert!(report.deadline_missed);

        ctx.read(|tcb| {
            assert_eq!(tcb.get_ex_tot(), 2);
            assert_eq!(tcb.get_rt_index(1).unwrap(), 12);
            assert_eq!(tcb.get_deadline_miss(), 1);
            assert_eq!(tcb.get_rt_max(), 45.0);
        });
    }

    #[test]
    fn test_execute_instance_history_full() {
        let clock = MockTime::new();
        let mut ctx = context(TaskConfig::new(10, 10, 1), 2, clock);
        ctx.set_activation();
        assert!(ctx.execute_instance(0, || ()).unwrap().1.recorded);
        assert!(ctx.execute_instance(1, || ()).unwrap().1.recorded);

        let (value, report) = ctx.execute_instance(2, || 7).unwrap();
        assert_eq!(value, 7);
        assert!(!report.recorded);
        assert_eq!(ctx.snapshot().execution_count, 2);
    }

    #[test]
    fn test_late_job_counted_when_history_full() {
        let clock = MockTime::new();
        let mut ctx = context(TaskConfig::new(100, 10, 1), 1, clock.clone());
        ctx.set_activation();
        ctx.execute_instance(0, || ()).unwrap();
        ctx.wait_for_period().unwrap();

        let job_clock = clock.clone();
        let (value, report) = ctx
            .execute_instance(1, || {
                job_clock.advance_ms(50);
                "late"
            })
            .unwrap();
        assert_eq!(value, "late");
        assert!(report.deadline_missed);
        assert!(!report.recorded);
        assert_eq!(report.response_time_ms, 50.0);
        assert_eq!(ctx.snapshot().deadline_misses, 1);
    }

    #[test]
    fn test_execute_instance_before_activation_fails() {
        let mut ctx = context(TaskConfig::new(10, 10, 1), 2, MockTime::new());
        assert!(matches!(
            ctx.execute_instance(0, || ()),
            Err(TaskError::ControlBlock(ControlBlockError::NotActivated))
        ));
    }

    #[test]
    fn test_write_runs_manual_statistics_cycle() {
        let mut ctx = context(TaskConfig::new(20, 20, 1), 4, MockTime::new());
        ctx.write(|tcb| {
            tcb.set_rt_value(0, 6.0)?;
            tcb.increment_rt_tot(6.0);
            let max = tcb.compute_rt_max()?;
            tcb.set_rt_max(max)?;
            tcb.set_ex_tot(1)
        })
        .unwrap();

        ctx.read(|tcb| {
            assert_eq!(tcb.get_rt_max(), 6.0);
            assert_eq!(tcb.get_rt_tot(), 6.0);
            assert_eq!(tcb.get_ex_tot(), 1);
        });
    }

    #[test]
    fn test_zero_deadline_counts_every_check() {
        let clock = MockTime::new();
        let mut ctx = context(TaskConfig::new(100, 0, 1), 4, clock.clone());
        ctx.set_activation();
        clock.advance_ms(1);
        assert!(ctx.check_deadline_miss().unwrap());
        assert!(ctx.check_deadline_miss().unwrap());
        assert_eq!(ctx.snapshot().deadline_misses, 2);
    }
}
