//! Task control block store
//!
//! The store owns a fixed number of slots (`config::MAX_TASKS`), each
//! optionally holding a created task: its control block and the join
//! handle of its thread. Slots are addressed by the caller-chosen index.
//!
//! Every accessor takes `&self`, so a store can be shared between the
//! creating thread and supervisors (for example behind an `Arc`). Readers
//! lock the block for reading only; the task thread is the single writer.

use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Mutex, RwLock};
use rt_taskmon_core::scheduler::{ControlBlockError, TaskConfig, TaskControlBlock, TaskSnapshot};
use rt_taskmon_core::traits::TimeSource;

use super::error::TaskError;
use super::task::TaskContext;
use crate::config;
use crate::platform::traits::{ThreadSpawner, ThreadSpec};

/// Contents of an occupied slot
struct TaskSlot {
    block: Arc<RwLock<TaskControlBlock>>,
    /// Taken by the first `wait_for_end`
    handle: Option<JoinHandle<()>>,
}

/// Fixed-capacity table of periodic tasks
pub struct TaskStore<C: TimeSource, S: ThreadSpawner> {
    clock: C,
    spawner: S,
    history_capacity: usize,
    slots: Vec<Mutex<Option<TaskSlot>>>,
}

impl<C: TimeSource, S: ThreadSpawner> TaskStore<C, S> {
    /// Store with the build-time capacities
    pub fn new(clock: C, spawner: S) -> Self {
        Self::with_capacity(clock, spawner, config::MAX_TASKS, config::HISTORY_CAPACITY)
    }

    /// Store with explicit slot count and per-task history length
    pub fn with_capacity(clock: C, spawner: S, max_tasks: usize, history_capacity: usize) -> Self {
        Self {
            clock,
            spawner,
            history_capacity,
            slots: (0..max_tasks).map(|_| Mutex::new(None)).collect(),
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Samples kept per task
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    fn slot(&self, index: usize) -> Result<&Mutex<Option<TaskSlot>>, TaskError> {
        self.slots.get(index).ok_or(TaskError::IndexOutOfRange {
            index,
            capacity: self.slots.len(),
        })
    }

    fn block(&self, index: usize) -> Result<Arc<RwLock<TaskControlBlock>>, TaskError> {
        self.slot(index)?
            .lock()
            .as_ref()
            .map(|slot| slot.block.clone())
            .ok_or(TaskError::NotCreated(index))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create task `index` and start its thread
    ///
    /// The thread is named `rt-task-<index>` and requested under the
    /// round-robin class at `config.priority`. `body` receives the task's
    /// [`TaskContext`]; the task ends when `body` returns. On failure the
    /// slot stays empty.
    ///
    /// Aborts the process if the sample history cannot be allocated.
    pub fn create_task<F>(&self, index: usize, config: TaskConfig, body: F) -> Result<(), TaskError>
    where
        F: FnOnce(TaskContext<C>) + Send + 'static,
    {
        let slot = self.slot(index)?;
        config.validate(self.spawner.max_priority())?;

        let mut guard = slot.lock();
        if guard.is_some() {
            return Err(TaskError::SlotOccupied(index));
        }

        let block = match TaskControlBlock::new(index, config, self.history_capacity) {
            Ok(block) => block,
            Err(err @ ControlBlockError::AllocationFailed { .. }) => {
                crate::log_error!("Task {}: {}", index, err);
                std::process::abort();
            }
            Err(err) => return Err(err.into()),
        };
        let block = Arc::new(RwLock::new(block));

        let context = TaskContext::new(index, block.clone(), self.clock.clone());
        let spec = ThreadSpec::round_robin(format!("rt-task-{}", index), config.priority);
        let handle = self
            .spawner
            .spawn(spec, Box::new(move || body(context)))
            .map_err(|source| {
                crate::log_warn!("Task {}: thread creation failed: {}", index, source);
                TaskError::Thread { index, source }
            })?;

        *guard = Some(TaskSlot {
            block,
            handle: Some(handle),
        });

        crate::log_debug!(
            "Task {} created: period={}ms deadline={}ms priority={}",
            index,
            config.period_ms,
            config.relative_deadline_ms,
            config.priority
        );
        Ok(())
    }

    /// Block until task `index` terminates, then release its slot
    ///
    /// Returns the final snapshot. The slot is released even when the
    /// thread panicked (`JoinFailed`). There is no cancellation: a body that
    /// never returns blocks this call forever.
    pub fn wait_for_end(&self, index: usize) -> Result<TaskSnapshot, TaskError> {
        let slot = self.slot(index)?;

        let handle = slot
            .lock()
            .as_mut()
            .and_then(|task| task.handle.take())
            .ok_or(TaskError::NotCreated(index))?;

        // Slot lock is not held while joining
        let joined = handle.join();

        let task = slot.lock().take().ok_or(TaskError::NotCreated(index))?;
        let snapshot = task.block.read().snapshot();
        drop(task);

        match joined {
            Ok(()) => {
                crate::log_debug!(
                    "Task {} joined after {} jobs ({} deadline misses)",
                    index,
                    snapshot.execution_count,
                    snapshot.deadline_misses
                );
                Ok(snapshot)
            }
            Err(_) => {
                crate::log_error!("Task {}: thread panicked", index);
                Err(TaskError::JoinFailed(index))
            }
        }
    }

    // ------------------------------------------------------------------
    // Supervisor reads
    // ------------------------------------------------------------------

    /// Run `f` on a read-locked control block
    pub fn read<R>(
        &self,
        index: usize,
        f: impl FnOnce(&TaskControlBlock) -> R,
    ) -> Result<R, TaskError> {
        let block = self.block(index)?;
        let guard = block.read();
        Ok(f(&guard))
    }

    /// Consistent copy of one task (without history)
    pub fn snapshot(&self, index: usize) -> Result<TaskSnapshot, TaskError> {
        self.read(index, TaskControlBlock::snapshot)
    }

    /// Snapshots of every created task, in index order
    pub fn snapshots(&self) -> Vec<TaskSnapshot> {
        self.slots
            .iter()
            .filter_map(|slot| slot.lock().as_ref().map(|task| task.block.clone()))
            .map(|block| block.read().snapshot())
            .collect()
    }

    pub fn get_period(&self, index: usize) -> Result<u32, TaskError> {
        self.read(index, TaskControlBlock::period_ms)
    }

    pub fn get_deadline_miss(&self, index: usize) -> Result<u32, TaskError> {
        self.read(index, TaskControlBlock::get_deadline_miss)
    }

    pub fn get_rt_avg(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_rt_avg)
    }

    pub fn get_rt_max(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_rt_max)
    }

    pub fn get_rt_min(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_rt_min)
    }

    pub fn get_rt_tot(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_rt_tot)
    }

    /// Sample standard deviation, `STD_DEV_UNDEFINED` below two samples
    pub fn get_rt_std(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_rt_std)
    }

    pub fn get_util_inst(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_util_inst)
    }

    pub fn get_util_inst_max(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_util_inst_max)
    }

    pub fn get_util_avg(&self, index: usize) -> Result<f64, TaskError> {
        self.read(index, TaskControlBlock::get_util_avg)
    }

    /// Samples recorded so far
    pub fn get_ex_tot(&self, index: usize) -> Result<usize, TaskError> {
        self.read(index, TaskControlBlock::get_ex_tot)
    }

    /// Response time stored in history slot `m`
    pub fn get_rt_value(&self, index: usize, m: usize) -> Result<f64, TaskError> {
        Ok(self.read(index, |tcb| tcb.get_rt_value(m))??)
    }

    /// Tag stored in history slot `m`
    pub fn get_rt_index(&self, index: usize, m: usize) -> Result<u64, TaskError> {
        Ok(self.read(index, |tcb| tcb.get_rt_index(m))??)
    }

    /// Copy of the full response-time history (all `CAP` slots)
    pub fn get_rt_values(&self, index: usize) -> Result<Vec<f64>, TaskError> {
        self.read(index, |tcb| tcb.get_rt_values().to_vec())
    }

    /// Copy of the full tag history (all `CAP` slots)
    pub fn get_rt_indexes(&self, index: usize) -> Result<Vec<u64>, TaskError> {
        self.read(index, |tcb| tcb.get_rt_indexes().to_vec())
    }

    // ------------------------------------------------------------------
    // Task-set queries
    // ------------------------------------------------------------------

    /// Number of created (not yet joined) tasks
    pub fn task_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    fn configs(&self) -> impl Iterator<Item = TaskConfig> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.lock().as_ref().map(|task| task.block.clone()))
            .map(|block| *block.read().config())
    }

    /// Highest priority among created tasks
    pub fn task_get_max_priority(&self) -> Option<u8> {
        self.configs().map(|config| config.priority).max()
    }

    /// Longest period among created tasks
    pub fn task_get_max_period(&self) -> Option<u32> {
        self.configs().map(|config| config.period_ms).max()
    }
}
