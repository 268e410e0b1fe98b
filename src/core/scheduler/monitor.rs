//! Supervisor view of the task set
//!
//! Collects a snapshot of every created task and reports system-level
//! figures:
//! - Average and peak utilization
//! - Deadline misses
//! - Liu & Layland schedulability bound
//!
//! `collect_and_report_stats` is meant to be called periodically from a
//! supervisor thread; it only takes read locks.

use rt_taskmon_core::scheduler::{
    classify_utilization, liu_layland_bound, Feasibility, TaskSnapshot,
};
use rt_taskmon_core::traits::TimeSource;

use super::store::TaskStore;
use crate::platform::traits::ThreadSpawner;

/// Task-set summary at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerReport {
    /// Snapshot of every created task, in index order
    pub tasks: Vec<TaskSnapshot>,
    /// Sum of per-task average utilizations
    pub total_utilization: f64,
    /// Sum of per-task maximum instantaneous utilizations
    pub peak_utilization: f64,
    /// Deadline misses across all tasks
    pub total_deadline_misses: u64,
    /// `n (2^(1/n) - 1)` for the current task count
    pub liu_layland_bound: f64,
    /// Classification of `total_utilization`
    pub feasibility: Feasibility,
}

impl SchedulerReport {
    /// Build a report from task snapshots
    pub fn from_snapshots(tasks: Vec<TaskSnapshot>) -> Self {
        let n = tasks.len();
        let total_utilization = tasks.iter().map(|t| t.stats.util_avg).sum();
        let peak_utilization = tasks.iter().map(|t| t.stats.util_inst_max).sum();
        let total_deadline_misses = tasks.iter().map(|t| u64::from(t.deadline_misses)).sum();

        Self {
            tasks,
            total_utilization,
            peak_utilization,
            total_deadline_misses,
            liu_layland_bound: liu_layland_bound(n),
            feasibility: classify_utilization(total_utilization, n),
        }
    }

    /// Average utilization within the Liu & Layland bound
    pub fn within_bound(&self) -> bool {
        self.feasibility == Feasibility::Guaranteed
    }
}

/// Snapshot every created task and summarize
pub fn collect_report<C: TimeSource, S: ThreadSpawner>(store: &TaskStore<C, S>) -> SchedulerReport {
    SchedulerReport::from_snapshots(store.snapshots())
}

/// Collect a report and log it
///
/// Logs a summary line, warnings for deadline misses and utilization
/// above the bound, and one statistics line per task.
pub fn collect_and_report_stats<C: TimeSource, S: ThreadSpawner>(
    store: &TaskStore<C, S>,
) -> SchedulerReport {
    let report = collect_report(store);

    log_scheduler_summary(&report);
    check_warnings(&report);
    report_task_stats(&report);

    report
}

fn log_scheduler_summary(report: &SchedulerReport) {
    crate::log_info!(
        "Scheduler: tasks={} util={:.3} peak={:.3} bound={:.3} deadline_misses={}",
        report.tasks.len(),
        report.total_utilization,
        report.peak_utilization,
        report.liu_layland_bound,
        report.total_deadline_misses
    );
}

fn check_warnings(report: &SchedulerReport) {
    match report.feasibility {
        Feasibility::Guaranteed => {}
        Feasibility::Inconclusive => crate::log_warn!(
            "Utilization {:.3} above Liu & Layland bound {:.3}",
            report.total_utilization,
            report.liu_layland_bound
        ),
        Feasibility::Overloaded => {
            crate::log_warn!("Task set overloaded: utilization {:.3}", report.total_utilization)
        }
    }

    for task in report.tasks.iter().filter(|t| t.deadline_misses > 0) {
        crate::log_warn!("Task {}: {} deadline misses", task.index, task.deadline_misses);
    }
}

fn report_task_stats(report: &SchedulerReport) {
    for task in &report.tasks {
        let stats = &task.stats;
        if stats.has_std_dev() {
            crate::log_info!(
                "  task {}: jobs={} rt avg={:.3}ms max={:.3}ms min={:.3}ms std={:.3}ms \
                 util={:.3} misses={}",
                task.index,
                task.execution_count,
                stats.rt_avg,
                stats.rt_max,
                stats.rt_min,
                stats.rt_std,
                stats.util_avg,
                task.deadline_misses
            );
        } else {
            crate::log_info!(
                "  task {}: jobs={} rt avg={:.3}ms max={:.3}ms util={:.3} misses={}",
                task.index,
                task.execution_count,
                stats.rt_avg,
                stats.rt_max,
                stats.util_avg,
                task.deadline_misses
            );
        }
    }
}
