//! Response-time statistics engine
//!
//! Aggregates are maintained on the [`TaskControlBlock`] itself. Two kinds
//! of operations exist:
//!
//! - **Incremental** (`compute_rt_max`, `compute_rt_avg`, ...): O(1) updates
//!   that combine the sample at the write cursor with the cached aggregate.
//!   [`TaskControlBlock::record_sample`] chains them and is the default path.
//! - **From scratch** (`compute_*_from_scratch`, [`TaskControlBlock::audit_statistics`],
//!   [`TaskControlBlock::resync_statistics`]): O(n) recomputation over the
//!   stored history, used to verify or repair the cached values.
//!
//! # Cursor convention
//!
//! The `compute_*` functions operate on the sample at index
//! `execution_count`: the caller writes the sample there, calls them, stores
//! the results, and only then advances the counter. With `m` the cursor,
//! `m + 1` samples take part in every aggregate.
//!
//! All computations are pure; writing the results back is up to the caller
//! (or `record_sample`).

use super::control_block::TaskControlBlock;
use super::error::{ensure_non_negative, ControlBlockError};
use super::types::STD_DEV_UNDEFINED;

/// Response time over period, with a zero period mapped to 0 or +inf
fn utilization(response_ms: f64, period_ms: u32) -> f64 {
    if period_ms == 0 {
        if response_ms > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        response_ms / period_ms as f64
    }
}

fn max_of(samples: &[f64]) -> f64 {
    samples.iter().copied().fold(0.0, f64::max)
}

fn min_of(samples: &[f64]) -> f64 {
    samples.iter().copied().fold(f64::MAX, f64::min)
}

fn squared_deviations(samples: &[f64], mean: f64) -> f64 {
    samples
        .iter()
        .map(|value| {
            let deviation = value - mean;
            deviation * deviation
        })
        .sum()
}

/// Result of comparing cached aggregates with a from-scratch recomputation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsAudit {
    /// Number of recorded samples the recomputation used
    pub samples: usize,
    /// |cached rt_total - recomputed total|
    pub total_drift: f64,
    /// |cached rt_avg - recomputed average|
    pub avg_drift: f64,
    /// |cached rt_max - recomputed maximum|
    pub max_drift: f64,
    /// |cached rt_min - recomputed minimum|
    pub min_drift: f64,
    /// Every drift is within the requested tolerance
    pub within_tolerance: bool,
}

impl TaskControlBlock {
    /// Sample at the write cursor
    fn cursor_sample(&self) -> Result<f64, ControlBlockError> {
        self.history.value(self.execution_count)
    }

    /// Samples `[0, cursor]`, i.e. everything the cursor convention counts
    fn cursor_window(&self) -> Result<&[f64], ControlBlockError> {
        let m = self.execution_count;
        self.history.value(m)?;
        Ok(&self.history.values()[..=m])
    }

    // ------------------------------------------------------------------
    // Max / min
    // ------------------------------------------------------------------

    /// Cached maximum combined with the sample at the cursor
    pub fn compute_rt_max(&self) -> Result<f64, ControlBlockError> {
        Ok(self.cursor_sample()?.max(self.stats.rt_max))
    }

    /// Maximum over `[0, cursor]`, ignoring the cached value
    pub fn compute_rt_max_from_scratch(&self) -> Result<f64, ControlBlockError> {
        Ok(max_of(self.cursor_window()?))
    }

    /// Cached minimum combined with the sample at the cursor
    pub fn compute_rt_min(&self) -> Result<f64, ControlBlockError> {
        Ok(self.cursor_sample()?.min(self.stats.rt_min))
    }

    /// Minimum over `[0, cursor]`, ignoring the cached value
    pub fn compute_rt_min_from_scratch(&self) -> Result<f64, ControlBlockError> {
        Ok(min_of(self.cursor_window()?))
    }

    // ------------------------------------------------------------------
    // Average / standard deviation
    // ------------------------------------------------------------------

    /// `rt_total / (cursor + 1)`
    pub fn compute_rt_avg(&self) -> f64 {
        self.stats.rt_total / (self.execution_count + 1) as f64
    }

    /// Sum of `[0, cursor]` divided by `cursor + 1`
    pub fn compute_rt_avg_from_scratch(&self) -> Result<f64, ControlBlockError> {
        let window = self.cursor_window()?;
        Ok(window.iter().sum::<f64>() / window.len() as f64)
    }

    /// Bessel-corrected standard deviation of `[0, cursor]` around the cached
    /// average
    ///
    /// Returns [`STD_DEV_UNDEFINED`] while the cursor is at 0 (one sample).
    pub fn compute_std_dev(&self) -> Result<f64, ControlBlockError> {
        let window = self.cursor_window()?;
        let m = self.execution_count;
        if m == 0 {
            return Ok(STD_DEV_UNDEFINED);
        }
        let squares_sum = squared_deviations(window, self.stats.rt_avg);
        Ok(libm::sqrt(squares_sum / m as f64))
    }

    // ------------------------------------------------------------------
    // Utilization
    // ------------------------------------------------------------------

    /// Sample at the cursor over the period (not clamped to 1)
    pub fn compute_util_inst(&self) -> Result<f64, ControlBlockError> {
        Ok(utilization(self.cursor_sample()?, self.config().period_ms))
    }

    /// Cached maximum response time over the period
    pub fn compute_util_inst_max(&self) -> f64 {
        utilization(self.stats.rt_max, self.config().period_ms)
    }

    /// `rt_total / ((cursor + 1) * period)`
    pub fn compute_util_avg(&self) -> f64 {
        let elapsed_ms = (self.execution_count + 1) as f64 * self.config().period_ms as f64;
        if elapsed_ms == 0.0 {
            return utilization(self.stats.rt_total, 0);
        }
        self.stats.rt_total / elapsed_ms
    }

    // ------------------------------------------------------------------
    // Default incremental path
    // ------------------------------------------------------------------

    /// Record one response time and refresh every aggregate
    ///
    /// Writes `response_ms` and `tag` at the cursor, adds the sample to the
    /// total, updates max, min, average, standard deviation and the three
    /// utilizations (in that order), then advances the cursor.
    pub fn record_sample(&mut self, response_ms: f64, tag: u64) -> Result<(), ControlBlockError> {
        let m = self.execution_count;
        if m >= self.history.capacity() {
            return Err(ControlBlockError::HistoryFull {
                capacity: self.history.capacity(),
            });
        }
        let response_ms = ensure_non_negative("response time", response_ms)?;

        self.history.set_value(m, response_ms)?;
        self.history.set_tag(m, tag)?;
        self.stats.rt_total += response_ms;

        self.stats.rt_max = self.compute_rt_max()?;
        self.stats.rt_min = self.compute_rt_min()?;
        self.stats.rt_avg = self.compute_rt_avg();
        self.stats.rt_std = self.compute_std_dev()?;
        self.stats.util_inst = self.compute_util_inst()?;
        self.stats.util_inst_max = self.compute_util_inst_max();
        self.stats.util_avg = self.compute_util_avg();

        self.execution_count = m + 1;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Verification mode
    // ------------------------------------------------------------------

    /// Compare cached total, average, max and min with the recorded samples
    ///
    /// Only counted samples (`[0, execution_count)`) take part.
    pub fn audit_statistics(&self, tolerance: f64) -> StatsAudit {
        let samples = self.recorded_samples();
        let n = samples.len();
        let total: f64 = samples.iter().sum();
        let avg = if n > 0 { total / n as f64 } else { 0.0 };

        let total_drift = libm::fabs(self.stats.rt_total - total);
        let avg_drift = libm::fabs(self.stats.rt_avg - avg);
        let max_drift = libm::fabs(self.stats.rt_max - max_of(samples));
        let min_drift = libm::fabs(self.stats.rt_min - min_of(samples));

        StatsAudit {
            samples: n,
            total_drift,
            avg_drift,
            max_drift,
            min_drift,
            within_tolerance: total_drift <= tolerance
                && avg_drift <= tolerance
                && max_drift <= tolerance
                && min_drift <= tolerance,
        }
    }

    /// Rebuild the cached aggregates from the recorded samples
    ///
    /// `util_inst` is set from the latest recorded sample. With no samples
    /// the aggregates return to their initial values.
    pub fn resync_statistics(&mut self) {
        let period_ms = self.config().period_ms;
        let samples = self.history.prefix(self.execution_count);
        let n = samples.len();
        if n == 0 {
            self.stats.reset();
            return;
        }

        let total: f64 = samples.iter().sum();
        let avg = total / n as f64;
        let max = max_of(samples);
        let min = min_of(samples);
        let std = if n < 2 {
            STD_DEV_UNDEFINED
        } else {
            libm::sqrt(squared_deviations(samples, avg) / (n - 1) as f64)
        };
        let latest = samples[n - 1];
        let elapsed_ms = n as f64 * period_ms as f64;

        self.stats.rt_total = total;
        self.stats.rt_avg = avg;
        self.stats.rt_max = max;
        self.stats.rt_min = min;
        self.stats.rt_std = std;
        self.stats.util_inst = utilization(latest, period_ms);
        self.stats.util_inst_max = utilization(max, period_ms);
        self.stats.util_avg = if elapsed_ms == 0.0 {
            utilization(total, 0)
        } else {
            total / elapsed_ms
        };
    }
}
