//! Bounded response-time history
//!
//! Each task owns two parallel buffers allocated once at creation: the raw
//! response times and an external tag per sample (typically the period
//! index at which the sample was taken). Both always have exactly
//! `capacity` slots; unwritten slots read as zero.

use alloc::vec::Vec;

use super::error::{ensure_non_negative, ControlBlockError};

/// Parallel response-time and tag buffers of fixed capacity
#[derive(Debug, Clone)]
pub struct SampleHistory {
    values: Vec<f64>,
    tags: Vec<u64>,
}

impl SampleHistory {
    /// Allocate both buffers with `capacity` zeroed slots
    ///
    /// Allocation goes through `try_reserve_exact` so exhaustion surfaces as
    /// [`ControlBlockError::AllocationFailed`] instead of an allocator abort.
    pub fn with_capacity(capacity: usize) -> Result<Self, ControlBlockError> {
        let mut values = Vec::new();
        let mut tags = Vec::new();
        values
            .try_reserve_exact(capacity)
            .map_err(|_| ControlBlockError::AllocationFailed { capacity })?;
        tags.try_reserve_exact(capacity)
            .map_err(|_| ControlBlockError::AllocationFailed { capacity })?;
        values.resize(capacity, 0.0);
        tags.resize(capacity, 0);
        Ok(Self { values, tags })
    }

    /// Number of slots in each buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    fn check_index(&self, index: usize) -> Result<(), ControlBlockError> {
        if index < self.capacity() {
            Ok(())
        } else {
            Err(ControlBlockError::HistoryIndexOutOfRange {
                index,
                capacity: self.capacity(),
            })
        }
    }

    fn check_len(&self, len: usize) -> Result<(), ControlBlockError> {
        if len > 0 && len <= self.capacity() {
            Ok(())
        } else {
            Err(ControlBlockError::InvalidLength {
                len,
                capacity: self.capacity(),
            })
        }
    }

    /// Response time stored at `index`
    pub fn value(&self, index: usize) -> Result<f64, ControlBlockError> {
        self.check_index(index)?;
        Ok(self.values[index])
    }

    /// Store a response time at `index`
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<(), ControlBlockError> {
        self.check_index(index)?;
        self.values[index] = ensure_non_negative("response time", value)?;
        Ok(())
    }

    /// Tag stored at `index`
    pub fn tag(&self, index: usize) -> Result<u64, ControlBlockError> {
        self.check_index(index)?;
        Ok(self.tags[index])
    }

    /// Store a tag at `index`
    pub fn set_tag(&mut self, index: usize, tag: u64) -> Result<(), ControlBlockError> {
        self.check_index(index)?;
        self.tags[index] = tag;
        Ok(())
    }

    /// All response-time slots
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// All tag slots
    pub fn tags(&self) -> &[u64] {
        &self.tags
    }

    /// Overwrite the first `values.len()` response-time slots
    ///
    /// The whole slice is validated before anything is written.
    pub fn set_values(&mut self, values: &[f64]) -> Result<(), ControlBlockError> {
        self.check_len(values.len())?;
        for &value in values {
            ensure_non_negative("response time", value)?;
        }
        self.values[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Overwrite the first `tags.len()` tag slots
    pub fn set_tags(&mut self, tags: &[u64]) -> Result<(), ControlBlockError> {
        self.check_len(tags.len())?;
        self.tags[..tags.len()].copy_from_slice(tags);
        Ok(())
    }

    /// Response times in `[0, end)`, clamped to the capacity
    pub fn prefix(&self, end: usize) -> &[f64] {
        &self.values[..end.min(self.capacity())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_allocation() {
        let history = SampleHistory::with_capacity(8).unwrap();
        assert_eq!(history.capacity(), 8);
        assert_eq!(history.values().len(), 8);
        assert_eq!(history.tags().len(), 8);
        assert!(history.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_history_allocation_failure() {
        let result = SampleHistory::with_capacity(usize::MAX / 4);
        assert_eq!(
            result.err(),
            Some(ControlBlockError::AllocationFailed {
                capacity: usize::MAX / 4
            })
        );
    }

    #[test]
    fn test_history_value_bounds() {
        let mut history = SampleHistory::with_capacity(4).unwrap();
        history.set_value(3, 1.5).unwrap();
        assert_eq!(history.value(3), Ok(1.5));

        assert_eq!(
            history.set_value(4, 1.0),
            Err(ControlBlockError::HistoryIndexOutOfRange {
                index: 4,
                capacity: 4
            })
        );
        assert!(history.value(4).is_err());
        assert!(history.tag(100).is_err());
    }

    #[test]
    fn test_history_rejects_negative_value() {
        let mut history = SampleHistory::with_capacity(4).unwrap();
        assert!(history.set_value(0, -2.0).is_err());
        assert_eq!(history.value(0), Ok(0.0));
    }

    #[test]
    fn test_history_bulk_round_trip() {
        let mut history = SampleHistory::with_capacity(5).unwrap();
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        history.set_values(&values).unwrap();

        for (m, expected) in values.iter().enumerate() {
            assert_eq!(history.value(m), Ok(*expected));
        }
        assert!(history.value(5).is_err());
    }

    #[test]
    fn test_history_bulk_length_checks() {
        let mut history = SampleHistory::with_capacity(3).unwrap();
        assert_eq!(
            history.set_values(&[]),
            Err(ControlBlockError::InvalidLength {
                len: 0,
                capacity: 3
            })
        );
        assert!(history.set_tags(&[1, 2, 3, 4]).is_err());
        history.set_tags(&[7, 8]).unwrap();
        assert_eq!(history.tags(), &[7, 8, 0]);
    }

    #[test]
    fn test_history_bulk_rejects_any_negative() {
        let mut history = SampleHistory::with_capacity(3).unwrap();
        assert!(history.set_values(&[1.0, -1.0]).is_err());
        // Nothing written
        assert_eq!(history.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_history_prefix_clamps() {
        let mut history = SampleHistory::with_capacity(3).unwrap();
        history.set_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(history.prefix(2), &[1.0, 2.0]);
        assert_eq!(history.prefix(10).len(), 3);
        assert!(history.prefix(0).is_empty());
    }
}
