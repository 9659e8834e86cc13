//! ID batch scheduling
//!
//! This module turns an inclusive ID range into the consecutive batches the
//! coordinator runs. Every batch holds exactly `batch_size` IDs except
//! possibly the last one of a bounded range. An open upper bound yields
//! batches until the coordinator stops asking.

/// Iterator over consecutive batches of IDs
#[derive(Debug, Clone)]
pub struct IdBatches {
    /// First ID of the next batch, None once the range is used up
    next: Option<u64>,

    /// Inclusive upper bound, None for an open-ended scan
    max_id: Option<u64>,

    batch_size: u64,
}

impl IdBatches {
    /// Creates the batch sequence for `[start_id, max_id]`
    ///
    /// A batch size of zero is treated as one.
    pub fn new(start_id: u64, max_id: Option<u64>, batch_size: usize) -> Self {
        Self {
            next: Some(start_id),
            max_id,
            batch_size: batch_size.max(1) as u64,
        }
    }

    /// Returns how many batches a bounded range produces
    ///
    /// Returns None for open-ended ranges.
    pub fn planned_batches(start_id: u64, max_id: Option<u64>, batch_size: usize) -> Option<u64> {
        let max_id = max_id?;
        if start_id > max_id {
            return Some(0);
        }
        let size = max_id - start_id + 1;
        let batch_size = batch_size.max(1) as u64;
        Some(size.div_ceil(batch_size))
    }
}

impl Iterator for IdBatches {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next?;
        let limit = self.max_id.unwrap_or(u64::MAX);

        if start > limit {
            self.next = None;
            return None;
        }

        let last = start.saturating_add(self.batch_size - 1).min(limit);
        self.next = last.checked_add(1);

        Some((start..=last).collect())
    }
}
