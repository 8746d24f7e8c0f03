//! Median windows over distance samples and snapshot deltas
//!
//! The median, not the mean, summarises both windows so one outlier echo
//! cannot move the aggregate. An even number of entries averages the two
//! middle values.

use crate::buffer::RingBuffer;
use crate::constants::detection::{DELTA_HISTORY_SIZE, MAX_WINDOW_SIZE};

const WINDOW_STORAGE: usize = MAX_WINDOW_SIZE as usize;

/// Rolling window of the most recent valid distance samples
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: RingBuffer<u32, WINDOW_STORAGE>,
}

impl SampleWindow {
    /// Empty window holding `size` samples (clamped to 1-20)
    pub fn new(size: u8) -> Self {
        Self {
            samples: RingBuffer::with_capacity(size as usize),
        }
    }

    /// Add a valid sample
    pub fn push(&mut self, distance_mm: u32) {
        self.samples.push(distance_mm);
    }

    /// Window holds `size` samples
    pub fn is_filled(&self) -> bool {
        self.samples.is_full()
    }

    /// Samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// No samples held
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured size
    pub fn size(&self) -> usize {
        self.samples.capacity()
    }

    /// Resize, discarding every sample
    pub fn resize(&mut self, size: u8) {
        self.samples.set_capacity(size as usize);
    }

    /// Discard every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Replace the history with `size` copies of one distance
    pub fn refill(&mut self, distance_mm: u32) {
        self.samples.fill(distance_mm);
    }

    /// Median of the held samples
    pub fn median(&self) -> Option<u32> {
        let mut scratch = [0u32; WINDOW_STORAGE];
        let count = self.samples.copy_into(&mut scratch);
        median_u32(&mut scratch[..count])
    }

    /// Held samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter()
    }
}

/// Recent signed deltas between consecutive window medians
#[derive(Debug, Clone, Default)]
pub struct DeltaHistory {
    deltas: RingBuffer<i32, DELTA_HISTORY_SIZE>,
}

impl DeltaHistory {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one delta (negative = distance shrinking)
    pub fn push(&mut self, delta_mm: i32) {
        self.deltas.push(delta_mm);
    }

    /// Median of the recorded deltas
    pub fn median(&self) -> Option<i32> {
        let mut scratch = [0i32; DELTA_HISTORY_SIZE];
        let count = self.deltas.copy_into(&mut scratch);
        median_i32(&mut scratch[..count])
    }

    /// Deltas held
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Nothing recorded
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Forget every delta
    pub fn clear(&mut self) {
        self.deltas.clear();
    }
}

fn median_u32(values: &mut [u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let (a, b) = (values[mid - 1] as u64, values[mid] as u64);
        Some(((a + b) / 2) as u32)
    }
}

fn median_i32(values: &mut [i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let (a, b) = (values[mid - 1] as i64, values[mid] as i64);
        Some(((a + b) / 2) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_ignores_single_outlier() {
        let mut window = SampleWindow::new(5);
        for d in [1200, 1210, 3900, 1190, 1205] {
            window.push(d);
        }
        assert!(window.is_filled());
        assert_eq!(window.median(), Some(1205));
    }

    #[test]
    fn even_count_averages_middle_pair() {
        let mut window = SampleWindow::new(5);
        window.push(2000);
        window.push(1850);
        assert!(!window.is_filled());
        assert_eq!(window.median(), Some(1925));
    }

    #[test]
    fn empty_window_has_no_median() {
        let window = SampleWindow::new(10);
        assert_eq!(window.median(), None);
        assert!(DeltaHistory::new().median().is_none());
    }

    #[test]
    fn refill_purges_history() {
        let mut window = SampleWindow::new(4);
        window.push(3000);
        window.push(2500);
        window.refill(1390);
        assert!(window.is_filled());
        assert_eq!(window.median(), Some(1390));
    }

    #[test]
    fn delta_median_filters_spike() {
        let mut history = DeltaHistory::new();
        for delta in [-80, -75, 160, -90, -70] {
            history.push(delta);
        }
        assert_eq!(history.median(), Some(-75));
    }

    #[test]
    fn negative_even_median_truncates_toward_zero() {
        let mut history = DeltaHistory::new();
        history.push(-75);
        history.push(-150);
        assert_eq!(history.median(), Some(-112));
    }
}
