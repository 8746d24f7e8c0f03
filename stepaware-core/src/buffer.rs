//! Fixed-Size Ring Buffer for Per-Sensor History
//!
//! ## Overview
//!
//! Every piece of per-sample history in the pipeline (the sample window, the
//! delta history, the raw-reading trail used for approach classification)
//! is a bounded, most-recent-N view over a stream. This module provides one
//! ring buffer for all of them. Storage is sized at compile time through a
//! const generic, while the *active* capacity can be chosen at runtime up to
//! that bound, which is how the sample window supports 3-20 slots without
//! reallocating.
//!
//! ## Design Rationale
//!
//! ### Why not `heapless::Deque`?
//!
//! 1. **Automatic Overwrite**: When full, the oldest entry is discarded
//!    rather than returning an error. Recent samples matter; old ones do not.
//!
//! 2. **Runtime Capacity**: The window size is a live configuration value.
//!    Shrinking a `Deque` means popping by hand; here it is one field.
//!
//! 3. **Refill**: Sudden-appearance handling purges the window and refills it
//!    with the current distance. `fill()` does that in one pass.
//!
//! ### Memory Layout
//!
//! ```text
//! RingBuffer<u32, 20> with capacity 5:
//! ┌────┬────┬────┬────┬────┬────┬ ─ ─ ┬────┐
//! │ 0  │ 1  │ 2  │ 3  │ 4  │ -- │     │ -- │  ← only the first `capacity`
//! └────┴────┴────┴────┴────┴────┴ ─ ─ ┴────┘    slots are ever touched
//!        ↑
//!        write_pos (wraps at capacity, not at N)
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use stepaware_core::buffer::RingBuffer;
//!
//! let mut history: RingBuffer<u32, 8> = RingBuffer::with_capacity(3);
//! history.push(1200);
//! history.push(1180);
//! history.push(1150);
//! history.push(1100); // overwrites 1200
//!
//! let values: Vec<u32> = history.iter().collect();
//! assert_eq!(values, vec![1180, 1150, 1100]);
//! ```

/// Fixed-storage circular buffer with a runtime capacity
///
/// ## Internal Invariants
///
/// - `1 <= capacity <= N`
/// - `write_pos < capacity`
/// - `len <= capacity`
/// - Iteration yields entries oldest first
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Copy, const N: usize> {
    /// Storage; `None` marks slots never written since the last clear
    data: [Option<T>; N],

    /// Index where the next write will occur
    write_pos: usize,

    /// Number of valid entries
    len: usize,

    /// Active capacity (slots in use)
    capacity: usize,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Creates an empty buffer using all `N` slots
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
            capacity: N,
        }
    }

    /// Creates an empty buffer using the first `capacity` slots
    ///
    /// The capacity is clamped to `1..=N`.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.capacity = capacity.clamp(1, N);
        buffer
    }

    /// Adds an entry, overwriting the oldest once full
    pub fn push(&mut self, value: T) {
        self.data[self.write_pos] = Some(value);
        self.write_pos = (self.write_pos + 1) % self.capacity;

        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if every active slot holds an entry
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Active capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the active capacity, discarding all entries
    ///
    /// Mixing samples collected under two different window sizes would skew
    /// the statistics, so resizing always starts from empty.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.clamp(1, N);
        self.clear();
    }

    /// Most recent entry
    pub fn last(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { self.capacity - 1 } else { self.write_pos - 1 };
        self.data[idx]
    }

    /// Iterate over entries from oldest to newest
    pub fn iter(&self) -> RingBufferIter<'_, T, N> {
        RingBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Drop all entries, keeping the capacity
    pub fn clear(&mut self) {
        self.data = [None; N];
        self.write_pos = 0;
        self.len = 0;
    }

    /// Replace the contents with `capacity` copies of `value`
    pub fn fill(&mut self, value: T) {
        self.clear();
        for _ in 0..self.capacity {
            self.push(value);
        }
    }

    /// Copy the entries (oldest first) into `out`, returning how many
    pub fn copy_into(&self, out: &mut [T; N]) -> usize {
        let mut count = 0;
        for value in self.iter() {
            out[count] = value;
            count += 1;
        }
        count
    }

    /// Entry by logical index (0 = oldest, len-1 = newest)
    ///
    /// ```text
    /// Physical:  [D, E, A, B, C]  (write_pos = 2, full)
    /// Logical:   [A, B, C, D, E]
    /// logical[i] = physical[(write_pos + i) % capacity]
    /// ```
    fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.capacity {
            index
        } else {
            (self.write_pos + index) % self.capacity
        };

        self.data[actual_index]
    }
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ring buffer contents, oldest first
pub struct RingBufferIter<'a, T: Copy, const N: usize> {
    buffer: &'a RingBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for RingBufferIter<'a, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}
