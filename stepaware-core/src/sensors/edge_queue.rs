//! Interrupt edges delivered through a lock-free queue
//!
//! An interrupt handler (or any other producer) enqueues timestamped edges
//! on the `Producer` half of a `heapless::spsc::Queue`; the sensor polls the
//! `Consumer` half from its `update()`. One edge is consumed per poll so a
//! short pulse queued as rise+fall is still seen as two edges.
//!
//! ```rust
//! use heapless::spsc::Queue;
//! use stepaware_core::sensors::{EdgeEvent, EdgeQueueInput};
//! use stepaware_core::traits::MotionInput;
//!
//! let mut queue: Queue<EdgeEvent, 8> = Queue::new();
//! let (mut producer, consumer) = queue.split();
//! let mut input = EdgeQueueInput::new(consumer);
//!
//! producer.enqueue(EdgeEvent { level: true, timestamp: 120 }).unwrap();
//! assert_eq!(input.read_level(), Ok(true));
//! assert_eq!(input.last_edge_time(), Some(120));
//! ```

use core::convert::Infallible;

use heapless::spsc::Consumer;

use crate::time::Timestamp;
use crate::traits::MotionInput;

/// One level change seen by the interrupt side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    /// Level after the edge
    pub level: bool,
    /// When the edge happened
    pub timestamp: Timestamp,
}

/// `MotionInput` draining a queue of edges
pub struct EdgeQueueInput<'q, const N: usize> {
    consumer: Consumer<'q, EdgeEvent, N>,
    level: bool,
    last_edge: Option<Timestamp>,
}

impl<'q, const N: usize> EdgeQueueInput<'q, N> {
    /// Input starting low
    pub fn new(consumer: Consumer<'q, EdgeEvent, N>) -> Self {
        Self {
            consumer,
            level: false,
            last_edge: None,
        }
    }

    /// When the most recently consumed edge happened
    pub fn last_edge_time(&self) -> Option<Timestamp> {
        self.last_edge
    }

    /// Edges waiting to be consumed
    pub fn pending(&self) -> usize {
        self.consumer.len()
    }
}

impl<const N: usize> MotionInput for EdgeQueueInput<'_, N> {
    type Error = Infallible;

    fn read_level(&mut self) -> nb::Result<bool, Infallible> {
        if let Some(edge) = self.consumer.dequeue() {
            self.level = edge.level;
            self.last_edge = Some(edge.timestamp);
        }
        Ok(self.level)
    }
}
