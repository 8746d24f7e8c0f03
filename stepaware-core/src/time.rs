//! Time management for the polled pipeline
//!
//! Components never read a clock. The driver loop reads its monotonic
//! source once per cycle and hands the value to every `update()` call, so
//! one cycle sees one consistent "now" across all sensors.
//!
//! Sources provided here:
//! - `TimeSource` trait for whatever the platform offers
//! - `FixedTime` (manually advanced, for tests and replay)
//! - `SystemTime` when `std` is available

/// Timestamp in milliseconds since device boot (monotonic)
pub type Timestamp = u64;

/// Milliseconds elapsed from `since` to `now`
///
/// Saturates at zero so a clock that steps backwards never underflows.
#[inline]
pub fn elapsed_ms(since: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(since)
}

/// Source of time for the driver loop
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Monotonic time since the source was created (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTime {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Fixed time source for testing and replay
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute time
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_time_never_goes_backwards() {
        let clock = SystemTime::new();
        let first = clock.now();
        assert!(clock.now() >= first);
    }

    #[test]
    fn elapsed_saturates_when_clock_steps_back() {
        assert_eq!(elapsed_ms(1000, 1225), 225);
        assert_eq!(elapsed_ms(1000, 900), 0);
    }
}
