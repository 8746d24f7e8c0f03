//! Shared fixtures for integration tests
//!
//! - Scripted hardware: range finders and motion inputs that replay a fixed
//!   sequence, or expose a shared handle the test flips after the sensor has
//!   been boxed into a manager
//! - Scenario drivers that feed readings at a fixed sampling period

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use stepaware_core::time::{FixedTime, TimeSource, Timestamp};
use stepaware_core::traits::{MotionInput, RangeFinder};
use stepaware_core::{DetectionResult, DistanceDetector};

/// Sampling period used by every literal scenario (ms)
pub const SAMPLE_PERIOD_MS: u64 = 75;

/// Range finder replaying a script, then reporting "no echo"
pub struct ScriptedRange {
    readings: VecDeque<nb::Result<u32, Infallible>>,
}

impl ScriptedRange {
    pub fn new(readings: &[u32]) -> Self {
        Self {
            readings: readings.iter().map(|&d| Ok(d)).collect(),
        }
    }

    pub fn push_would_block(&mut self) {
        self.readings.push_back(Err(nb::Error::WouldBlock));
    }
}

impl RangeFinder for ScriptedRange {
    type Error = Infallible;

    fn measure_mm(&mut self) -> nb::Result<u32, Infallible> {
        self.readings.pop_front().unwrap_or(Ok(0))
    }
}

/// Range finder whose distance the test sets through a shared handle
#[derive(Clone, Default)]
pub struct SharedRange(Rc<Cell<u32>>);

impl SharedRange {
    pub fn set(&self, distance_mm: u32) {
        self.0.set(distance_mm);
    }
}

impl RangeFinder for SharedRange {
    type Error = Infallible;

    fn measure_mm(&mut self) -> nb::Result<u32, Infallible> {
        Ok(self.0.get())
    }
}

/// Motion input whose level the test sets through a shared handle
#[derive(Clone, Default)]
pub struct SharedLevel(Rc<Cell<bool>>);

impl SharedLevel {
    pub fn set(&self, level: bool) {
        self.0.set(level);
    }
}

impl MotionInput for SharedLevel {
    type Error = Infallible;

    fn read_level(&mut self) -> nb::Result<bool, Infallible> {
        Ok(self.0.get())
    }
}

/// Motion input that always fails
pub struct BrokenInput;

impl MotionInput for BrokenInput {
    type Error = &'static str;

    fn read_level(&mut self) -> nb::Result<bool, &'static str> {
        Err(nb::Error::Other("bus fault"))
    }
}

/// Feed `readings` one per sampling period, starting at the clock's time
pub fn feed(detector: &mut DistanceDetector, clock: &mut FixedTime, readings: &[u32]) -> Vec<DetectionResult> {
    readings
        .iter()
        .map(|&raw| {
            let result = detector.update(raw, clock.now());
            clock.advance(SAMPLE_PERIOD_MS);
            result
        })
        .collect()
}

/// Feed one reading at an explicit time
pub fn feed_at(detector: &mut DistanceDetector, raw_mm: u32, now: Timestamp) -> DetectionResult {
    detector.update(raw_mm, now)
}
