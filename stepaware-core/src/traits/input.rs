//! Non-blocking hardware reads
//!
//! Drivers live outside this crate. They only have to hand over one value
//! per call, or `nb::Error::WouldBlock` when a measurement is still in
//! flight. A `WouldBlock` skips the cycle; an `Other` error is treated as an
//! invalid reading and never aborts the sampling loop.

/// Distance measuring hardware (ultrasonic echo timing, ToF, ...)
pub trait RangeFinder {
    /// Driver-specific failure
    type Error: core::fmt::Debug;

    /// Latest distance in millimetres, 0 for "no echo"
    fn measure_mm(&mut self) -> nb::Result<u32, Self::Error>;
}

/// Binary motion output (PIR pin, beam-break line, ...)
pub trait MotionInput {
    /// Driver-specific failure
    type Error: core::fmt::Debug;

    /// Current output level, `true` while motion is reported
    fn read_level(&mut self) -> nb::Result<bool, Self::Error>;
}
