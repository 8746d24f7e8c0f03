//! Concrete Sensors
//!
//! Each sensor *has* a detection engine and *implements* [`MotionSensor`]
//! by delegating to it; hardware access goes through the non-blocking
//! [`RangeFinder`] / [`MotionInput`] seams.
//!
//! - [`DistanceSensor`]: ultrasonic-style range finder + `DistanceDetector`
//! - [`PirSensor`]: binary motion output with warm-up and edge counting
//! - [`EdgeQueueInput`]: `MotionInput` fed from an interrupt-side queue of
//!   timestamped edges, drained one edge per poll
//!
//! [`MotionSensor`]: crate::traits::MotionSensor
//! [`RangeFinder`]: crate::traits::RangeFinder
//! [`MotionInput`]: crate::traits::MotionInput

pub mod distance;
pub mod edge_queue;
pub mod pir;

pub use distance::DistanceSensor;
pub use edge_queue::{EdgeEvent, EdgeQueueInput};
pub use pir::PirSensor;
