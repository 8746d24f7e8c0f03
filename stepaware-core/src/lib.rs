//! Perception pipeline for the StepAware hazard-warning appliance
//!
//! Turns noisy, asynchronous proximity and motion samples into a single
//! "hazard present, direction X" signal. Three components, leaves first:
//!
//! - [`detection`]: per-sensor distance engine (median window, movement,
//!   direction stability, gradual vs. sudden approach classification)
//! - [`confirmer`]: far/near binary sensor pair state machine that confirms
//!   an approach only for a far→near trigger sequence
//! - [`fusion`]: owns up to four sensors and combines them under one policy
//!
//! Key constraints:
//! - Polled, never pushed: every time-based decision compares a caller
//!   supplied monotonic timestamp against stored transition times
//! - No blocking, no I/O, no panics in the sampling path
//! - Fixed-size buffers for all per-sample state
//!
//! ```no_run
//! use stepaware_core::{DetectorConfig, DistanceDetector, MotionDirection};
//!
//! let mut detector = DistanceDetector::new(DetectorConfig::default());
//!
//! // Feed one raw reading per sampling cycle (0 = no echo)
//! let result = detector.update(1320, 1_000);
//! if result.in_range && result.direction == MotionDirection::Approaching {
//!     // Raise the warning
//! }
//! ```
//!
//! A full driver loop reads the clock once per cycle and hands the same
//! timestamp to every sensor:
//!
//! ```no_run
//! use core::convert::Infallible;
//! use stepaware_core::time::{SystemTime, TimeSource};
//! use stepaware_core::{
//!     DistanceSensor, FusionMode, RangeFinder, SensorConfig, SensorManager, SensorType,
//! };
//!
//! struct Sonar;
//!
//! impl RangeFinder for Sonar {
//!     type Error = Infallible;
//!
//!     fn measure_mm(&mut self) -> nb::Result<u32, Infallible> {
//!         Ok(1200) // read the echo pin here
//!     }
//! }
//!
//! let config = SensorConfig::for_type(SensorType::Ultrasonic);
//! let sonar = DistanceSensor::from_config(Sonar, &config).unwrap();
//!
//! let mut manager = SensorManager::new();
//! manager.set_fusion_mode(FusionMode::Any);
//! manager.add_sensor(0, Box::new(sonar), config, Some("Hallway"), true).unwrap();
//! manager.validate_configuration().unwrap();
//!
//! let clock = SystemTime::new();
//! manager.begin(clock.now()).unwrap();
//! loop {
//!     manager.update(clock.now());
//!     if manager.is_motion_detected() {
//!         // Raise the warning
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(75));
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod buffer;
pub mod confirmer;
pub mod constants;
pub mod detection;
pub mod errors;
pub mod fusion;
pub mod sensors;
pub mod time;
pub mod traits;
pub mod types;

// Public API
pub use confirmer::{ConfirmerConfig, DualSensorConfirmer, DualSensorState};
pub use detection::{ApproachKind, ApproachTracking, DetectionResult, DetectorConfig, DistanceDetector};
pub use errors::{ConfigError, ConfigResult};
pub use fusion::{CombinedStatus, FusionMode, SensorManager, SensorSlot, SlotReport};
pub use sensors::{DistanceSensor, EdgeEvent, EdgeQueueInput, PirSensor};
pub use time::Timestamp;
pub use traits::{MotionInput, MotionSensor, RangeFinder};
pub use types::{
    DirectionTriggerMode, MotionDirection, MotionEvent, SensorCapabilities, SensorConfig,
    SensorStatus, SensorType,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
