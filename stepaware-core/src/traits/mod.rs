//! Contracts Between the Pipeline and Its Collaborators
//!
//! Two seams exist:
//!
//! - [`sensor`]: the polymorphic motion-sensor interface every concrete
//!   sensor implements and the fusion manager and dual confirmer consume
//! - [`input`]: the non-blocking hardware reads that concrete sensors are
//!   built on (`nb` style, so a driver can report "not yet" without blocking)
//!
//! ```text
//!   RangeFinder ──→ DistanceSensor ─┐
//!                                   ├─ MotionSensor ──→ SensorManager
//!   MotionInput ──→ PirSensor ──────┘                └─→ DualSensorConfirmer
//! ```

pub mod input;
pub mod sensor;

pub use input::{MotionInput, RangeFinder};
pub use sensor::MotionSensor;
