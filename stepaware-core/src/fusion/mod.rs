//! Multi-Sensor Fusion
//!
//! ## Overview
//!
//! Up to four sensors of any kind are combined into one system verdict so
//! the consumer never special-cases "how many sensors, of what kind":
//!
//! ```text
//! slot 0 ──┐
//! slot 1 ──┼─→ FusionMode ─→ motion detected? + CombinedStatus
//! slot 2 ──┤
//! slot 3 ──┘
//! ```
//!
//! ## Policies
//!
//! | Mode              | Verdict                                            |
//! |-------------------|----------------------------------------------------|
//! | `Any`             | at least one ready, enabled slot detects           |
//! | `All`             | every ready, enabled slot detects (and one exists) |
//! | `TriggerMeasure`  | the primary slot detects; others add data only     |
//! | `Independent`     | the primary slot detects; others reported apart    |
//!
//! ## Ownership
//!
//! The manager owns every sensor as `Box<dyn MotionSensor>`. Removing a
//! sensor hands the box back; dropping the manager drops every sensor.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod manager;
pub mod slot;
pub mod status;

pub use manager::SensorManager;
pub use slot::SensorSlot;
pub use status::{CombinedStatus, SlotReport};

/// Rule combining per-slot verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FusionMode {
    /// Any enabled slot detecting
    #[default]
    Any = 0,
    /// Every enabled slot detecting
    All = 1,
    /// Primary slot triggers, secondaries measure
    TriggerMeasure = 2,
    /// Primary slot decides, secondaries reported separately
    Independent = 3,
}

impl FusionMode {
    /// Upper-case mode name
    pub const fn name(&self) -> &'static str {
        match self {
            FusionMode::Any => "ANY",
            FusionMode::All => "ALL",
            FusionMode::TriggerMeasure => "TRIGGER_MEASURE",
            FusionMode::Independent => "INDEPENDENT",
        }
    }

    /// Verdict comes from the primary slot alone
    pub const fn uses_primary(&self) -> bool {
        matches!(self, FusionMode::TriggerMeasure | FusionMode::Independent)
    }
}

impl fmt::Display for FusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
