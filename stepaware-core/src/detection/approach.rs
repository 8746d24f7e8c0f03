//! Gradual vs. sudden approach classification
//!
//! Raw readings (before windowing) decide how far an in-range object is
//! trusted:
//!
//! ```text
//!                  far readings trending closer, then near
//!   NoObject ───────────────────────────────────────────→ Confirmed(Gradual)
//!      │
//!      │ N near readings with no trend
//!      ▼
//!   AwaitingConfirmation ──M cycles + consistent direction──→ Confirmed(Sudden)
//!
//!   any tracking state ──object gone──→ NoObject
//! ```

use crate::buffer::RingBuffer;
use crate::constants::detection::{GRADUAL_TREND_READINGS, RAW_HISTORY_SIZE};

/// How an in-range object was first seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApproachKind {
    /// Tracked from outside the detection range into it
    Gradual,
    /// Appeared inside the detection range without a prior trend
    Sudden,
}

/// Per-sensor approach tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApproachTracking {
    /// Nothing tracked
    #[default]
    NoObject,
    /// Sudden appearance waiting for a consistent direction
    AwaitingConfirmation {
        /// Update cycles since the appearance
        cycles: u8,
    },
    /// Object trusted for triggering
    Confirmed(ApproachKind),
}

impl ApproachTracking {
    /// Object is trusted for triggering
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ApproachTracking::Confirmed(_))
    }

    /// Anything other than `NoObject`
    pub fn is_tracking(&self) -> bool {
        !matches!(self, ApproachTracking::NoObject)
    }
}

/// Where one raw reading falls relative to the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawZone {
    /// 0 (no echo) or closer than the minimum range
    NoEcho,
    /// Inside the detection threshold
    Near,
    /// Beyond the detection threshold, including past the valid range
    Far,
}

/// What a raw reading did to the tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApproachStep {
    Unchanged,
    Gradual,
    SuddenAppearance,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ApproachTracker {
    state: ApproachTracking,
    raw_history: RingBuffer<u32, RAW_HISTORY_SIZE>,
    last_zone: Option<RawZone>,
    far_trend: u8,
    near_streak: u8,
}

impl ApproachTracker {
    pub(crate) fn state(&self) -> ApproachTracking {
        self.state
    }

    /// Raw readings seen most recently, oldest first
    pub(crate) fn recent_raw(&self) -> impl Iterator<Item = u32> + '_ {
        self.raw_history.iter()
    }

    /// Feed one raw reading
    pub(crate) fn observe(&mut self, raw_mm: u32, zone: RawZone, sudden_readings: u8) -> ApproachStep {
        let previous_raw = self.raw_history.last();
        let previous_zone = self.last_zone;
        self.raw_history.push(raw_mm);
        self.last_zone = Some(zone);

        match zone {
            RawZone::NoEcho => {
                self.far_trend = 0;
                self.near_streak = 0;
                ApproachStep::Unchanged
            }
            RawZone::Far => {
                let closing = previous_zone == Some(RawZone::Far)
                    && previous_raw.is_some_and(|prev| raw_mm <= prev);
                self.far_trend = if closing { self.far_trend.saturating_add(1) } else { 1 };
                self.near_streak = 0;
                ApproachStep::Unchanged
            }
            RawZone::Near => self.observe_near(previous_zone, sudden_readings),
        }
    }

    fn observe_near(&mut self, previous_zone: Option<RawZone>, sudden_readings: u8) -> ApproachStep {
        if self.state != ApproachTracking::NoObject {
            return ApproachStep::Unchanged;
        }

        if previous_zone == Some(RawZone::Far) && self.far_trend >= GRADUAL_TREND_READINGS {
            self.state = ApproachTracking::Confirmed(ApproachKind::Gradual);
            self.far_trend = 0;
            self.near_streak = 0;
            return ApproachStep::Gradual;
        }

        self.near_streak = self.near_streak.saturating_add(1);
        if self.near_streak >= sudden_readings {
            self.state = ApproachTracking::AwaitingConfirmation { cycles: 0 };
            self.near_streak = 0;
            return ApproachStep::SuddenAppearance;
        }

        ApproachStep::Unchanged
    }

    /// Count one cycle of a pending sudden appearance
    ///
    /// Returns the cycle count, or `None` when nothing is pending.
    pub(crate) fn tick_awaiting(&mut self) -> Option<u8> {
        match &mut self.state {
            ApproachTracking::AwaitingConfirmation { cycles } => {
                *cycles = cycles.saturating_add(1);
                Some(*cycles)
            }
            _ => None,
        }
    }

    pub(crate) fn confirm_sudden(&mut self) {
        self.state = ApproachTracking::Confirmed(ApproachKind::Sudden);
    }

    /// Object gone; the raw trend survives so a re-approach is still gradual
    pub(crate) fn lose_object(&mut self) {
        self.state = ApproachTracking::NoObject;
        self.near_streak = 0;
    }

    /// Forget everything, including the raw trend
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
