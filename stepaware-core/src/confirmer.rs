//! Dual-Sensor Direction Confirmation
//!
//! ## Overview
//!
//! Two binary motion sensors cover a far zone and a near zone. Something
//! walking toward the device trips the far sensor first and the near sensor
//! a little later. A hand waved in front of the near sensor, or both sensors
//! firing together, says nothing about direction. This state machine only
//! reports `Approaching` for the far→near sequence with a plausible gap.
//!
//! ## State Machine
//!
//! ```text
//!   IDLE ──far↑──→ FAR_ONLY ──near↑ (500 ms ≤ gap ≤ 5000 ms)──→ APPROACHING
//!    │                │                                            │
//!    │                └──near↑ (any other gap)──┐                  │
//!    │                                          ▼                  │
//!    └──near↑──→ NEAR_ONLY ──far↑──────────→ BOTH_ACTIVE           │
//!                                               │                  │
//!         IDLE ←──────── both sensors clear ────┴──────────────────┘
//! ```
//!
//! FAR_ONLY and NEAR_ONLY also fall back to IDLE when their own sensor
//! clears, and every non-IDLE state does so once it is older than the
//! pattern timeout.
//!
//! Ambiguous patterns (simultaneous, too slow, or starting with the near
//! sensor) increment `unknown_count`, at most once per pattern. A far-only
//! pattern that times out is ambiguous too.
//!
//! ## Timing
//!
//! Polled: the caller passes `now` on every update and all decisions compare
//! it against the transition times stored here.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::confirmer::{
    DEFAULT_CONFIRMATION_WINDOW_MS, DEFAULT_PATTERN_TIMEOUT_MS, DEFAULT_SIMULTANEOUS_THRESHOLD_MS,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::time::{elapsed_ms, Timestamp};
use crate::traits::MotionSensor;
use crate::types::MotionDirection;

/// Far/near pattern state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DualSensorState {
    /// Neither sensor has started a pattern
    #[default]
    Idle,
    /// Far sensor triggered, waiting for the near sensor
    FarOnly,
    /// Near sensor triggered without a preceding far trigger
    NearOnly,
    /// Both triggered without a valid approach sequence
    BothActive,
    /// Confirmed far→near approach
    Approaching,
}

impl DualSensorState {
    /// Upper-case state name
    pub const fn name(&self) -> &'static str {
        match self {
            DualSensorState::Idle => "IDLE",
            DualSensorState::FarOnly => "FAR_ONLY",
            DualSensorState::NearOnly => "NEAR_ONLY",
            DualSensorState::BothActive => "BOTH_ACTIVE",
            DualSensorState::Approaching => "APPROACHING",
        }
    }
}

impl fmt::Display for DualSensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pattern timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfirmerConfig {
    /// Longest far→near gap that still confirms an approach (ms)
    pub confirmation_window_ms: u32,
    /// Gaps shorter than this are simultaneous, not sequential (ms)
    pub simultaneous_threshold_ms: u32,
    /// Any unfinished pattern older than this is dropped (ms)
    pub pattern_timeout_ms: u32,
}

impl Default for ConfirmerConfig {
    fn default() -> Self {
        Self {
            confirmation_window_ms: DEFAULT_CONFIRMATION_WINDOW_MS,
            simultaneous_threshold_ms: DEFAULT_SIMULTANEOUS_THRESHOLD_MS,
            pattern_timeout_ms: DEFAULT_PATTERN_TIMEOUT_MS,
        }
    }
}

impl ConfirmerConfig {
    /// Reject timing under which no approach could ever be recognised
    pub fn validate(&self) -> ConfigResult<()> {
        if self.confirmation_window_ms < self.simultaneous_threshold_ms {
            return Err(ConfigError::ConfirmationWindowTooShort {
                window_ms: self.confirmation_window_ms,
                simultaneous_ms: self.simultaneous_threshold_ms,
            });
        }
        if self.pattern_timeout_ms < self.confirmation_window_ms {
            return Err(ConfigError::PatternTimeoutTooShort {
                timeout_ms: self.pattern_timeout_ms,
                window_ms: self.confirmation_window_ms,
            });
        }
        Ok(())
    }
}

/// Far/near binary sensor pair direction confirmer
#[derive(Debug, Clone, Default)]
pub struct DualSensorConfirmer {
    config: ConfirmerConfig,
    state: DualSensorState,
    state_since: Option<Timestamp>,
    far_trigger_time: Option<Timestamp>,
    confirmed_at: Option<Timestamp>,
    far_level: bool,
    near_level: bool,
    pattern_counted: bool,
    approaching_count: u32,
    unknown_count: u32,
}

impl DualSensorConfirmer {
    /// Confirmer with validated timing
    pub fn new(config: ConfirmerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Seed the edge detector with the sensors' current levels
    ///
    /// A sensor already high at start-up does not produce a rising edge.
    pub fn begin(&mut self, far: bool, near: bool) {
        self.reset();
        self.far_level = far;
        self.near_level = near;
        log_debug!("dual confirmer started (far: {}, near: {})", far, near);
    }

    /// Feed both sensor levels sampled at `now`
    pub fn update(&mut self, far: bool, near: bool, now: Timestamp) -> DualSensorState {
        let far_rise = far && !self.far_level;
        let near_rise = near && !self.near_level;
        let far_fall = !far && self.far_level;
        let near_fall = !near && self.near_level;
        self.far_level = far;
        self.near_level = near;

        self.check_timeout(now);

        if far_rise {
            self.far_trigger_time = Some(now);
        }

        match self.state {
            DualSensorState::Idle => {
                if far_rise && near_rise {
                    self.count_unknown("simultaneous trigger");
                    self.transition(DualSensorState::BothActive, now);
                } else if far_rise {
                    self.transition(DualSensorState::FarOnly, now);
                } else if near_rise {
                    self.count_unknown("near trigger without far trigger");
                    self.transition(DualSensorState::NearOnly, now);
                }
            }
            DualSensorState::FarOnly => {
                if near_rise {
                    self.on_near_after_far(now);
                } else if far_fall && !near {
                    self.transition(DualSensorState::Idle, now);
                }
            }
            DualSensorState::NearOnly => {
                if far_rise {
                    // Already counted as ambiguous on entry
                    self.transition(DualSensorState::BothActive, now);
                } else if near_fall && !far {
                    self.transition(DualSensorState::Idle, now);
                }
            }
            DualSensorState::BothActive | DualSensorState::Approaching => {
                if !far && !near {
                    self.transition(DualSensorState::Idle, now);
                }
            }
        }

        self.state
    }

    /// Feed the current verdicts of two sensors
    ///
    /// A sensor that is not ready counts as not triggered.
    pub fn update_from(&mut self, far: &dyn MotionSensor, near: &dyn MotionSensor, now: Timestamp) -> DualSensorState {
        let far_level = far.is_ready() && far.motion_detected();
        let near_level = near.is_ready() && near.motion_detected();
        self.update(far_level, near_level, now)
    }

    fn on_near_after_far(&mut self, now: Timestamp) {
        let gap = self.gap_since(self.far_trigger_time, now);

        if gap < u64::from(self.config.simultaneous_threshold_ms) {
            self.count_unknown("near too soon after far");
            self.transition(DualSensorState::BothActive, now);
        } else if gap > u64::from(self.config.confirmation_window_ms) {
            self.count_unknown("near outside confirmation window");
            self.transition(DualSensorState::BothActive, now);
        } else {
            self.approaching_count = self.approaching_count.saturating_add(1);
            self.pattern_counted = true;
            self.confirmed_at = Some(now);
            log_info!("approach confirmed, far->near gap {} ms", gap);
            self.transition(DualSensorState::Approaching, now);
        }
    }

    fn check_timeout(&mut self, now: Timestamp) {
        if self.state == DualSensorState::Idle {
            return;
        }
        let Some(since) = self.state_since else {
            return;
        };

        if elapsed_ms(since, now) > u64::from(self.config.pattern_timeout_ms) {
            if self.state != DualSensorState::Approaching {
                self.count_unknown("pattern timed out");
            }
            self.transition(DualSensorState::Idle, now);
        }
    }

    fn gap_since(&self, trigger: Option<Timestamp>, now: Timestamp) -> u64 {
        trigger.map_or(0, |t| elapsed_ms(t, now))
    }

    fn count_unknown(&mut self, _reason: &'static str) {
        if !self.pattern_counted {
            self.unknown_count = self.unknown_count.saturating_add(1);
            self.pattern_counted = true;
            log_debug!("ambiguous pattern: {}", _reason);
        }
    }

    fn transition(&mut self, next: DualSensorState, now: Timestamp) {
        log_debug!("dual sensor {} -> {}", self.state, next);
        self.state = next;
        self.state_since = Some(now);

        if next == DualSensorState::Idle {
            self.far_trigger_time = None;
            self.confirmed_at = None;
            self.pattern_counted = false;
        }
    }

    /// Return to IDLE, keeping statistics and sensor levels
    pub fn reset(&mut self) {
        self.state = DualSensorState::Idle;
        self.state_since = None;
        self.far_trigger_time = None;
        self.confirmed_at = None;
        self.pattern_counted = false;
    }

    /// Zero approach and ambiguous-pattern counters
    pub fn reset_statistics(&mut self) {
        self.approaching_count = 0;
        self.unknown_count = 0;
    }

    /// Replace all timing
    pub fn set_config(&mut self, config: ConfirmerConfig) -> ConfigResult<()> {
        config.validate().inspect_err(|e| log_warn!("confirmer config rejected: {}", e))?;
        self.config = config;
        Ok(())
    }

    /// Change the confirmation window
    pub fn set_confirmation_window(&mut self, window_ms: u32) -> ConfigResult<()> {
        self.set_config(ConfirmerConfig {
            confirmation_window_ms: window_ms,
            ..self.config
        })
    }

    /// Change the simultaneous-trigger threshold
    pub fn set_simultaneous_threshold(&mut self, threshold_ms: u32) -> ConfigResult<()> {
        self.set_config(ConfirmerConfig {
            simultaneous_threshold_ms: threshold_ms,
            ..self.config
        })
    }

    /// Change the pattern timeout
    pub fn set_pattern_timeout(&mut self, timeout_ms: u32) -> ConfigResult<()> {
        self.set_config(ConfirmerConfig {
            pattern_timeout_ms: timeout_ms,
            ..self.config
        })
    }

    /// Active timing
    pub fn config(&self) -> &ConfirmerConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> DualSensorState {
        self.state
    }

    /// Current state name
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// `Approaching` while an approach is confirmed, `Unknown` otherwise
    pub fn direction(&self) -> MotionDirection {
        if self.state == DualSensorState::Approaching {
            MotionDirection::Approaching
        } else {
            MotionDirection::Unknown
        }
    }

    /// A full far→near pattern was recognised
    pub fn is_direction_confirmed(&self) -> bool {
        self.state == DualSensorState::Approaching
    }

    /// Far sensor triggered, pattern not finished yet
    pub fn is_tentative(&self) -> bool {
        self.state == DualSensorState::FarOnly
    }

    /// Time since the approach was confirmed (ms), 0 when not confirmed
    pub fn direction_confidence_ms(&self, now: Timestamp) -> u64 {
        match (self.state, self.confirmed_at) {
            (DualSensorState::Approaching, Some(at)) => elapsed_ms(at, now),
            _ => 0,
        }
    }

    /// Confirmed approaches
    pub fn approaching_count(&self) -> u32 {
        self.approaching_count
    }

    /// Ambiguous patterns
    pub fn unknown_count(&self) -> u32 {
        self.unknown_count
    }

    /// Far sensor level seen by the last update
    pub fn far_level(&self) -> bool {
        self.far_level
    }

    /// Near sensor level seen by the last update
    pub fn near_level(&self) -> bool {
        self.near_level
    }
}
