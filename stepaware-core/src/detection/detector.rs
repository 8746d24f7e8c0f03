//! Distance detection engine
//!
//! One [`DistanceDetector`] per physical distance sensor. The caller reads
//! the hardware and hands over one raw reading per cycle; the detector
//! never blocks and never fails on bad data.
//!
//! ## Per-cycle pipeline
//!
//! ```text
//! raw ─┬─→ ApproachTracker (raw trend, sudden appearance)
//!      │
//!      └─→ [min,max]? ─→ SampleWindow ─median─→ snapshot
//!                                                 │ delta
//!                                                 ▼
//!                               movement test + DirectionTracker
//!                                                 │
//!        in_range = filled ∧ median ≤ threshold ∧ approach confirmed
//!        triggered = in_range ∧ direction matches trigger mode
//! ```
//!
//! A raw reading of 0 always means "no echo" and never enters the window.
//! Readings outside the valid range are kept out of the window too but
//! still feed the raw trend, so an object walking in from beyond the range
//! is recognised as a gradual approach.

use super::approach::{ApproachStep, ApproachTracker, ApproachTracking, RawZone};
use super::config::{validate_range, validate_threshold, validate_window_size, DetectorConfig};
use super::direction::DirectionTracker;
use super::window::SampleWindow;
use crate::errors::ConfigResult;
use crate::time::Timestamp;
use crate::types::{DirectionTriggerMode, MotionDirection, MotionEvent};

/// Outcome of one update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionResult {
    /// Filled window whose median is inside the detection range, with a
    /// confirmed approach
    pub in_range: bool,
    /// `in_range` and the direction satisfies the trigger mode
    pub triggered: bool,
    /// Window median (mm), 0 when no object
    pub distance_mm: u32,
    /// Reported direction, `Unknown` until the window is filled
    pub direction: MotionDirection,
    /// This cycle's snapshot delta passed the movement test
    pub moving: bool,
    /// This cycle's snapshot delta (mm, negative = closer)
    pub delta_mm: i32,
    /// Approach classification
    pub approach: ApproachTracking,
    /// Most recent threshold event
    pub last_event: MotionEvent,
    /// Threshold events since the last counter reset
    pub event_count: u32,
    /// When the last threshold event happened
    pub last_event_time: Option<Timestamp>,
}

/// Median-window distance detector with dual-mode approach tracking
#[derive(Debug, Clone)]
pub struct DistanceDetector {
    config: DetectorConfig,
    window: SampleWindow,
    direction: DirectionTracker,
    approach: ApproachTracker,
    snapshot: Option<u32>,
    invalid_streak: u32,
    far_streak: u32,
    median_reached: bool,
    last_input: Option<(u32, Timestamp)>,
    result: DetectionResult,
}

impl Default for DistanceDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl DistanceDetector {
    /// Create a detector, forcing out-of-bounds settings into range
    pub fn new(config: DetectorConfig) -> Self {
        if config.validate().is_err() {
            log_warn!("detector config out of bounds, clamping: {:?}", config);
        }
        let config = config.sanitized();

        Self {
            config,
            window: SampleWindow::new(config.window_size),
            direction: DirectionTracker::new(),
            approach: ApproachTracker::default(),
            snapshot: None,
            invalid_streak: 0,
            far_streak: 0,
            median_reached: false,
            last_input: None,
            result: DetectionResult::default(),
        }
    }

    /// Create a detector, rejecting out-of-bounds settings
    pub fn try_new(config: DetectorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Process one raw reading taken at `now`
    ///
    /// Calling twice with the same reading and timestamp changes nothing,
    /// unless a setter ran in between.
    pub fn update(&mut self, raw_mm: u32, now: Timestamp) -> DetectionResult {
        if self.last_input == Some((raw_mm, now)) {
            return self.result;
        }
        self.last_input = Some((raw_mm, now));

        let zone = self.zone_of(raw_mm);
        self.far_streak = if zone == RawZone::Far { self.far_streak.saturating_add(1) } else { 0 };
        let was_awaiting = matches!(
            self.approach.state(),
            ApproachTracking::AwaitingConfirmation { .. }
        );

        let (delta_mm, moving) = match self
            .approach
            .observe(raw_mm, zone, self.config.sudden_appearance_readings)
        {
            ApproachStep::SuddenAppearance => {
                log_debug!("sudden appearance at {} mm, refilling window", raw_mm);
                self.window.refill(raw_mm);
                self.direction.clear();
                self.snapshot = Some(raw_mm);
                self.invalid_streak = 0;
                (0, false)
            }
            ApproachStep::Gradual => {
                log_debug!("gradual approach confirmed at {} mm", raw_mm);
                self.sample(raw_mm, now)
            }
            ApproachStep::Unchanged => self.sample(raw_mm, now),
        };

        if was_awaiting {
            self.check_sudden_confirmation();
        }

        let stale = self.invalid_streak >= self.window.size() as u32;
        let median = if stale { None } else { self.window.median() };
        let median_near = median.is_some_and(|m| m <= self.config.detection_threshold_mm);

        if self.approach.state().is_tracking() {
            if median_near {
                self.median_reached = true;
            }
            if self.object_lost(stale, median_near) {
                log_debug!("object lost (stale: {})", stale);
                self.approach.lose_object();
                self.median_reached = false;
            }
        }

        let filled = self.window.is_filled() && !stale;
        let in_range = filled && median_near && self.approach.state().is_confirmed();
        let direction = if filled { self.direction.reported() } else { MotionDirection::Unknown };
        let triggered = in_range && (!self.config.direction_enabled || self.config.trigger_mode.matches(direction));

        let mut result = DetectionResult {
            in_range,
            triggered,
            distance_mm: median.unwrap_or(0),
            direction,
            moving,
            delta_mm,
            approach: self.approach.state(),
            ..self.result
        };

        if in_range != self.result.in_range {
            result.event_count = result.event_count.saturating_add(1);
            result.last_event_time = Some(now);
            result.last_event = if in_range {
                MotionEvent::ThresholdCrossed
            } else {
                MotionEvent::Cleared
            };
            log_trace!("in_range -> {} at {} mm", in_range, result.distance_mm);
        }

        self.result = result;
        result
    }

    /// Loss is judged on the window median once it has reached the
    /// threshold. Before that, only a window's worth of consecutive far
    /// raw readings drops the object.
    fn object_lost(&self, stale: bool, median_near: bool) -> bool {
        if stale {
            return true;
        }
        if self.median_reached {
            !median_near
        } else {
            self.far_streak >= self.window.size() as u32
        }
    }

    fn zone_of(&self, raw_mm: u32) -> RawZone {
        if raw_mm == 0 || raw_mm < self.config.min_distance_mm {
            RawZone::NoEcho
        } else if raw_mm <= self.config.detection_threshold_mm {
            RawZone::Near
        } else {
            RawZone::Far
        }
    }

    fn is_windowable(&self, raw_mm: u32) -> bool {
        raw_mm != 0 && (self.config.min_distance_mm..=self.config.max_distance_mm).contains(&raw_mm)
    }

    /// Window a valid reading and run movement/direction on the new median
    fn sample(&mut self, raw_mm: u32, now: Timestamp) -> (i32, bool) {
        if !self.is_windowable(raw_mm) {
            self.invalid_streak = self.invalid_streak.saturating_add(1);
            return (0, false);
        }
        self.invalid_streak = 0;
        self.window.push(raw_mm);

        let Some(median) = self.window.median() else {
            return (0, false);
        };
        let previous = self.snapshot.replace(median);

        let Some(previous) = previous else {
            return (0, false);
        };
        let delta_mm = (i64::from(median) - i64::from(previous)) as i32;
        let moving = self.config.is_movement(delta_mm);

        if let Some(direction) = self.direction.observe(
            delta_mm,
            moving,
            now,
            self.config.direction_sensitivity_mm,
            self.config.stability_ms,
        ) {
            log_debug!("direction -> {}", direction);
        }

        (delta_mm, moving)
    }

    fn check_sudden_confirmation(&mut self) {
        let Some(cycles) = self.approach.tick_awaiting() else {
            return;
        };

        let required = self.config.confirmation_cycles;
        if cycles >= required && self.direction.consistency() >= required {
            log_debug!("sudden appearance confirmed after {} cycles", cycles);
            self.approach.confirm_sudden();
        }
    }

    /// Drop window, history and approach state; the event counter survives
    fn reset_tracking(&mut self) {
        self.window.clear();
        self.direction.clear();
        self.approach.reset();
        self.snapshot = None;
        self.invalid_streak = 0;
        self.far_streak = 0;
        self.median_reached = false;
        self.last_input = None;
    }

    /// Zero all window and state-machine data
    ///
    /// Event counter and last event are kept; a reset is not an event.
    pub fn reset(&mut self) {
        self.reset_tracking();
        self.result = DetectionResult {
            last_event: self.result.last_event,
            event_count: self.result.event_count,
            last_event_time: self.result.last_event_time,
            ..DetectionResult::default()
        };
    }

    /// Replace the whole configuration and start over
    pub fn reconfigure(&mut self, config: DetectorConfig) -> ConfigResult<()> {
        config.validate().inspect_err(|e| log_warn!("detector config rejected: {}", e))?;
        self.config = config;
        self.window.resize(config.window_size);
        self.reset();
        Ok(())
    }

    /// Change the detection threshold
    ///
    /// Pending approach classification is discarded.
    pub fn set_detection_threshold(&mut self, threshold_mm: u32) -> ConfigResult<()> {
        validate_threshold(threshold_mm, self.config.min_distance_mm, self.config.max_distance_mm)
            .inspect_err(|e| log_warn!("threshold rejected: {}", e))?;

        self.config.detection_threshold_mm = threshold_mm;
        self.approach.reset();
        self.median_reached = false;
        self.last_input = None;
        Ok(())
    }

    /// Change the valid distance range
    ///
    /// The window and all in-flight state are discarded.
    pub fn set_distance_range(&mut self, min_mm: u32, max_mm: u32) -> ConfigResult<()> {
        validate_range(min_mm, max_mm)
            .and_then(|()| validate_threshold(self.config.detection_threshold_mm, min_mm, max_mm))
            .inspect_err(|e| log_warn!("range rejected: {}", e))?;

        self.config.min_distance_mm = min_mm;
        self.config.max_distance_mm = max_mm;
        self.reset_tracking();
        Ok(())
    }

    /// Change the window size (3-20)
    ///
    /// The window and all in-flight state are discarded.
    pub fn set_window_size(&mut self, size: u8) -> ConfigResult<()> {
        validate_window_size(size).inspect_err(|e| log_warn!("window size rejected: {}", e))?;

        self.config.window_size = size;
        self.window.resize(size);
        self.reset_tracking();
        Ok(())
    }

    /// Change the sampling period the movement threshold scales with
    pub fn set_sample_interval(&mut self, interval_ms: u32) {
        self.config.sample_interval_ms = interval_ms;
        self.last_input = None;
    }

    /// Change the median delta needed to call a direction
    pub fn set_direction_sensitivity(&mut self, sensitivity_mm: u32) {
        self.config.direction_sensitivity_mm = sensitivity_mm;
        self.last_input = None;
    }

    /// Change which directions trigger
    pub fn set_trigger_mode(&mut self, mode: DirectionTriggerMode) {
        self.config.trigger_mode = mode;
        self.last_input = None;
    }

    /// Turn direction gating on or off
    pub fn set_direction_enabled(&mut self, enabled: bool) {
        self.config.direction_enabled = enabled;
        self.last_input = None;
    }

    /// Zero the event counter
    pub fn reset_event_count(&mut self) {
        self.result.event_count = 0;
    }

    /// Active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Result of the most recent update
    pub fn result(&self) -> &DetectionResult {
        &self.result
    }

    /// Object inside the detection range and trusted
    pub fn in_range(&self) -> bool {
        self.result.in_range
    }

    /// In range and moving in a triggering direction
    pub fn is_triggered(&self) -> bool {
        self.result.triggered
    }

    /// Reported distance (mm)
    pub fn distance_mm(&self) -> u32 {
        self.result.distance_mm
    }

    /// Reported direction
    pub fn direction(&self) -> MotionDirection {
        self.result.direction
    }

    /// Approach classification
    pub fn approach(&self) -> ApproachTracking {
        self.approach.state()
    }

    /// Threshold events since the last counter reset
    pub fn event_count(&self) -> u32 {
        self.result.event_count
    }

    /// When the last threshold event happened
    pub fn last_event_time(&self) -> Option<Timestamp> {
        self.result.last_event_time
    }

    /// Window holds a full set of samples
    pub fn window_filled(&self) -> bool {
        self.window.is_filled()
    }

    /// Median of the current window contents
    pub fn window_median(&self) -> Option<u32> {
        self.window.median()
    }

    /// Valid samples currently windowed
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Most recent raw readings, including invalid ones, oldest first
    pub fn recent_raw(&self) -> impl Iterator<Item = u32> + '_ {
        self.approach.recent_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ApproachKind;
    use crate::errors::ConfigError;
    use alloc::vec::Vec;

    fn detector() -> DistanceDetector {
        DistanceDetector::new(
            DetectorConfig::default()
                .with_threshold(1500)
                .with_window_size(5)
                .with_sample_interval(75),
        )
    }

    fn feed(detector: &mut DistanceDetector, readings: &[u32], start: Timestamp) -> Vec<DetectionResult> {
        readings
            .iter()
            .enumerate()
            .map(|(i, &raw)| detector.update(raw, start + i as u64 * 75))
            .collect()
    }

    #[test]
    fn gradual_approach_triggers_without_delay() {
        let mut detector = detector();
        let results = feed(&mut detector, &[2000, 1850, 1700, 1550, 1500, 1450, 1400], 0);

        assert_eq!(results[4].approach, ApproachTracking::Confirmed(ApproachKind::Gradual));
        assert_eq!(results[4].direction, MotionDirection::Approaching);
        assert!(results[..6].iter().all(|r| !r.in_range));

        let last = results[6];
        assert!(last.in_range);
        assert!(last.triggered);
        assert_eq!(last.distance_mm, 1500);
        assert_eq!(last.last_event, MotionEvent::ThresholdCrossed);
        assert_eq!(last.event_count, 1);
        assert_eq!(last.last_event_time, Some(450));
    }

    #[test]
    fn sudden_appearance_waits_for_confirmation() {
        let mut detector = detector();
        let results = feed(&mut detector, &[1400, 1380, 1390, 1390, 1385], 0);

        assert!(results[..4].iter().all(|r| !r.in_range));
        assert_eq!(results[2].approach, ApproachTracking::AwaitingConfirmation { cycles: 0 });
        assert_eq!(results[3].approach, ApproachTracking::AwaitingConfirmation { cycles: 1 });

        assert!(results[4].in_range);
        assert_eq!(results[4].approach, ApproachTracking::Confirmed(ApproachKind::Sudden));
        // Stationary object: in range, but not an approach
        assert!(!results[4].triggered);
    }

    #[test]
    fn repeated_input_is_idempotent() {
        let mut detector = detector();
        feed(&mut detector, &[1400, 1380, 1390, 1390], 0);
        let before = *detector.result();

        let again = detector.update(1390, 225);
        assert_eq!(again, before);
        assert_eq!(detector.approach(), ApproachTracking::AwaitingConfirmation { cycles: 1 });
    }

    #[test]
    fn zero_readings_never_enter_window() {
        let mut detector = detector();
        feed(&mut detector, &[2000, 0, 2100, 0], 0);

        assert_eq!(detector.window_len(), 2);
        assert!(!detector.window_filled());
        assert_eq!(detector.window_median(), Some(2050));
        assert_eq!(detector.direction(), MotionDirection::Unknown);
    }

    #[test]
    fn object_leaving_emits_cleared() {
        let mut detector = detector();
        feed(&mut detector, &[1400, 1380, 1390, 1390, 1385], 0);
        assert!(detector.in_range());

        let results = feed(&mut detector, &[2500, 2500, 2500], 375);
        assert!(results[0].in_range);
        assert!(results[1].in_range);
        assert!(!results[2].in_range);
        assert_eq!(results[2].last_event, MotionEvent::Cleared);
        assert_eq!(results[2].event_count, 2);
        assert_eq!(detector.approach(), ApproachTracking::NoObject);
    }

    #[test]
    fn lost_echo_goes_stale_after_a_window() {
        let mut detector = detector();
        feed(&mut detector, &[1400, 1380, 1390, 1390, 1385], 0);

        let results = feed(&mut detector, &[0, 0, 0, 0, 0], 375);
        assert!(results[3].in_range);
        assert!(!results[4].in_range);
        assert_eq!(results[4].distance_mm, 0);
        assert_eq!(results[4].approach, ApproachTracking::NoObject);
    }

    #[test]
    fn gradual_object_retreating_before_median_arrives_is_lost() {
        let mut detector = detector();
        feed(&mut detector, &[2000, 1850, 1700, 1550, 1480], 0);
        assert_eq!(detector.approach(), ApproachTracking::Confirmed(ApproachKind::Gradual));

        let results = feed(&mut detector, &[1600, 1700, 1800, 1900, 2000], 375);
        assert!(results[..4]
            .iter()
            .all(|r| r.approach == ApproachTracking::Confirmed(ApproachKind::Gradual)));
        assert_eq!(results[4].approach, ApproachTracking::NoObject);
        assert!(results.iter().all(|r| !r.in_range));
    }

    #[test]
    fn setter_invalidates_repeated_input() {
        let mut detector = detector();
        feed(&mut detector, &[1400, 1380, 1390, 1390, 1385], 0);
        assert!(detector.in_range());
        assert!(!detector.is_triggered());

        detector.set_direction_enabled(false);
        let result = detector.update(1385, 300);
        assert!(result.triggered);
        assert_eq!(result.event_count, 1);
    }

    #[test]
    fn invalid_settings_are_rejected_and_kept() {
        let mut detector = detector();

        assert!(matches!(detector.set_window_size(25), Err(ConfigError::WindowSize { .. })));
        assert_eq!(detector.config().window_size, 5);

        assert!(matches!(
            detector.set_detection_threshold(5000),
            Err(ConfigError::ThresholdOutsideRange { .. })
        ));
        assert!(matches!(detector.set_distance_range(1000, 800), Err(ConfigError::InvalidRange { .. })));
        assert!(matches!(
            detector.set_distance_range(100, 1000),
            Err(ConfigError::ThresholdOutsideRange { .. })
        ));
        assert_eq!(detector.config().detection_threshold_mm, 1500);
    }

    #[test]
    fn resizing_discards_in_flight_state() {
        let mut detector = detector();
        feed(&mut detector, &[1400, 1380, 1390], 0);
        assert!(detector.approach().is_tracking());

        detector.set_window_size(7).unwrap();
        assert_eq!(detector.approach(), ApproachTracking::NoObject);
        assert_eq!(detector.window_len(), 0);
        assert_eq!(detector.config().window_size, 7);
    }

    #[test]
    fn reset_keeps_event_counter() {
        let mut detector = detector();
        feed(&mut detector, &[1400, 1380, 1390, 1390, 1385], 0);
        assert_eq!(detector.event_count(), 1);

        detector.reset();
        assert!(!detector.in_range());
        assert_eq!(detector.event_count(), 1);

        detector.reset_event_count();
        assert_eq!(detector.event_count(), 0);
    }

    #[test]
    fn constructor_clamps_window() {
        let detector = DistanceDetector::new(DetectorConfig::default().with_window_size(50));
        assert_eq!(detector.config().window_size, 20);
        assert!(DistanceDetector::try_new(DetectorConfig::default().with_window_size(50)).is_err());
    }
}
