//! Sensor fusion manager

use alloc::boxed::Box;

use heapless::Vec;

use super::slot::SensorSlot;
use super::status::{CombinedStatus, SlotReport};
use super::FusionMode;
use crate::constants::fusion::{MAX_SENSORS, TRIGGER_MEASURE_MIN_SENSORS};
use crate::errors::{ConfigError, ConfigResult};
use crate::time::Timestamp;
use crate::traits::MotionSensor;
use crate::types::{MotionDirection, SensorConfig};

/// Owns up to [`MAX_SENSORS`] sensors and fuses their verdicts
///
/// ## Lifecycle
///
/// ```text
/// add_sensor(..) ─→ validate_configuration() ─→ begin(now)
///                                                 │
///                   ┌─────────────────────────────┘
///                   ▼
///        loop { update(now); is_motion_detected(); status() }
/// ```
///
/// Configuration failures are returned to the caller and also kept in
/// [`last_error`](Self::last_error) for later display.
#[derive(Debug)]
pub struct SensorManager {
    slots: [SensorSlot; MAX_SENSORS],
    mode: FusionMode,
    started: bool,
    last_update: Option<Timestamp>,
    last_error: Option<ConfigError>,
}

impl Default for SensorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorManager {
    /// Manager with every slot empty, in `Any` mode
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|i| SensorSlot::empty(i as u8)),
            mode: FusionMode::default(),
            started: false,
            last_update: None,
            last_error: None,
        }
    }

    /// Start every installed sensor
    ///
    /// All sensors are attempted; the first failure is returned.
    pub fn begin(&mut self, now: Timestamp) -> ConfigResult<()> {
        self.started = true;
        self.last_update = Some(now);

        let mut first_error = None;
        for slot in self.slots.iter_mut() {
            let index = slot.index();
            if let Some(sensor) = slot.sensor_mut() {
                if let Err(err) = sensor.begin(now) {
                    log_warn!("slot {}: begin failed: {}", index, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(self.record(err)),
            None => {
                log_info!("sensor manager started with {} sensor(s)", self.sensor_count());
                Ok(())
            }
        }
    }

    /// Install a sensor in an empty slot
    ///
    /// The sensor is configured with `config`; sensors added after
    /// [`begin`](Self::begin) are started immediately. Marking a sensor as
    /// primary does not clear the flag on other slots; use
    /// [`set_primary`](Self::set_primary) for that.
    pub fn add_sensor(
        &mut self,
        slot: u8,
        mut sensor: Box<dyn MotionSensor>,
        config: SensorConfig,
        name: Option<&str>,
        is_primary: bool,
    ) -> ConfigResult<()> {
        let index = self.check_slot(slot)?;
        if self.slots[index].is_occupied() {
            return Err(self.record(ConfigError::SlotOccupied { slot }));
        }

        sensor.configure(&config).map_err(|err| self.record(err))?;

        if self.started {
            let now = self.last_update.unwrap_or_default();
            sensor.begin(now).map_err(|err| self.record(err))?;
        }

        self.slots[index].install(sensor, config, name, is_primary);
        log_info!(
            "slot {}: added {} '{}'{}",
            slot,
            config.sensor_type,
            self.slots[index].name(),
            if is_primary { " (primary)" } else { "" }
        );
        Ok(())
    }

    /// Remove a sensor, handing ownership back
    pub fn remove_sensor(&mut self, slot: u8) -> ConfigResult<Box<dyn MotionSensor>> {
        let index = self.check_slot(slot)?;
        match self.slots[index].take() {
            Some(sensor) => {
                log_info!("slot {}: removed", slot);
                Ok(sensor)
            }
            None => Err(self.record(ConfigError::EmptySlot { slot })),
        }
    }

    /// Include or exclude a slot from fusion
    pub fn set_sensor_enabled(&mut self, slot: u8, enabled: bool) -> ConfigResult<()> {
        let index = self.occupied_slot(slot)?;
        self.slots[index].set_enabled(enabled);
        log_info!("slot {}: {}", slot, if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Make `slot` the only primary sensor
    pub fn set_primary(&mut self, slot: u8) -> ConfigResult<()> {
        let index = self.occupied_slot(slot)?;
        for s in self.slots.iter_mut() {
            s.set_primary(s.index() as usize == index);
        }
        log_info!("slot {}: now primary", slot);
        Ok(())
    }

    /// Change the fusion policy; slots are untouched
    pub fn set_fusion_mode(&mut self, mode: FusionMode) {
        if mode != self.mode {
            log_info!("fusion mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Active fusion policy
    pub fn fusion_mode(&self) -> FusionMode {
        self.mode
    }

    /// Update every enabled sensor
    pub fn update(&mut self, now: Timestamp) {
        self.last_update = Some(now);
        for slot in self.slots.iter_mut().filter(|s| s.is_enabled()) {
            if let Some(sensor) = slot.sensor_mut() {
                sensor.update(now);
            }
        }
    }

    /// Fused verdict under the active policy
    pub fn is_motion_detected(&self) -> bool {
        match self.mode {
            FusionMode::Any => self.ready_slots().any(|s| s.is_detecting()),
            FusionMode::All => {
                let mut ready = self.ready_slots().peekable();
                ready.peek().is_some() && ready.all(|s| s.is_detecting())
            }
            FusionMode::TriggerMeasure | FusionMode::Independent => {
                self.primary_slot().is_some_and(|s| s.is_detecting())
            }
        }
    }

    /// Aggregate status, recomputed from every enabled slot
    pub fn status(&self) -> CombinedStatus {
        let mut status = CombinedStatus {
            fusion_mode: self.mode,
            motion_detected: self.is_motion_detected(),
            nearest_distance_mm: self.nearest_distance(),
            primary_direction: self.primary_direction(),
            ..CombinedStatus::default()
        };

        for slot in self.active_slots() {
            status.active_count += 1;
            if let Some(sensor) = slot.sensor() {
                status.combined_event_count = status.combined_event_count.saturating_add(sensor.event_count());
            }
            if slot.is_ready() {
                status.ready_count += 1;
            }
            if slot.is_detecting() {
                status.detecting_count += 1;
            }
        }

        status.any_detected = status.detecting_count > 0;
        status.all_detected = status.ready_count > 0 && status.detecting_count == status.ready_count;
        status
    }

    /// Every enabled sensor is past warm-up (false with no sensors)
    pub fn all_sensors_ready(&self) -> bool {
        let mut active = self.active_slots().peekable();
        active.peek().is_some() && active.all(|s| s.is_ready())
    }

    /// Check for structural problems before trusting fused output
    ///
    /// A successful check clears [`last_error`](Self::last_error).
    pub fn validate_configuration(&mut self) -> ConfigResult<()> {
        let result = self.check_configuration();
        match result {
            Ok(()) => self.last_error = None,
            Err(err) => {
                log_warn!("configuration invalid: {}", err);
                self.last_error = Some(err);
            }
        }
        result
    }

    fn check_configuration(&self) -> ConfigResult<()> {
        let primaries = self.slots.iter().filter(|s| s.is_occupied() && s.is_primary()).count() as u8;
        if primaries > 1 {
            return Err(ConfigError::MultiplePrimaries { count: primaries });
        }

        let active = self.active_sensor_count();
        let required = match self.mode {
            FusionMode::TriggerMeasure => TRIGGER_MEASURE_MIN_SENSORS,
            _ => 1,
        };
        if active < required {
            return Err(ConfigError::InsufficientSensors {
                mode: self.mode,
                required,
                available: active,
            });
        }

        if self.mode.uses_primary() && self.primary_slot().is_none() {
            return Err(ConfigError::NoPrimary { mode: self.mode });
        }

        Ok(())
    }

    /// Most recent configuration failure
    pub fn last_error(&self) -> Option<ConfigError> {
        self.last_error
    }

    /// Sensor in `slot`
    pub fn sensor(&self, slot: u8) -> Option<&dyn MotionSensor> {
        self.slots.get(slot as usize)?.sensor()
    }

    /// Mutable sensor in `slot`
    pub fn sensor_mut(&mut self, slot: u8) -> Option<&mut (dyn MotionSensor + 'static)> {
        self.slots.get_mut(slot as usize)?.sensor_mut()
    }

    /// Slot metadata
    pub fn slot(&self, slot: u8) -> Option<&SensorSlot> {
        self.slots.get(slot as usize)
    }

    /// Enabled primary sensor
    pub fn primary_sensor(&self) -> Option<&dyn MotionSensor> {
        self.primary_slot()?.sensor()
    }

    /// Closest non-zero distance among distance-capable slots, 0 if none
    pub fn nearest_distance(&self) -> u32 {
        self.active_slots()
            .filter_map(|s| s.sensor())
            .filter(|s| s.capabilities().distance_measurement)
            .map(|s| s.distance_mm())
            .filter(|&d| d > 0)
            .min()
            .unwrap_or(0)
    }

    /// Direction of the primary sensor
    ///
    /// A primary that cannot sense direction borrows it from the first
    /// ready, direction-capable secondary.
    pub fn primary_direction(&self) -> MotionDirection {
        if let Some(primary) = self.primary_sensor() {
            if primary.capabilities().direction_detection {
                return primary.direction();
            }
        }

        self.ready_slots()
            .filter_map(|s| s.sensor())
            .find(|s| s.capabilities().direction_detection)
            .map_or(MotionDirection::Unknown, |s| s.direction())
    }

    /// Occupied, enabled slots
    pub fn active_sensor_count(&self) -> u8 {
        self.active_slots().count() as u8
    }

    /// Occupied slots, enabled or not
    pub fn sensor_count(&self) -> u8 {
        self.slots.iter().filter(|s| s.is_occupied()).count() as u8
    }

    /// Zero every sensor's event counter
    pub fn reset_event_counts(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(sensor) = slot.sensor_mut() {
                sensor.reset_event_count();
            }
        }
    }

    /// Per-slot results of every active slot
    pub fn slot_statuses(&self) -> Vec<SlotReport, MAX_SENSORS> {
        let mut reports = Vec::new();
        for slot in self.active_slots() {
            if let Some(sensor) = slot.sensor() {
                let _ = reports.push(SlotReport {
                    index: slot.index(),
                    sensor_type: sensor.sensor_type(),
                    primary: slot.is_primary(),
                    status: sensor.status(),
                });
            }
        }
        reports
    }

    /// Log a status report of every slot
    pub fn log_status(&self, now: Timestamp) {
        let status = self.status();
        log_info!(
            "fusion {}: detected={} active={} ready={} detecting={} nearest={}mm direction={}",
            status.fusion_mode,
            status.motion_detected,
            status.active_count,
            status.ready_count,
            status.detecting_count,
            status.nearest_distance_mm,
            status.primary_direction
        );

        for slot in self.slots.iter().filter(|s| s.is_occupied()) {
            if let Some(sensor) = slot.sensor() {
                log_info!(
                    "  [{}] {} ({}){}{}: ready={} motion={} distance={}mm events={} warmup={}ms",
                    slot.index(),
                    slot.name(),
                    sensor.sensor_type(),
                    if slot.is_primary() { " primary" } else { "" },
                    if slot.is_enabled() { "" } else { " disabled" },
                    sensor.is_ready(),
                    sensor.motion_detected(),
                    sensor.distance_mm(),
                    sensor.event_count(),
                    sensor.warmup_remaining_ms(now)
                );
            }
        }
    }

    fn active_slots(&self) -> impl Iterator<Item = &SensorSlot> + '_ {
        self.slots.iter().filter(|s| s.is_active())
    }

    fn ready_slots(&self) -> impl Iterator<Item = &SensorSlot> + '_ {
        self.slots.iter().filter(|s| s.is_ready())
    }

    fn primary_slot(&self) -> Option<&SensorSlot> {
        self.active_slots().find(|s| s.is_primary())
    }

    fn check_slot(&mut self, slot: u8) -> ConfigResult<usize> {
        if (slot as usize) < MAX_SENSORS {
            Ok(slot as usize)
        } else {
            Err(self.record(ConfigError::InvalidSlot { slot }))
        }
    }

    fn occupied_slot(&mut self, slot: u8) -> ConfigResult<usize> {
        let index = self.check_slot(slot)?;
        if self.slots[index].is_occupied() {
            Ok(index)
        } else {
            Err(self.record(ConfigError::EmptySlot { slot }))
        }
    }

    fn record(&mut self, err: ConfigError) -> ConfigError {
        log_warn!("sensor manager: {}", err);
        self.last_error = Some(err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MotionEvent, SensorType};
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[derive(Default)]
    struct Flags {
        detected: Cell<bool>,
        ready: Cell<bool>,
        distance: Cell<u32>,
    }

    struct FakeSensor {
        kind: SensorType,
        flags: Rc<Flags>,
        events: u32,
        begun: Rc<Cell<Option<Timestamp>>>,
    }

    impl MotionSensor for FakeSensor {
        fn begin(&mut self, now: Timestamp) -> ConfigResult<()> {
            self.begun.set(Some(now));
            Ok(())
        }
        fn update(&mut self, _now: Timestamp) {}
        fn motion_detected(&self) -> bool {
            self.flags.detected.get()
        }
        fn is_ready(&self) -> bool {
            self.flags.ready.get()
        }
        fn sensor_type(&self) -> SensorType {
            self.kind
        }
        fn distance_mm(&self) -> u32 {
            self.flags.distance.get()
        }
        fn direction(&self) -> MotionDirection {
            if self.kind.is_distance() {
                MotionDirection::Approaching
            } else {
                MotionDirection::Unknown
            }
        }
        fn last_event(&self) -> MotionEvent {
            MotionEvent::None
        }
        fn event_count(&self) -> u32 {
            self.events
        }
        fn reset_event_count(&mut self) {
            self.events = 0;
        }
        fn last_event_time(&self) -> Option<Timestamp> {
            None
        }
        fn configure(&mut self, config: &SensorConfig) -> ConfigResult<()> {
            if config.sensor_type == self.kind {
                Ok(())
            } else {
                Err(ConfigError::UnsupportedSensor { name: config.sensor_type.name() })
            }
        }
    }

    fn fake(kind: SensorType) -> (Box<dyn MotionSensor>, Rc<Flags>) {
        let flags = Rc::new(Flags::default());
        flags.ready.set(true);
        let sensor = FakeSensor {
            kind,
            flags: flags.clone(),
            events: 3,
            begun: Rc::new(Cell::new(None)),
        };
        (Box::new(sensor), flags)
    }

    fn add(manager: &mut SensorManager, slot: u8, kind: SensorType, primary: bool) -> Rc<Flags> {
        let (sensor, flags) = fake(kind);
        manager
            .add_sensor(slot, sensor, SensorConfig::for_type(kind), None, primary)
            .unwrap();
        flags
    }

    #[test]
    fn slot_bounds_and_occupancy() {
        let mut manager = SensorManager::new();
        let (sensor, _) = fake(SensorType::Pir);
        let err = manager
            .add_sensor(4, sensor, SensorConfig::for_type(SensorType::Pir), None, false)
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSlot { slot: 4 });
        assert_eq!(manager.last_error(), Some(err));

        add(&mut manager, 0, SensorType::Pir, false);
        let (sensor, _) = fake(SensorType::Pir);
        assert_eq!(
            manager.add_sensor(0, sensor, SensorConfig::for_type(SensorType::Pir), None, false),
            Err(ConfigError::SlotOccupied { slot: 0 })
        );

        let removed = manager.remove_sensor(0).unwrap();
        assert_eq!(removed.sensor_type(), SensorType::Pir);
        assert!(matches!(manager.remove_sensor(0), Err(ConfigError::EmptySlot { slot: 0 })));
    }

    #[test]
    fn mismatched_config_is_rejected() {
        let mut manager = SensorManager::new();
        let (sensor, _) = fake(SensorType::Pir);
        let result = manager.add_sensor(1, sensor, SensorConfig::for_type(SensorType::Ultrasonic), None, false);
        assert!(matches!(result, Err(ConfigError::UnsupportedSensor { .. })));
        assert_eq!(manager.sensor_count(), 0);
    }

    #[test]
    fn any_mode_ignores_not_ready_slots() {
        let mut manager = SensorManager::new();
        let a = add(&mut manager, 0, SensorType::Pir, false);
        let b = add(&mut manager, 1, SensorType::Pir, false);

        b.ready.set(false);
        b.detected.set(true);
        assert!(!manager.is_motion_detected());
        assert!(!manager.all_sensors_ready());
        assert_eq!(manager.status().active_count, 2);
        assert_eq!(manager.status().ready_count, 1);

        a.detected.set(true);
        assert!(manager.is_motion_detected());
    }

    #[test]
    fn all_mode_needs_every_ready_slot() {
        let mut manager = SensorManager::new();
        manager.set_fusion_mode(FusionMode::All);
        let a = add(&mut manager, 0, SensorType::Pir, false);
        let b = add(&mut manager, 1, SensorType::Ultrasonic, false);

        a.detected.set(true);
        assert!(!manager.is_motion_detected());
        b.detected.set(true);
        assert!(manager.is_motion_detected());
        assert!(manager.status().all_detected);
        a.detected.set(false);
        assert!(!manager.is_motion_detected());
    }

    #[test]
    fn all_mode_without_ready_slots_is_false() {
        let mut manager = SensorManager::new();
        manager.set_fusion_mode(FusionMode::All);
        assert!(!manager.is_motion_detected());

        let a = add(&mut manager, 0, SensorType::Pir, false);
        a.ready.set(false);
        a.detected.set(true);
        assert!(!manager.is_motion_detected());
    }

    #[test]
    fn trigger_measure_uses_primary_only() {
        let mut manager = SensorManager::new();
        manager.set_fusion_mode(FusionMode::TriggerMeasure);
        let trigger = add(&mut manager, 0, SensorType::Pir, true);
        let measure = add(&mut manager, 1, SensorType::Ultrasonic, false);
        measure.distance.set(1200);

        measure.detected.set(true);
        assert!(!manager.is_motion_detected());

        trigger.detected.set(true);
        let status = manager.status();
        assert!(status.motion_detected);
        assert_eq!(status.nearest_distance_mm, 1200);
        // Direction borrowed from the ultrasonic secondary
        assert_eq!(status.primary_direction, MotionDirection::Approaching);
    }

    #[test]
    fn disabled_primary_does_not_fall_back() {
        let mut manager = SensorManager::new();
        manager.set_fusion_mode(FusionMode::Independent);
        let primary = add(&mut manager, 0, SensorType::Pir, true);
        let other = add(&mut manager, 2, SensorType::Pir, false);
        primary.detected.set(true);
        other.detected.set(true);
        assert!(manager.is_motion_detected());

        manager.set_sensor_enabled(0, false).unwrap();
        assert!(!manager.is_motion_detected());
        assert_eq!(manager.slot_statuses().len(), 1);
    }

    #[test]
    fn validation_reports_structural_problems() {
        let mut manager = SensorManager::new();
        manager.set_fusion_mode(FusionMode::TriggerMeasure);
        add(&mut manager, 0, SensorType::Pir, true);
        assert!(matches!(
            manager.validate_configuration(),
            Err(ConfigError::InsufficientSensors { required: 2, available: 1, .. })
        ));

        add(&mut manager, 1, SensorType::Ultrasonic, true);
        assert_eq!(
            manager.validate_configuration(),
            Err(ConfigError::MultiplePrimaries { count: 2 })
        );

        manager.set_primary(1).unwrap();
        assert!(manager.validate_configuration().is_ok());
        assert!(manager.last_error().is_none());
        assert!(manager.slot(1).is_some_and(|s| s.is_primary()));
        assert!(manager.slot(0).is_some_and(|s| !s.is_primary()));

        manager.set_sensor_enabled(1, false).unwrap();
        manager.set_fusion_mode(FusionMode::Independent);
        assert_eq!(
            manager.validate_configuration(),
            Err(ConfigError::NoPrimary { mode: FusionMode::Independent })
        );
    }

    #[test]
    fn sensors_added_after_begin_are_started() {
        let mut manager = SensorManager::new();
        manager.begin(1000).unwrap();
        manager.update(1500);

        let begun = Rc::new(Cell::new(None));
        let sensor = FakeSensor {
            kind: SensorType::Pir,
            flags: Rc::new(Flags::default()),
            events: 0,
            begun: begun.clone(),
        };
        manager
            .add_sensor(0, Box::new(sensor), SensorConfig::for_type(SensorType::Pir), Some("Door"), false)
            .unwrap();
        assert_eq!(begun.get(), Some(1500));
        assert_eq!(manager.slot(0).map(|s| s.name()), Some("Door"));
    }

    #[test]
    fn event_counts_combine_and_reset() {
        let mut manager = SensorManager::new();
        add(&mut manager, 0, SensorType::Pir, false);
        add(&mut manager, 3, SensorType::Ultrasonic, false);
        assert_eq!(manager.status().combined_event_count, 6);

        manager.reset_event_counts();
        assert_eq!(manager.status().combined_event_count, 0);
    }
}
