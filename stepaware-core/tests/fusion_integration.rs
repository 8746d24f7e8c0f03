//! Fusion manager driving real sensor implementations

mod common;

use common::{BrokenInput, SharedLevel, SharedRange};
use stepaware_core::traits::MotionSensor;
use stepaware_core::types::SensorConfig;
use stepaware_core::{
    ConfigError, DetectorConfig, DistanceSensor, FusionMode, MotionDirection, PirSensor,
    SensorManager, SensorType,
};

fn pir_config(warmup_ms: u32) -> SensorConfig {
    SensorConfig {
        warmup_ms,
        ..SensorConfig::for_type(SensorType::Pir)
    }
}

fn sonar_config() -> SensorConfig {
    SensorConfig {
        detection_threshold_mm: 1500,
        window_size: 3,
        measurement_interval_ms: 75,
        ..SensorConfig::for_type(SensorType::Ultrasonic)
    }
}

fn add_pir(manager: &mut SensorManager, slot: u8, warmup_ms: u32, primary: bool) -> SharedLevel {
    let line = SharedLevel::default();
    let config = pir_config(warmup_ms);
    let sensor = PirSensor::from_config(line.clone(), &config).unwrap();
    manager
        .add_sensor(slot, Box::new(sensor), config, Some("PIR"), primary)
        .unwrap();
    line
}

fn add_sonar(manager: &mut SensorManager, slot: u8, primary: bool) -> SharedRange {
    let range = SharedRange::default();
    let config = sonar_config();
    let sensor = DistanceSensor::new(range.clone(), SensorType::Ultrasonic, DetectorConfig::default()).unwrap();
    manager
        .add_sensor(slot, Box::new(sensor), config, Some("Sonar"), primary)
        .unwrap();
    range
}

/// Walk an object in from 2 m, one reading per 75 ms cycle
fn approach(manager: &mut SensorManager, range: &SharedRange, start: u64) -> u64 {
    let mut t = start;
    for distance in [2000, 1900, 1800, 1700, 1400, 1300, 1200, 1100] {
        range.set(distance);
        manager.update(t);
        t += 75;
    }
    t
}

#[test]
fn all_mode_requires_both_slots() {
    let mut manager = SensorManager::new();
    manager.set_fusion_mode(FusionMode::All);
    let a = add_pir(&mut manager, 0, 1, false);
    let b = add_pir(&mut manager, 1, 1, false);
    manager.validate_configuration().unwrap();
    manager.begin(0).unwrap();

    a.set(true);
    manager.update(10);
    assert!(!manager.is_motion_detected());

    b.set(true);
    manager.update(20);
    assert!(manager.is_motion_detected());

    a.set(false);
    manager.update(30);
    assert!(!manager.is_motion_detected());
}

#[test]
fn trigger_measure_ignores_secondary_detection() {
    let mut manager = SensorManager::new();
    manager.set_fusion_mode(FusionMode::TriggerMeasure);
    let trigger = add_pir(&mut manager, 0, 1, true);
    let range = add_sonar(&mut manager, 1, false);
    manager.validate_configuration().unwrap();
    manager.begin(0).unwrap();

    let t = approach(&mut manager, &range, 10);
    assert!(manager.sensor(1).is_some_and(|s| s.motion_detected()));
    assert!(!manager.is_motion_detected(), "secondary alone must not trigger");

    trigger.set(true);
    manager.update(t);
    let status = manager.status();
    assert!(status.motion_detected);
    assert_eq!(status.nearest_distance_mm, 1100);
    assert_eq!(status.primary_direction, MotionDirection::Approaching);
}

#[test]
fn warming_sensor_is_excluded_but_counted() {
    let mut manager = SensorManager::new();
    let pir = add_pir(&mut manager, 0, 60_000, false);
    let range = add_sonar(&mut manager, 2, false);
    manager.begin(0).unwrap();

    pir.set(true);
    manager.update(100);
    let status = manager.status();
    assert_eq!(status.active_count, 2);
    assert_eq!(status.ready_count, 1);
    assert!(!status.any_detected);
    assert!(!manager.all_sensors_ready());
    assert_eq!(manager.sensor(0).map(|s| s.warmup_remaining_ms(100)), Some(59_900));

    approach(&mut manager, &range, 200);
    assert!(manager.is_motion_detected());
}

#[test]
fn independent_mode_reports_slots_separately() {
    let mut manager = SensorManager::new();
    manager.set_fusion_mode(FusionMode::Independent);
    let primary = add_pir(&mut manager, 0, 1, true);
    let range = add_sonar(&mut manager, 1, false);
    manager.begin(0).unwrap();

    primary.set(false);
    approach(&mut manager, &range, 10);

    assert!(!manager.is_motion_detected());
    let reports = manager.slot_statuses();
    assert_eq!(reports.len(), 2);
    let sonar = reports.iter().find(|r| r.index == 1).unwrap();
    assert!(sonar.status.motion_detected);
    assert!(!sonar.primary);
}

#[test]
fn validation_catches_missing_primary() {
    let mut manager = SensorManager::new();
    manager.set_fusion_mode(FusionMode::TriggerMeasure);
    add_pir(&mut manager, 0, 1, false);
    add_sonar(&mut manager, 1, false);

    let err = manager.validate_configuration().unwrap_err();
    assert_eq!(err, ConfigError::NoPrimary { mode: FusionMode::TriggerMeasure });
    assert_eq!(
        manager.last_error().map(|e| e.to_string()),
        Some("TRIGGER_MEASURE mode requires a primary sensor".to_string())
    );

    manager.set_primary(0).unwrap();
    assert!(manager.validate_configuration().is_ok());
}

#[test]
fn removed_sensor_is_handed_back() {
    let mut manager = SensorManager::new();
    let range = add_sonar(&mut manager, 3, false);
    manager.begin(0).unwrap();
    approach(&mut manager, &range, 10);

    let sensor = manager.remove_sensor(3).unwrap();
    assert_eq!(sensor.sensor_type(), SensorType::Ultrasonic);
    assert!(sensor.event_count() >= 1);
    assert_eq!(manager.active_sensor_count(), 0);
    assert!(!manager.is_motion_detected());
}

#[test]
fn failing_input_never_detects() {
    let mut manager = SensorManager::new();
    let config = pir_config(1);
    let sensor = PirSensor::from_config(BrokenInput, &config).unwrap();
    manager.add_sensor(0, Box::new(sensor), config, None, false).unwrap();
    manager.begin(0).unwrap();

    for t in [10, 20, 30] {
        manager.update(t);
    }
    assert!(!manager.is_motion_detected());
    assert_eq!(manager.slot(0).map(|s| s.name()), Some("Sensor 0"));
}
