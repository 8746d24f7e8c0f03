//! Far/near confirmation scenarios, driven by levels and by real sensors

mod common;

use common::SharedLevel;
use stepaware_core::traits::MotionSensor;
use stepaware_core::types::SensorConfig;
use stepaware_core::{
    ConfirmerConfig, DualSensorConfirmer, DualSensorState, MotionDirection, PirSensor, SensorType,
};

fn confirmer() -> DualSensorConfirmer {
    DualSensorConfirmer::new(ConfirmerConfig::default()).unwrap()
}

#[test]
fn far_then_near_after_one_second_is_an_approach() {
    let mut c = confirmer();

    c.update(true, false, 0);
    assert_eq!(c.state(), DualSensorState::FarOnly);
    c.update(true, true, 1000);

    assert_eq!(c.state(), DualSensorState::Approaching);
    assert_eq!(c.approaching_count(), 1);
    assert_eq!(c.direction(), MotionDirection::Approaching);
}

#[test]
fn triggers_within_200ms_are_ambiguous() {
    let mut c = confirmer();

    c.update(true, false, 0);
    c.update(true, true, 200);
    for t in (300..=3000).step_by(100) {
        c.update(true, true, t);
        assert_ne!(c.state(), DualSensorState::Approaching);
    }
    assert_eq!(c.unknown_count(), 1);
    assert_eq!(c.approaching_count(), 0);
}

#[test]
fn near_before_far_within_200ms_is_ambiguous() {
    let mut c = confirmer();

    c.update(false, true, 0);
    c.update(true, true, 150);
    assert_eq!(c.state(), DualSensorState::BothActive);
    assert_eq!(c.unknown_count(), 1);
}

#[test]
fn hand_wave_at_near_sensor_counts_once() {
    let mut c = confirmer();

    c.update(false, true, 0);
    c.update(false, false, 400);
    assert_eq!(c.state(), DualSensorState::Idle);
    assert_eq!(c.unknown_count(), 1);

    // Near first, then far well outside the simultaneous threshold
    c.update(false, true, 1000);
    c.update(true, true, 2500);
    assert_eq!(c.state(), DualSensorState::BothActive);
    c.update(false, false, 3000);
    assert_eq!(c.unknown_count(), 2);
    assert_eq!(c.approaching_count(), 0);
}

#[test]
fn far_without_near_times_out() {
    let mut c = confirmer();

    c.update(true, false, 0);
    c.update(false, false, 4000);
    assert_eq!(c.state(), DualSensorState::Idle, "far cleared before near");

    let mut c = confirmer();
    c.update(true, false, 0);
    c.update(true, false, 10_001);
    assert_eq!(c.state(), DualSensorState::Idle);
    assert_eq!(c.approaching_count(), 0);
}

#[test]
fn repeated_update_is_idempotent() {
    let mut c = confirmer();
    c.update(true, false, 0);
    c.update(true, true, 1000);
    c.update(true, true, 1000);

    assert_eq!(c.approaching_count(), 1);
    assert_eq!(c.state(), DualSensorState::Approaching);
}

#[test]
fn confirms_from_pir_sensors() {
    let far_line = SharedLevel::default();
    let near_line = SharedLevel::default();
    let config = SensorConfig {
        warmup_ms: 100,
        ..SensorConfig::for_type(SensorType::Pir)
    };
    let mut far = PirSensor::from_config(far_line.clone(), &config).unwrap();
    let mut near = PirSensor::from_config(near_line.clone(), &config).unwrap();
    far.begin(0).unwrap();
    near.begin(0).unwrap();

    let mut c = confirmer();
    c.begin(false, false);

    // Far line already high while warming up: not ready means not triggered
    far_line.set(true);
    far.update(50);
    near.update(50);
    assert_eq!(c.update_from(&far, &near, 50), DualSensorState::Idle);

    far.update(200);
    near.update(200);
    assert_eq!(c.update_from(&far, &near, 200), DualSensorState::FarOnly);

    near_line.set(true);
    far.update(1400);
    near.update(1400);
    assert_eq!(c.update_from(&far, &near, 1400), DualSensorState::Approaching);
    assert_eq!(c.direction_confidence_ms(1600), 200);

    far_line.set(false);
    near_line.set(false);
    far.update(2000);
    near.update(2000);
    assert_eq!(c.update_from(&far, &near, 2000), DualSensorState::Idle);
    assert_eq!(c.approaching_count(), 1);
}
