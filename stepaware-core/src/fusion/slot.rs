//! One manager slot

use alloc::boxed::Box;
use core::fmt::{self, Write};

use heapless::String;

use crate::constants::fusion::MAX_SENSOR_NAME_LEN;
use crate::traits::MotionSensor;
use crate::types::SensorConfig;

/// Binds one owned sensor to a slot index, role, enabled flag and label
pub struct SensorSlot {
    sensor: Option<Box<dyn MotionSensor>>,
    config: Option<SensorConfig>,
    name: String<MAX_SENSOR_NAME_LEN>,
    index: u8,
    enabled: bool,
    primary: bool,
}

impl SensorSlot {
    pub(crate) fn empty(index: u8) -> Self {
        Self {
            sensor: None,
            config: None,
            name: String::new(),
            index,
            enabled: false,
            primary: false,
        }
    }

    pub(crate) fn install(
        &mut self,
        sensor: Box<dyn MotionSensor>,
        config: SensorConfig,
        name: Option<&str>,
        primary: bool,
    ) {
        self.name = make_label(self.index, name);
        self.sensor = Some(sensor);
        self.config = Some(config);
        self.enabled = true;
        self.primary = primary;
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn MotionSensor>> {
        let sensor = self.sensor.take();
        *self = Self::empty(self.index);
        sensor
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    pub(crate) fn sensor_mut(&mut self) -> Option<&mut (dyn MotionSensor + 'static)> {
        self.sensor.as_deref_mut()
    }

    /// Slot holds a sensor
    pub fn is_occupied(&self) -> bool {
        self.sensor.is_some()
    }

    /// Slot holds a sensor and takes part in fusion
    pub fn is_active(&self) -> bool {
        self.enabled && self.sensor.is_some()
    }

    /// Active and past warm-up
    pub fn is_ready(&self) -> bool {
        self.sensor().is_some_and(|s| self.enabled && s.is_ready())
    }

    /// Active, ready and detecting
    pub fn is_detecting(&self) -> bool {
        self.sensor().is_some_and(|s| self.enabled && s.is_ready() && s.motion_detected())
    }

    /// The sensor, if any
    pub fn sensor(&self) -> Option<&dyn MotionSensor> {
        self.sensor.as_deref()
    }

    /// Configuration the sensor was added with
    pub fn config(&self) -> Option<&SensorConfig> {
        self.config.as_ref()
    }

    /// User label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot index
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Takes part in fusion when occupied
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Primary (trigger) role
    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

impl fmt::Debug for SensorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorSlot")
            .field("index", &self.index)
            .field("name", &self.name.as_str())
            .field("sensor_type", &self.sensor().map(|s| s.sensor_type()))
            .field("enabled", &self.enabled)
            .field("primary", &self.primary)
            .finish()
    }
}

/// Label truncated to the slot name capacity, "Sensor N" when absent
fn make_label(index: u8, name: Option<&str>) -> String<MAX_SENSOR_NAME_LEN> {
    let mut label = String::new();
    match name {
        Some(name) if !name.is_empty() => {
            for ch in name.chars() {
                if label.push(ch).is_err() {
                    break;
                }
            }
        }
        _ => {
            let _ = write!(label, "Sensor {}", index);
        }
    }
    label
}
