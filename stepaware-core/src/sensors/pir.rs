//! Passive infrared motion sensor

use crate::errors::{ConfigError, ConfigResult};
use crate::time::{elapsed_ms, Timestamp};
use crate::traits::{MotionInput, MotionSensor};
use crate::types::{MotionEvent, SensorConfig, SensorType};

/// Binary motion sensor with a warm-up period
///
/// Output is ignored until the warm-up has elapsed since [`begin`]. Every
/// rising edge afterwards is a counted `Detected` event; falling edges set
/// `Cleared` without counting.
///
/// [`begin`]: MotionSensor::begin
#[derive(Debug)]
pub struct PirSensor<I> {
    input: I,
    sensor_type: SensorType,
    warmup_ms: u32,
    started_at: Option<Timestamp>,
    ready: bool,
    level: bool,
    last_event: MotionEvent,
    event_count: u32,
    last_event_time: Option<Timestamp>,
    read_errors: u32,
}

impl<I: MotionInput> PirSensor<I> {
    /// Wrap a motion input; warm-up defaults to the family's typical value
    pub fn new(input: I, sensor_type: SensorType) -> ConfigResult<Self> {
        if !matches!(sensor_type, SensorType::Pir | SensorType::PassiveIr) {
            return Err(ConfigError::UnsupportedSensor { name: sensor_type.name() });
        }

        Ok(Self {
            input,
            sensor_type,
            warmup_ms: sensor_type.capabilities().typical_warmup_ms,
            started_at: None,
            ready: false,
            level: false,
            last_event: MotionEvent::None,
            event_count: 0,
            last_event_time: None,
            read_errors: 0,
        })
    }

    /// Build from a generic sensor configuration
    pub fn from_config(input: I, config: &SensorConfig) -> ConfigResult<Self> {
        let mut sensor = Self::new(input, config.sensor_type)?;
        sensor.configure(config)?;
        Ok(sensor)
    }

    /// Configured warm-up (ms)
    pub fn warmup_ms(&self) -> u32 {
        self.warmup_ms
    }

    /// Reads that returned a driver error
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// The underlying input
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}

impl<I: MotionInput> MotionSensor for PirSensor<I> {
    fn begin(&mut self, now: Timestamp) -> ConfigResult<()> {
        self.started_at = Some(now);
        self.ready = self.warmup_ms == 0;
        self.level = false;
        log_debug!("{} sensor warming up for {} ms", self.sensor_type, self.warmup_ms);
        Ok(())
    }

    fn update(&mut self, now: Timestamp) {
        let Some(started_at) = self.started_at else {
            return;
        };

        if !self.ready {
            if elapsed_ms(started_at, now) < u64::from(self.warmup_ms) {
                return;
            }
            self.ready = true;
            log_info!("{} sensor ready", self.sensor_type);
        }

        let level = match self.input.read_level() {
            Ok(level) => level,
            Err(nb::Error::WouldBlock) => return,
            Err(nb::Error::Other(_err)) => {
                log_trace!("motion input error: {:?}", _err);
                self.read_errors = self.read_errors.saturating_add(1);
                return;
            }
        };

        if level && !self.level {
            self.event_count = self.event_count.saturating_add(1);
            self.last_event_time = Some(now);
            self.last_event = MotionEvent::Detected;
        } else if !level && self.level {
            self.last_event = MotionEvent::Cleared;
        }
        self.level = level;
    }

    fn motion_detected(&self) -> bool {
        self.ready && self.level
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    fn last_event(&self) -> MotionEvent {
        self.last_event
    }

    fn event_count(&self) -> u32 {
        self.event_count
    }

    fn reset_event_count(&mut self) {
        self.event_count = 0;
    }

    fn last_event_time(&self) -> Option<Timestamp> {
        self.last_event_time
    }

    fn warmup_remaining_ms(&self, now: Timestamp) -> u32 {
        if self.ready {
            return 0;
        }
        match self.started_at {
            Some(started_at) => {
                let elapsed = elapsed_ms(started_at, now);
                u64::from(self.warmup_ms).saturating_sub(elapsed) as u32
            }
            None => self.warmup_ms,
        }
    }

    fn configure(&mut self, config: &SensorConfig) -> ConfigResult<()> {
        if config.sensor_type != self.sensor_type {
            return Err(ConfigError::UnsupportedSensor { name: config.sensor_type.name() });
        }
        if config.warmup_ms != 0 {
            self.warmup_ms = config.warmup_ms;
        }
        Ok(())
    }
}
