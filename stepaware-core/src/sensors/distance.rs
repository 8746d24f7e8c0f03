//! Distance sensor built on a range finder and the detection engine

use crate::constants::sensors::MIN_MEASUREMENT_INTERVAL_MS;
use crate::detection::{DetectorConfig, DistanceDetector};
use crate::errors::{ConfigError, ConfigResult};
use crate::time::{elapsed_ms, Timestamp};
use crate::traits::{MotionSensor, RangeFinder};
use crate::types::{MotionDirection, MotionEvent, SensorConfig, SensorType};

/// Ultrasonic-style distance sensor
///
/// Measurements are rate-limited to the configured interval (never faster
/// than the 60 ms echo settling floor). A failed read counts as "no echo".
#[derive(Debug)]
pub struct DistanceSensor<R> {
    finder: R,
    detector: DistanceDetector,
    sensor_type: SensorType,
    measurement_interval_ms: u32,
    last_measurement: Option<Timestamp>,
    started: bool,
    last_event: MotionEvent,
    read_errors: u32,
}

impl<R: RangeFinder> DistanceSensor<R> {
    /// Wrap a range finder
    pub fn new(finder: R, sensor_type: SensorType, config: DetectorConfig) -> ConfigResult<Self> {
        if !sensor_type.is_distance() {
            return Err(ConfigError::UnsupportedSensor { name: sensor_type.name() });
        }
        let detector = DistanceDetector::try_new(config)?;

        Ok(Self {
            finder,
            detector,
            sensor_type,
            measurement_interval_ms: config.sample_interval_ms.max(MIN_MEASUREMENT_INTERVAL_MS),
            last_measurement: None,
            started: false,
            last_event: MotionEvent::None,
            read_errors: 0,
        })
    }

    /// Build from a generic sensor configuration
    pub fn from_config(finder: R, config: &SensorConfig) -> ConfigResult<Self> {
        let mut sensor = Self::new(finder, config.sensor_type, DetectorConfig::default())?;
        sensor.configure(config)?;
        Ok(sensor)
    }

    /// The detection engine
    pub fn detector(&self) -> &DistanceDetector {
        &self.detector
    }

    /// The detection engine, for live tuning
    pub fn detector_mut(&mut self) -> &mut DistanceDetector {
        &mut self.detector
    }

    /// The underlying range finder
    pub fn range_finder_mut(&mut self) -> &mut R {
        &mut self.finder
    }

    /// Minimum time between measurements (ms)
    pub fn measurement_interval_ms(&self) -> u32 {
        self.measurement_interval_ms
    }

    /// Reads that returned a driver error
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    fn due(&self, now: Timestamp) -> bool {
        self.last_measurement
            .map_or(true, |last| elapsed_ms(last, now) >= u64::from(self.measurement_interval_ms))
    }
}

impl<R: RangeFinder> MotionSensor for DistanceSensor<R> {
    fn begin(&mut self, _now: Timestamp) -> ConfigResult<()> {
        self.started = true;
        self.last_measurement = None;
        log_debug!("{} sensor started", self.sensor_type);
        Ok(())
    }

    fn update(&mut self, now: Timestamp) {
        if !self.started || !self.due(now) {
            return;
        }

        let raw_mm = match self.finder.measure_mm() {
            Ok(distance) => distance,
            Err(nb::Error::WouldBlock) => return,
            Err(nb::Error::Other(_err)) => {
                log_trace!("range finder error: {:?}", _err);
                self.read_errors = self.read_errors.saturating_add(1);
                0
            }
        };
        self.last_measurement = Some(now);

        let previous_count = self.detector.event_count();
        let result = self.detector.update(raw_mm, now);

        if result.event_count != previous_count {
            self.last_event = result.last_event;
        } else if result.triggered {
            match result.direction {
                MotionDirection::Approaching => self.last_event = MotionEvent::Approaching,
                MotionDirection::Receding => self.last_event = MotionEvent::Receding,
                _ => {}
            }
        }
    }

    fn motion_detected(&self) -> bool {
        self.detector.is_triggered()
    }

    fn is_ready(&self) -> bool {
        self.started
    }

    fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    fn distance_mm(&self) -> u32 {
        self.detector.distance_mm()
    }

    fn direction(&self) -> MotionDirection {
        self.detector.direction()
    }

    fn last_event(&self) -> MotionEvent {
        self.last_event
    }

    fn event_count(&self) -> u32 {
        self.detector.event_count()
    }

    fn reset_event_count(&mut self) {
        self.detector.reset_event_count();
    }

    fn last_event_time(&self) -> Option<Timestamp> {
        self.detector.last_event_time()
    }

    fn configure(&mut self, config: &SensorConfig) -> ConfigResult<()> {
        if config.sensor_type != self.sensor_type {
            return Err(ConfigError::UnsupportedSensor { name: config.sensor_type.name() });
        }

        let current = *self.detector.config();
        let mut next = current;
        if config.detection_threshold_mm != 0 {
            next.detection_threshold_mm = config.detection_threshold_mm;
        }
        if config.window_size != 0 {
            next.window_size = config.window_size;
        }
        if config.measurement_interval_ms != 0 {
            next.sample_interval_ms = config.measurement_interval_ms.max(MIN_MEASUREMENT_INTERVAL_MS);
        }
        next.direction_enabled = config.direction_enabled;
        next.trigger_mode = config.trigger_mode;
        next.validate()?;

        if next.window_size != current.window_size || next.detection_threshold_mm != current.detection_threshold_mm {
            self.detector.reconfigure(next)?;
        } else {
            self.detector.set_sample_interval(next.sample_interval_ms);
            self.detector.set_direction_enabled(next.direction_enabled);
            self.detector.set_trigger_mode(next.trigger_mode);
        }
        self.measurement_interval_ms = next.sample_interval_ms;
        Ok(())
    }
}
