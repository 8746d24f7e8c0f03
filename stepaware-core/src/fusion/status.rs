//! Fused and per-slot status snapshots

use crate::fusion::FusionMode;
use crate::types::{MotionDirection, SensorStatus, SensorType};

/// Aggregate view across all enabled slots
///
/// Recomputed on every request; never cached across update cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombinedStatus {
    /// Fused verdict under `fusion_mode`
    pub motion_detected: bool,
    /// At least one ready slot detects
    pub any_detected: bool,
    /// At least one slot is ready and every ready slot detects
    pub all_detected: bool,
    /// Occupied and enabled slots, ready or not
    pub active_count: u8,
    /// Active slots past warm-up
    pub ready_count: u8,
    /// Ready slots currently detecting
    pub detecting_count: u8,
    /// Closest non-zero distance among distance-capable slots, 0 if none
    pub nearest_distance_mm: u32,
    /// Direction reported for the primary sensor
    pub primary_direction: MotionDirection,
    /// Sum of every active slot's event counter
    pub combined_event_count: u32,
    /// Policy the verdict was computed under
    pub fusion_mode: FusionMode,
}

/// One slot's result, for INDEPENDENT consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotReport {
    /// Slot index
    pub index: u8,
    /// Sensor family
    pub sensor_type: SensorType,
    /// Primary role
    pub primary: bool,
    /// Sensor snapshot
    pub status: SensorStatus,
}
