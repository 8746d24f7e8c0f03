//! Direction inference with a stability gate
//!
//! Each new snapshot delta goes into the [`DeltaHistory`]; the median of the
//! history picks a candidate direction. The candidate is only promoted to
//! the reported direction once it has stayed the candidate for the
//! stability duration, and a moving direction additionally needs at least
//! one delta that passed the movement test while it was the candidate.
//!
//! ```text
//!  delta ─→ DeltaHistory ─median─→ candidate ──held ≥ 225 ms──→ reported
//!                                   (resets on change)
//! ```

use super::window::DeltaHistory;
use crate::time::{elapsed_ms, Timestamp};
use crate::types::MotionDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    direction: MotionDirection,
    since: Timestamp,
    consecutive: u8,
    moved: bool,
}

/// Candidate/reported direction bookkeeping for one sensor
#[derive(Debug, Clone, Default)]
pub struct DirectionTracker {
    deltas: DeltaHistory,
    candidate: Option<Candidate>,
    reported: MotionDirection,
}

impl DirectionTracker {
    /// Fresh tracker reporting `Unknown`
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one snapshot delta
    ///
    /// Returns the new reported direction when this delta promoted one.
    pub fn observe(
        &mut self,
        delta_mm: i32,
        moving: bool,
        now: Timestamp,
        sensitivity_mm: u32,
        stability_ms: u64,
    ) -> Option<MotionDirection> {
        self.deltas.push(delta_mm);
        let median = self.deltas.median().unwrap_or(delta_mm);
        let direction = classify(median, sensitivity_mm);

        let candidate = match self.candidate {
            Some(mut current) if current.direction == direction => {
                current.consecutive = current.consecutive.saturating_add(1);
                current.moved |= moving;
                current
            }
            _ => Candidate {
                direction,
                since: now,
                consecutive: 1,
                moved: moving,
            },
        };
        self.candidate = Some(candidate);

        let held = elapsed_ms(candidate.since, now) >= stability_ms;
        let supported = candidate.direction == MotionDirection::Stationary || candidate.moved;

        if held && supported && self.reported != candidate.direction {
            self.reported = candidate.direction;
            Some(candidate.direction)
        } else {
            None
        }
    }

    /// Direction that passed the stability gate
    pub fn reported(&self) -> MotionDirection {
        self.reported
    }

    /// Direction currently being evaluated
    pub fn candidate(&self) -> Option<MotionDirection> {
        self.candidate.map(|c| c.direction)
    }

    /// Consecutive deltas that agreed with the current candidate
    pub fn consistency(&self) -> u8 {
        self.candidate.map_or(0, |c| c.consecutive)
    }

    /// Median of the recent deltas
    pub fn median_delta(&self) -> Option<i32> {
        self.deltas.median()
    }

    /// Forget all deltas and fall back to `Unknown`
    pub fn clear(&mut self) {
        self.deltas.clear();
        self.candidate = None;
        self.reported = MotionDirection::Unknown;
    }
}

fn classify(median_delta: i32, sensitivity_mm: u32) -> MotionDirection {
    let sensitivity = i32::try_from(sensitivity_mm).unwrap_or(i32::MAX);

    if median_delta <= -sensitivity {
        MotionDirection::Approaching
    } else if median_delta >= sensitivity {
        MotionDirection::Receding
    } else {
        MotionDirection::Stationary
    }
}
