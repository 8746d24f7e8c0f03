//! Dual-Sensor Direction Confirmation Timing
//!
//! Values match a far PIR covering roughly 3-12 m and a near PIR covering
//! 0.5-4 m. A walking person crosses from one zone to the other in one to
//! four seconds.

/// Maximum time from far trigger to near trigger for an approach (ms).
pub const DEFAULT_CONFIRMATION_WINDOW_MS: u32 = 5000;

/// Triggers closer together than this are ambiguous (ms).
///
/// PIR output jitter is a few hundred milliseconds, so two edges inside
/// half a second cannot be ordered reliably.
pub const DEFAULT_SIMULTANEOUS_THRESHOLD_MS: u32 = 500;

/// Non-idle state older than this is abandoned (ms).
pub const DEFAULT_PATTERN_TIMEOUT_MS: u32 = 10_000;
