//! # Detection events emitted by sensor agents.
//!
//! [`EventKind`] is the closed set of physical conditions the rig can detect.
//! Kind-specific measurements (RMS amplitude, distance) live inside the
//! variant, so consumers that filter by kind get compile-time exhaustiveness
//! instead of string tags.
//!
//! The [`Event`] struct wraps a kind with a monotonic creation instant and a
//! globally unique sequence number. Both exist for observability only: bus
//! delivery order is per-producer FIFO regardless of `seq`.
//!
//! ## Example
//! ```rust
//! use petvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::NoiseDetected { rms: 2500.0 });
//! assert_eq!(ev.kind.label(), "NOISE_DETECTED");
//! assert!(ev.kind.same_kind(&EventKind::NoiseDetected { rms: 0.0 }));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Instant;

/// Global sequence counter for event ordering in logs.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A detected physical condition, with its kind-specific measurement.
///
/// The set is closed and known at compile time; consumers match on it
/// exhaustively. Wire labels (see [`EventKind::label`]) are the uppercase
/// tags used in the notification payload's `event_type` field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Touch sensor pressed (active-low digital input went low).
    Touch,
    /// Ambient noise RMS amplitude exceeded the configured threshold.
    NoiseDetected {
        /// Measured RMS amplitude of the triggering chunk.
        rms: f64,
    },
    /// Measured distance dropped below the configured threshold.
    ProximityDetected {
        /// Measured distance in centimeters.
        distance_cm: f64,
    },
    /// Camera motion heuristic reported movement.
    MotionDetected,
}

impl EventKind {
    /// Returns the wire label for this kind, used as the `event_type` value
    /// in notification payloads and in the configured reportable list.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Touch => "TOUCH",
            EventKind::NoiseDetected { .. } => "NOISE_DETECTED",
            EventKind::ProximityDetected { .. } => "PROXIMITY_DETECTED",
            EventKind::MotionDetected => "MOTION_DETECTED",
        }
    }

    /// True if `other` is the same variant, ignoring measurements.
    ///
    /// Consumers filter with this (or with `matches!`) rather than comparing
    /// payload values.
    pub fn same_kind(&self, other: &EventKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Immutable record of one detection.
///
/// Created by exactly one sensor agent, published once, and read (never
/// mutated) by every subscribed consumer.
///
/// - `seq`: globally unique, monotonically increasing (log correlation only)
/// - `at`: monotonic creation instant (observability, not ordering)
#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Monotonic creation instant.
    pub at: Instant,
    /// What was detected, with its measurement.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with the current instant and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: Instant::now(),
            kind,
        }
    }
}
