//! # Static rig configuration.
//!
//! [`Config`] is parsed once at startup from a JSON document and consumed as
//! an immutable structure. A malformed document is startup-fatal
//! ([`RuntimeError::Config`]); nothing here is runtime-recoverable.
//!
//! ## Document shape
//! ```json
//! {
//!   "url": "https://example.test/notify",
//!   "payload": { "device": "pet-01" },
//!   "sounds": ["purr.wav", "chirp.wav"],
//!   "error_sound": "please_connect.wav",
//!   "noise_rms_threshold": 2000.0,
//!   "proximity_threshold_cm": 30.0,
//!   "reportable": ["TOUCH", "NOISE_DETECTED"]
//! }
//! ```
//! Only `url` is required; every other field has a documented default.
//! Unknown keys are ignored so a config document can carry fields for
//! out-of-process tooling.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RuntimeError;

/// Immutable rig configuration, shared read-only by all agents.
///
/// Detection thresholds use strict comparisons: a noise RMS exactly at
/// `noise_rms_threshold` does **not** trigger, and a distance exactly at
/// `proximity_threshold_cm` does **not** trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Remote notification endpoint (HTTP POST target).
    pub url: String,

    /// Static payload template merged into every notification body.
    /// `event_type` is inserted at send time, overwriting if present.
    #[serde(default)]
    pub payload: Map<String, Value>,

    /// Candidate idle-ambience sound assets.
    #[serde(default)]
    pub sounds: Vec<String>,

    /// Alert sound played on notification delivery failure.
    #[serde(default = "defaults::error_sound")]
    pub error_sound: String,

    /// Noise detection fires when chunk RMS is strictly above this.
    #[serde(default = "defaults::noise_rms_threshold")]
    pub noise_rms_threshold: f64,

    /// Proximity detection fires when distance is strictly below this.
    #[serde(default = "defaults::proximity_threshold_cm")]
    pub proximity_threshold_cm: f64,

    /// Event labels the notifier forwards (see
    /// [`EventKind::label`](crate::EventKind::label)).
    #[serde(default = "defaults::reportable")]
    pub reportable: Vec<String>,

    /// Touch sampling cadence, milliseconds (~10 Hz debounce).
    #[serde(default = "defaults::touch_cadence_ms")]
    pub touch_cadence_ms: u64,

    /// Noise sampling cadence, milliseconds.
    #[serde(default = "defaults::noise_cadence_ms")]
    pub noise_cadence_ms: u64,

    /// Proximity sampling cadence, milliseconds (~1 Hz).
    #[serde(default = "defaults::proximity_cadence_ms")]
    pub proximity_cadence_ms: u64,

    /// Vision sampling cadence, milliseconds (frame-rate bound).
    #[serde(default = "defaults::vision_cadence_ms")]
    pub vision_cadence_ms: u64,

    /// Delay between servo sweep set-points, milliseconds.
    #[serde(default = "defaults::servo_step_ms")]
    pub servo_step_ms: u64,

    /// Lower bound of the random idle-ambience delay, seconds.
    #[serde(default = "defaults::idle_sound_min_secs")]
    pub idle_sound_min_secs: u64,

    /// Upper bound of the random idle-ambience delay, seconds (inclusive).
    #[serde(default = "defaults::idle_sound_max_secs")]
    pub idle_sound_max_secs: u64,

    /// Notification request timeout, seconds.
    #[serde(default = "defaults::http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Event bus ring capacity (clamped to 1 by the bus).
    #[serde(default = "defaults::bus_capacity")]
    pub bus_capacity: usize,

    /// Shutdown grace period, seconds.
    #[serde(default = "defaults::grace_secs")]
    pub grace_secs: u64,
}

mod defaults {
    pub fn error_sound() -> String {
        "please_connect.wav".to_string()
    }
    pub fn noise_rms_threshold() -> f64 {
        2000.0
    }
    pub fn proximity_threshold_cm() -> f64 {
        30.0
    }
    pub fn reportable() -> Vec<String> {
        vec!["TOUCH".to_string(), "NOISE_DETECTED".to_string()]
    }
    pub fn touch_cadence_ms() -> u64 {
        100
    }
    pub fn noise_cadence_ms() -> u64 {
        100
    }
    pub fn proximity_cadence_ms() -> u64 {
        1000
    }
    pub fn vision_cadence_ms() -> u64 {
        66
    }
    pub fn servo_step_ms() -> u64 {
        1000
    }
    pub fn idle_sound_min_secs() -> u64 {
        5
    }
    pub fn idle_sound_max_secs() -> u64 {
        15
    }
    pub fn http_timeout_secs() -> u64 {
        10
    }
    pub fn bus_capacity() -> usize {
        1024
    }
    pub fn grace_secs() -> u64 {
        5
    }
}

impl Config {
    /// Loads and validates configuration from a JSON file.
    ///
    /// Any I/O, parse, or validation failure is returned as
    /// [`RuntimeError::Config`] and should abort startup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| RuntimeError::Config {
            reason: format!("read {}: {e}", path.display()),
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, RuntimeError> {
        let cfg: Config = serde_json::from_str(raw).map_err(|e| RuntimeError::Config {
            reason: format!("parse: {e}"),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), RuntimeError> {
        if self.url.is_empty() {
            return Err(RuntimeError::Config {
                reason: "url must not be empty".to_string(),
            });
        }
        if self.idle_sound_min_secs > self.idle_sound_max_secs {
            return Err(RuntimeError::Config {
                reason: format!(
                    "idle_sound_min_secs ({}) exceeds idle_sound_max_secs ({})",
                    self.idle_sound_min_secs, self.idle_sound_max_secs
                ),
            });
        }
        Ok(())
    }

    /// Touch sampling cadence as a [`Duration`].
    #[inline]
    pub fn touch_cadence(&self) -> Duration {
        Duration::from_millis(self.touch_cadence_ms)
    }

    /// Noise sampling cadence as a [`Duration`].
    #[inline]
    pub fn noise_cadence(&self) -> Duration {
        Duration::from_millis(self.noise_cadence_ms)
    }

    /// Proximity sampling cadence as a [`Duration`].
    #[inline]
    pub fn proximity_cadence(&self) -> Duration {
        Duration::from_millis(self.proximity_cadence_ms)
    }

    /// Vision sampling cadence as a [`Duration`].
    #[inline]
    pub fn vision_cadence(&self) -> Duration {
        Duration::from_millis(self.vision_cadence_ms)
    }

    /// Servo inter-step delay as a [`Duration`].
    #[inline]
    pub fn servo_step(&self) -> Duration {
        Duration::from_millis(self.servo_step_ms)
    }

    /// Notification request timeout as a [`Duration`].
    #[inline]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Shutdown grace period as a [`Duration`].
    #[inline]
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}
