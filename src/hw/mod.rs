//! # Hardware capability interfaces.
//!
//! One narrow async trait per physical capability. The coordination core
//! depends only on these contracts, never on vendor-specific setup: GPIO
//! wiring, PWM duty tables, audio decoding, and camera capture all live
//! behind them.
//!
//! ## Ownership rules
//! - Each device handle is **exclusively owned** by exactly one agent for the
//!   process lifetime. No two agents contend for the same pin or device.
//! - Release happens via `Drop` when the owning agent's task completes, so a
//!   handle is released exactly once.
//!
//! ## Cancellation
//! Blocking reads ([`AudioCapture::read_chunk`], [`VideoCapture::read_frame`])
//! are async so the owning agent can race them against its cancellation
//! token; implementations must either complete promptly or be safe to drop
//! mid-read.

use async_trait::async_trait;
use thiserror::Error;

pub mod sim;

/// Error returned by any hardware capability.
///
/// The core never inspects the detail; it wraps these into
/// [`AgentError`](crate::AgentError) kinds and logs them.
#[derive(Error, Debug)]
#[error("device error: {0}")]
pub struct HwError(pub String);

impl HwError {
    /// Creates a device error from any displayable cause.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// A digital input pin. `true` is the high level.
///
/// The touch sensor is wired active-low (pull-up): a `false` reading means
/// the pad is touched.
#[async_trait]
pub trait DigitalInput: Send + 'static {
    /// Reads the current pin level.
    async fn read(&mut self) -> Result<bool, HwError>;
}

/// A PWM output channel, addressed by duty-cycle percentage.
#[async_trait]
pub trait PwmOutput: Send + 'static {
    /// Sets the duty cycle, in percent of the PWM period.
    async fn set_duty_cycle(&mut self, percent: f64) -> Result<(), HwError>;
}

/// An audio playback device. Sounds are addressed by the asset identifiers
/// listed in configuration.
#[async_trait]
pub trait AudioOutput: Send + 'static {
    /// Plays the named sound to completion or to device buffer handoff.
    async fn play(&mut self, sound: &str) -> Result<(), HwError>;
}

/// An audio capture stream yielding fixed-size chunks of signed 16-bit
/// mono samples.
#[async_trait]
pub trait AudioCapture: Send + 'static {
    /// Reads the next chunk of samples.
    async fn read_chunk(&mut self) -> Result<Vec<i16>, HwError>;
}

/// A distance sensor (ultrasonic or equivalent).
#[async_trait]
pub trait Rangefinder: Send + 'static {
    /// Measures the current distance in centimeters.
    async fn measure_cm(&mut self) -> Result<f64, HwError>;
}

/// One captured camera frame. Opaque to the core; only the motion heuristic
/// looks inside.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Raw frame bytes in whatever format the capture device produces.
    pub data: Vec<u8>,
}

/// A video capture device.
#[async_trait]
pub trait VideoCapture: Send + 'static {
    /// Reads the next frame. A failed capture is a transient error; the
    /// vision agent logs it and keeps sampling.
    async fn read_frame(&mut self) -> Result<Frame, HwError>;
}

/// Frame-level motion heuristic.
///
/// Computer vision itself is out of scope for the core; this trait is the
/// labelled-output seam. Implementations may keep state across frames
/// (previous-frame differencing and the like).
pub trait MotionDetect: Send + 'static {
    /// Returns true if the frame shows motion.
    fn detect(&mut self, frame: &Frame) -> bool;
}
