//! # Agents: sensor sources and actuator consumers.
//!
//! This module defines the [`Agent`] trait (async, cancelable, owns its
//! hardware) and the concrete agents of the rig.
//!
//! ## Architecture
//! ```text
//! Sensor sources (publish to Bus):      Actuator consumers:
//!   TouchAgent      ── Touch ──┐          ServoAgent  ◄── Touch
//!   NoiseAgent      ── Noise ──┼─► Bus ─► NotifierAgent (notify module)
//!   ProximityAgent  ── Prox ───┤          AudioAgent  ◄── alert line (mpsc)
//!   VisionAgent     ── Motion ─┘                      ◄── idle timer
//! ```
//!
//! ## Fire policies (fixed per variant)
//! - **Touch**: rising edge only — one event per press, not per tick held.
//! - **Noise**: every positive sample — one event per chunk whose RMS is
//!   strictly above the threshold.
//! - **Proximity**: rising edge — one event on entering range.
//! - **Vision**: rising edge — one event on motion onset.
//!
//! ## Error policy
//! A failed sample read or actuator write is logged and the loop continues;
//! it is never fatal to the agent or the process. Agents only return early
//! on cancellation.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

mod audio;
mod noise;
mod proximity;
mod servo;
mod touch;
mod vision;

pub use audio::{AlertSender, AudioAgent};
pub use noise::NoiseAgent;
pub use proximity::ProximityAgent;
pub use servo::{ServoAgent, SWEEP_DUTIES};
pub use touch::TouchAgent;
pub use vision::VisionAgent;

/// # Asynchronous, cancelable agent.
///
/// An `Agent` has a stable [`name`](Agent::name) and an async
/// [`run`](Agent::run) loop that receives a [`CancellationToken`].
/// `run` consumes the agent: the agent exclusively owns its hardware
/// handles, and dropping it on loop exit releases them exactly once.
///
/// Implementations must check cancellation at every suspension point
/// (sampling sleeps, blocking reads, timed action steps) so shutdown
/// completes within the supervisor's grace period.
#[async_trait]
pub trait Agent: Send + 'static {
    /// Returns a stable, human-readable agent name.
    fn name(&self) -> &str;

    /// Runs the agent loop until cancellation.
    ///
    /// Returning `Ok(())` means a graceful exit (cancellation observed).
    /// Returning an error is terminal for this agent; the supervisor logs it
    /// and does not restart.
    async fn run(self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError>;
}
