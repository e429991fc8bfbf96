//! # Servo actuator consumer.
//!
//! Subscribes to the bus, reacts only to [`EventKind::Touch`], and runs a
//! fixed five-step duty-cycle sweep on two PWM channels driven in lockstep:
//! `[2.5, 7.5, 12.5, 7.5, 2.5]` percent, with a configurable inter-step
//! delay (one second by default). The sweep ends back at the starting
//! position.
//!
//! ## Busy policy
//! While sweeping, the agent is non-responsive; events that arrived during
//! the sweep are **dropped** (the receiver is drained before the next wait)
//! rather than queued, so a burst of touches cannot build a backlog of
//! sweeps.
//!
//! ## Error policy
//! A PWM write failure aborts the current sweep, is logged, and the agent
//! stays subscribed.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::error::AgentError;
use crate::events::{Bus, Event, EventKind};
use crate::hw::PwmOutput;

/// Duty-cycle set-points of the sweep, in percent. Starts and ends at the
/// rest position.
pub const SWEEP_DUTIES: [f64; 5] = [2.5, 7.5, 12.5, 7.5, 2.5];

/// Actuator agent for the two servos.
pub struct ServoAgent {
    pwm1: Box<dyn PwmOutput>,
    pwm2: Box<dyn PwmOutput>,
    rx: broadcast::Receiver<Event>,
    step: Duration,
}

impl ServoAgent {
    /// Creates the agent, subscribing to the bus immediately so no event
    /// published after construction is missed. Both PWM handles are
    /// exclusively owned from here on.
    pub fn new(
        pwm1: Box<dyn PwmOutput>,
        pwm2: Box<dyn PwmOutput>,
        bus: &Bus,
        step: Duration,
    ) -> Self {
        Self {
            pwm1,
            pwm2,
            rx: bus.subscribe(),
            step,
        }
    }

    /// Runs one full sweep. Returns early (Ok) on cancellation, and on the
    /// first PWM failure (logged by the caller via the error).
    async fn sweep(&mut self, ctx: &CancellationToken) -> Result<(), AgentError> {
        for duty in SWEEP_DUTIES {
            self.pwm1
                .set_duty_cycle(duty)
                .await
                .map_err(AgentError::actuate)?;
            self.pwm2
                .set_duty_cycle(duty)
                .await
                .map_err(AgentError::actuate)?;

            select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = time::sleep(self.step) => {}
            }
        }
        Ok(())
    }

    /// Drops everything that queued up while the sweep was running.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }
}

#[async_trait]
impl Agent for ServoAgent {
    fn name(&self) -> &str {
        "servo"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        loop {
            let ev = select! {
                res = self.rx.recv() => res,
                _ = ctx.cancelled() => return Ok(()),
            };

            match ev {
                Ok(ev) if matches!(ev.kind, EventKind::Touch) => {
                    tracing::debug!(seq = ev.seq, "starting sweep");
                    if let Err(e) = self.sweep(&ctx).await {
                        tracing::warn!(agent = self.name(), kind = e.as_label(), error = %e, "sweep aborted");
                    }
                    if ctx.is_cancelled() {
                        return Ok(());
                    }
                    self.drain();
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(agent = self.name(), skipped = n, "lagged behind bus");
                }
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
    }
}
