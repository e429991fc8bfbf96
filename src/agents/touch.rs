//! # Touch sensor source.
//!
//! Samples an active-low digital input (pull-up wiring: low level means the
//! pad is touched) at a fixed debounce cadence and publishes
//! [`EventKind::Touch`] on the **rising edge** of a press.
//!
//! ## Fire policy
//! One event per press. A pad held down across many ticks fires once, on the
//! tick where the level transitions to pressed; it arms again only after a
//! released sample is observed.

use async_trait::async_trait;
use std::time::Duration;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::error::AgentError;
use crate::events::{Bus, Event, EventKind};
use crate::hw::DigitalInput;

/// Sensor agent for the touch pad.
pub struct TouchAgent {
    input: Box<dyn DigitalInput>,
    bus: Bus,
    cadence: Duration,
}

impl TouchAgent {
    /// Creates the agent. The input handle is exclusively owned from here on.
    pub fn new(input: Box<dyn DigitalInput>, bus: Bus, cadence: Duration) -> Self {
        Self { input, bus, cadence }
    }
}

#[async_trait]
impl Agent for TouchAgent {
    fn name(&self) -> &str {
        "touch"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        let mut was_pressed = false;

        loop {
            select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = time::sleep(self.cadence) => {}
            }

            let level = select! {
                res = self.input.read() => res,
                _ = ctx.cancelled() => return Ok(()),
            };

            match level {
                Ok(level) => {
                    // Active-low: a low level is a press.
                    let pressed = !level;
                    if pressed && !was_pressed {
                        let ev = Event::new(EventKind::Touch);
                        tracing::info!(seq = ev.seq, "touch detected");
                        self.bus.publish(ev);
                    }
                    was_pressed = pressed;
                }
                Err(e) => {
                    let err = AgentError::sample(e);
                    tracing::warn!(agent = self.name(), kind = err.as_label(), error = %err, "sample read failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::sim::SimDigitalInput;

    async fn run_ticks(input: SimDigitalInput, ticks: u32) -> Vec<Event> {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let agent = Box::new(TouchAgent::new(
            Box::new(input),
            bus.clone(),
            Duration::from_millis(1),
        ));
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        time::sleep(Duration::from_millis(u64::from(ticks) * 5)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    #[tokio::test]
    async fn test_low_reading_publishes_touch() {
        // One low sample among highs: exactly one Touch event.
        let input = SimDigitalInput::new(true).with_script([true, false, true]);
        let events = run_ticks(input, 10).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::Touch));
    }

    #[tokio::test]
    async fn test_held_pad_fires_once_per_press() {
        // Held low across several ticks, released, pressed again: two events.
        let input =
            SimDigitalInput::new(true).with_script([false, false, false, true, false, true]);
        let events = run_ticks(input, 12).await;
        assert_eq!(events.len(), 2);
    }
}
