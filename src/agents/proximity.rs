//! # Ultrasonic proximity sensor source.
//!
//! Measures distance at a slow fixed cadence and publishes
//! [`EventKind::ProximityDetected`] when something enters range: measured
//! distance **strictly below** the configured threshold. A distance exactly
//! at the threshold does not trigger.
//!
//! ## Fire policy
//! Rising edge: one event on entering range. An object parked in front of
//! the sensor fires once; the agent re-arms when a reading at or beyond the
//! threshold is observed.

use async_trait::async_trait;
use std::time::Duration;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::error::AgentError;
use crate::events::{Bus, Event, EventKind};
use crate::hw::Rangefinder;

/// Sensor agent for the rangefinder.
pub struct ProximityAgent {
    rangefinder: Box<dyn Rangefinder>,
    bus: Bus,
    threshold_cm: f64,
    cadence: Duration,
}

impl ProximityAgent {
    /// Creates the agent. The rangefinder handle is exclusively owned from
    /// here on.
    pub fn new(
        rangefinder: Box<dyn Rangefinder>,
        bus: Bus,
        threshold_cm: f64,
        cadence: Duration,
    ) -> Self {
        Self {
            rangefinder,
            bus,
            threshold_cm,
            cadence,
        }
    }
}

#[async_trait]
impl Agent for ProximityAgent {
    fn name(&self) -> &str {
        "proximity"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        let mut was_in_range = false;

        loop {
            select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = time::sleep(self.cadence) => {}
            }

            let reading = select! {
                res = self.rangefinder.measure_cm() => res,
                _ = ctx.cancelled() => return Ok(()),
            };

            match reading {
                Ok(distance_cm) => {
                    let in_range = distance_cm < self.threshold_cm;
                    if in_range && !was_in_range {
                        let ev = Event::new(EventKind::ProximityDetected { distance_cm });
                        tracing::info!(seq = ev.seq, distance_cm, "proximity detected");
                        self.bus.publish(ev);
                    }
                    was_in_range = in_range;
                }
                Err(e) => {
                    let err = AgentError::sample(e);
                    tracing::warn!(agent = self.name(), kind = err.as_label(), error = %err, "sample read failed");
                }
            }
        }
    }
}
