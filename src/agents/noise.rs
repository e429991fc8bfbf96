//! # Ambient noise sensor source.
//!
//! Reads fixed-size chunks from the audio capture stream, computes their RMS
//! amplitude, and publishes [`EventKind::NoiseDetected`] whenever the RMS is
//! **strictly greater** than the configured threshold. An RMS exactly at the
//! threshold does not trigger.
//!
//! ## Fire policy
//! Every positive sample: sustained noise fires once per chunk for as long
//! as it stays above the threshold. This intentionally differs from the
//! edge-triggered sensors — the notifier treats repeated noise reports as
//! fresh detections.

use async_trait::async_trait;
use std::time::Duration;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::error::AgentError;
use crate::events::{Bus, Event, EventKind};
use crate::hw::AudioCapture;

/// Sensor agent for the microphone.
pub struct NoiseAgent {
    capture: Box<dyn AudioCapture>,
    bus: Bus,
    threshold: f64,
    cadence: Duration,
}

impl NoiseAgent {
    /// Creates the agent. The capture handle is exclusively owned from here on.
    pub fn new(
        capture: Box<dyn AudioCapture>,
        bus: Bus,
        threshold: f64,
        cadence: Duration,
    ) -> Self {
        Self {
            capture,
            bus,
            threshold,
            cadence,
        }
    }
}

/// Root-mean-square amplitude of a chunk of signed 16-bit samples.
///
/// An empty chunk has zero amplitude.
pub(crate) fn rms(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

#[async_trait]
impl Agent for NoiseAgent {
    fn name(&self) -> &str {
        "noise"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        loop {
            let chunk = select! {
                res = self.capture.read_chunk() => res,
                _ = ctx.cancelled() => return Ok(()),
            };

            match chunk {
                Ok(samples) => {
                    let amplitude = rms(&samples);
                    if amplitude > self.threshold {
                        let ev = Event::new(EventKind::NoiseDetected { rms: amplitude });
                        tracing::info!(seq = ev.seq, rms = amplitude, "noise detected");
                        self.bus.publish(ev);
                    }
                }
                Err(e) => {
                    let err = AgentError::sample(e);
                    tracing::warn!(agent = self.name(), kind = err.as_label(), error = %err, "sample read failed");
                }
            }

            select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = time::sleep(self.cadence) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::sim::SimAudioCapture;

    /// A chunk of constant samples has RMS equal to that constant.
    fn constant_chunk(value: i16, len: usize) -> Vec<i16> {
        vec![value; len]
    }

    #[test]
    fn test_rms_of_constant_chunk() {
        assert_eq!(rms(&constant_chunk(2500, 64)), 2500.0);
        assert_eq!(rms(&constant_chunk(0, 64)), 0.0);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_rms_handles_negative_samples() {
        // Alternating sign, same magnitude: RMS unchanged.
        let chunk: Vec<i16> = (0..64).map(|i| if i % 2 == 0 { 3000 } else { -3000 }).collect();
        assert_eq!(rms(&chunk), 3000.0);
    }

    async fn detections_for(chunks: Vec<Vec<i16>>) -> Vec<Event> {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let capture = SimAudioCapture::new(64).with_chunks(chunks);
        let agent = Box::new(NoiseAgent::new(
            Box::new(capture),
            bus.clone(),
            2000.0,
            Duration::from_millis(1),
        ));
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        time::sleep(Duration::from_millis(50)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    #[tokio::test]
    async fn test_rms_above_threshold_publishes_exactly_one_event() {
        let events = detections_for(vec![constant_chunk(2500, 64)]).await;
        assert_eq!(events.len(), 1);
        match events[0].kind {
            EventKind::NoiseDetected { rms } => assert_eq!(rms, 2500.0),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rms_below_threshold_publishes_nothing() {
        let events = detections_for(vec![constant_chunk(1500, 64)]).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_rms_exactly_at_threshold_does_not_trigger() {
        // Strict `>` semantics: 2000.0 == threshold → no event.
        let events = detections_for(vec![constant_chunk(2000, 64)]).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_sustained_noise_fires_per_chunk() {
        let events =
            detections_for(vec![constant_chunk(2500, 64), constant_chunk(2600, 64)]).await;
        assert_eq!(events.len(), 2);
    }
}
