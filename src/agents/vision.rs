//! # Camera motion sensor source.
//!
//! Captures frames at a frame-rate-bound cadence, feeds each to the injected
//! [`MotionDetect`] heuristic, and publishes [`EventKind::MotionDetected`] on
//! motion onset. The heuristic itself (frame differencing, background
//! subtraction, whatever the vendor provides) is outside the core; this
//! agent only consumes its boolean verdict.
//!
//! ## Fire policy
//! Rising edge: one event when motion starts; re-arms after a still frame.
//!
//! A failed capture (device busy, dropped frame) is logged and the loop
//! continues on the next tick.

use async_trait::async_trait;
use std::time::Duration;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::error::AgentError;
use crate::events::{Bus, Event, EventKind};
use crate::hw::{MotionDetect, VideoCapture};

/// Sensor agent for the camera.
pub struct VisionAgent {
    capture: Box<dyn VideoCapture>,
    detector: Box<dyn MotionDetect>,
    bus: Bus,
    cadence: Duration,
}

impl VisionAgent {
    /// Creates the agent. The capture handle is exclusively owned from here on.
    pub fn new(
        capture: Box<dyn VideoCapture>,
        detector: Box<dyn MotionDetect>,
        bus: Bus,
        cadence: Duration,
    ) -> Self {
        Self {
            capture,
            detector,
            bus,
            cadence,
        }
    }
}

#[async_trait]
impl Agent for VisionAgent {
    fn name(&self) -> &str {
        "vision"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        let mut was_moving = false;

        loop {
            let frame = select! {
                res = self.capture.read_frame() => res,
                _ = ctx.cancelled() => return Ok(()),
            };

            match frame {
                Ok(frame) => {
                    let moving = self.detector.detect(&frame);
                    if moving && !was_moving {
                        let ev = Event::new(EventKind::MotionDetected);
                        tracing::info!(seq = ev.seq, "motion detected");
                        self.bus.publish(ev);
                    }
                    was_moving = moving;
                }
                Err(e) => {
                    let err = AgentError::sample(e);
                    tracing::warn!(agent = self.name(), kind = err.as_label(), error = %err, "frame capture failed");
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
    use crate::hw::sim::{SimMotionDetect, SimVideoCapture};
    use crate::hw::{Frame, HwError};

    #[tokio::test]
    async fn test_capture_failure_is_tolerated() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        // First read fails; motion is reported on the next good frame.
        let capture = SimVideoCapture::new().with_results([
            Err(HwError::new("capture device busy")),
            Ok(Frame::default()),
        ]);
        let detector = SimMotionDetect::new(false).with_verdicts([true]);
        let agent = Box::new(VisionAgent::new(
            Box::new(capture),
            Box::new(detector),
            bus.clone(),
            Duration::from_millis(1),
        ));
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        time::sleep(Duration::from_millis(50)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        let ev = rx.try_recv().expect("motion event after failed capture");
        assert!(matches!(ev.kind, EventKind::MotionDetected));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sustained_motion_fires_once() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let capture = SimVideoCapture::new();
        let detector = SimMotionDetect::new(false).with_verdicts([true, true, true, false, true]);
        let agent = Box::new(VisionAgent::new(
            Box::new(capture),
            Box::new(detector),
            bus.clone(),
            Duration::from_millis(1),
        ));
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        time::sleep(Duration::from_millis(50)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
