//! # Audio actuator consumer.
//!
//! Owns the audio output device exclusively and serves two duties:
//!
//! - **Idle ambience**: after a random delay drawn from a bounded range, play
//!   a pseudo-random member of the configured sound set, then re-arm.
//! - **Error feedback**: play the fixed alert sound whenever the notifier
//!   signals a delivery failure.
//!
//! The notifier cannot own the audio device (one agent per device), and
//! consumers never feed back into the bus, so the alert travels over a
//! dedicated bounded mpsc line: the notifier holds an [`AlertSender`], this
//! agent holds the receiving end.
//!
//! ## Error policy
//! A playback failure is logged and the loop continues.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::error::AgentError;
use crate::hw::AudioOutput;

/// Sending half of the error-feedback line. Held by the notifier; each send
/// requests one alert playback.
pub type AlertSender = mpsc::Sender<()>;

/// Capacity of the alert line. Failures arriving while an alert is already
/// pending beyond this are dropped by the sender.
const ALERT_LINE_CAPACITY: usize = 8;

/// Actuator agent for the speaker.
pub struct AudioAgent {
    out: Box<dyn AudioOutput>,
    sounds: Vec<String>,
    error_sound: String,
    idle_range_secs: (u64, u64),
    alert_tx: AlertSender,
    alert_rx: mpsc::Receiver<()>,
}

impl AudioAgent {
    /// Creates the agent. The output handle is exclusively owned from here
    /// on. `idle_range_secs` is the inclusive `(min, max)` bound of the
    /// random ambience delay.
    pub fn new(
        out: Box<dyn AudioOutput>,
        sounds: Vec<String>,
        error_sound: String,
        idle_range_secs: (u64, u64),
    ) -> Self {
        let (alert_tx, alert_rx) = mpsc::channel(ALERT_LINE_CAPACITY);
        Self {
            out,
            sounds,
            error_sound,
            idle_range_secs,
            alert_tx,
            alert_rx,
        }
    }

    /// Returns a sender for the error-feedback line, to hand to the
    /// notifier at construction time.
    pub fn alert_sender(&self) -> AlertSender {
        self.alert_tx.clone()
    }

    /// Picks the next idle delay and sound index. Scoped so the rng (not
    /// `Send`) is never held across an await.
    fn pick_idle(&self) -> (Duration, Option<usize>) {
        let mut rng = rand::rng();
        let (min, max) = self.idle_range_secs;
        let wait = Duration::from_secs(rng.random_range(min..=max));
        let choice = if self.sounds.is_empty() {
            None
        } else {
            Some(rng.random_range(0..self.sounds.len()))
        };
        (wait, choice)
    }

    async fn play(&mut self, sound: &str) {
        if let Err(e) = self.out.play(sound).await {
            let err = AgentError::actuate(e);
            tracing::warn!(agent = "audio", kind = err.as_label(), error = %err, sound, "playback failed");
        }
    }
}

#[async_trait]
impl Agent for AudioAgent {
    fn name(&self) -> &str {
        "audio"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        loop {
            let (wait, choice) = self.pick_idle();

            select! {
                _ = ctx.cancelled() => return Ok(()),
                cue = self.alert_rx.recv() => {
                    // recv cannot yield None: we hold a sender ourselves.
                    if cue.is_some() {
                        tracing::info!("playing delivery-failure alert");
                        let sound = self.error_sound.clone();
                        self.play(&sound).await;
                    }
                }
                _ = time::sleep(wait) => {
                    if let Some(idx) = choice {
                        let sound = self.sounds[idx].clone();
                        tracing::debug!(sound = %sound, "playing idle ambience");
                        self.play(&sound).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::sim::SimAudioOutput;

    #[tokio::test]
    async fn test_alert_cue_plays_error_sound() {
        let out = SimAudioOutput::new();
        let played = out.played();
        let agent = Box::new(AudioAgent::new(
            Box::new(out),
            vec!["purr.wav".to_string()],
            "please_connect.wav".to_string(),
            (60, 60), // idle ambience far in the future
        ));
        let alerts = agent.alert_sender();
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        alerts.try_send(()).unwrap();
        time::sleep(Duration::from_millis(50)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        assert_eq!(*played.lock().unwrap(), vec!["please_connect.wav"]);
    }

    #[tokio::test]
    async fn test_idle_ambience_plays_from_configured_set() {
        let out = SimAudioOutput::new();
        let played = out.played();
        let agent = Box::new(AudioAgent::new(
            Box::new(out),
            vec!["purr.wav".to_string(), "chirp.wav".to_string()],
            "please_connect.wav".to_string(),
            (0, 0), // fire immediately
        ));
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        time::sleep(Duration::from_millis(50)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        let played = played.lock().unwrap();
        assert!(!played.is_empty());
        for sound in played.iter() {
            assert!(sound == "purr.wav" || sound == "chirp.wav");
        }
    }

    #[tokio::test]
    async fn test_empty_sound_set_plays_nothing_idle() {
        let out = SimAudioOutput::new();
        let played = out.played();
        let agent = Box::new(AudioAgent::new(
            Box::new(out),
            Vec::new(),
            "please_connect.wav".to_string(),
            (0, 0),
        ));
        let ctx = CancellationToken::new();
        let handle = tokio::spawn(agent.run(ctx.clone()));

        time::sleep(Duration::from_millis(30)).await;
        ctx.cancel();
        handle.await.unwrap().unwrap();

        assert!(played.lock().unwrap().is_empty());
    }
}
