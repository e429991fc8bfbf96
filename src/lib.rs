//! # petvisor
//!
//! **Petvisor** is the event coordination runtime for a sensor/actuator
//! companion rig on a single-board computer. It detects physical events
//! (touch, ambient noise, ultrasonic proximity, camera motion) and reacts by
//! driving actuators (servo motion, audio playback) and by notifying a
//! remote service over HTTP.
//!
//! The crate is the concurrency and failure-handling core: a broadcast event
//! bus decoupling sensor agents from consumers, a supervisor binding every
//! agent to one process lifetime, and the best-effort delivery policy for
//! remote notification. Raw GPIO wiring, PWM duty tables, audio decoding,
//! and frame capture stay behind the narrow capability traits in [`hw`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌────────────┐ ┌────────────┐ ┌───────────────┐ ┌─────────────┐
//!  │ TouchAgent │ │ NoiseAgent │ │ProximityAgent │ │ VisionAgent │   sensor sources
//!  └─────┬──────┘ └─────┬──────┘ └──────┬────────┘ └──────┬──────┘
//!        │ Touch        │ Noise         │ Proximity       │ Motion
//!        ▼              ▼               ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                   │
//! │          publish() never blocks; per-producer FIFO            │
//! └──────────────┬───────────────────────────────┬────────────────┘
//!                ▼                               ▼
//!        ┌──────────────┐               ┌─────────────────┐
//!        │  ServoAgent  │               │  NotifierAgent  │
//!        │ (Touch only) │               │ (reportable set)│
//!        └──────────────┘               └────────┬────────┘
//!                                                │ delivery failed?
//!                                         alert line (mpsc)
//!                                                ▼
//!                                        ┌──────────────┐
//!                                        │  AudioAgent  │ ◄── idle timer
//!                                        └──────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Config::from_file ──► Supervisor::new ──► construct agents (bus injected)
//!                                       └─► Supervisor::run(agents)
//!
//! run():
//!   ├─► spawn one task per agent (child CancellationToken each)
//!   ├─► agents loop: sample → publish / recv → act, errors logged, never fatal
//!   └─► on SIGINT/SIGTERM (or trigger_shutdown):
//!         ├─► cancel all child tokens
//!         ├─► agents unwind at their suspension points
//!         ├─► hardware handles released by drop, exactly once
//!         └─► bounded grace; stuck agents reported via RuntimeError
//! ```
//!
//! ## Features
//! | Area           | Description                                             | Key types / traits                      |
//! |----------------|---------------------------------------------------------|-----------------------------------------|
//! | **Events**     | Closed tagged-variant detections and the broadcast bus. | [`Event`], [`EventKind`], [`Bus`]       |
//! | **Agents**     | Sensor sources and actuator consumers, all cancelable.  | [`Agent`], [`TouchAgent`], [`ServoAgent`] |
//! | **Notify**     | Best-effort at-most-one-attempt HTTP forwarding.        | [`NotifierAgent`], [`DeliveryState`]    |
//! | **Hardware**   | Narrow capability seams plus sim implementations.       | [`hw::DigitalInput`], [`hw::sim`]       |
//! | **Supervision**| One process lifetime, cooperative shutdown with grace.  | [`Supervisor`]                          |
//! | **Errors**     | Typed error kinds per operation.                        | [`RuntimeError`], [`AgentError`]        |
//!
//! ## Example
//! ```no_run
//! use petvisor::hw::sim::{SimAudioOutput, SimDigitalInput};
//! use petvisor::{AudioAgent, Config, NotifierAgent, Supervisor, TouchAgent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::from_json(r#"{ "url": "http://localhost:9000/notify" }"#)?;
//!     let sup = Supervisor::new(cfg.bus_capacity, cfg.grace());
//!
//!     let touch = TouchAgent::new(
//!         Box::new(SimDigitalInput::new(true)),
//!         sup.bus().clone(),
//!         cfg.touch_cadence(),
//!     );
//!     let audio = AudioAgent::new(
//!         Box::new(SimAudioOutput::new()),
//!         cfg.sounds.clone(),
//!         cfg.error_sound.clone(),
//!         (cfg.idle_sound_min_secs, cfg.idle_sound_max_secs),
//!     );
//!     let notifier = NotifierAgent::new(&cfg, sup.bus(), audio.alert_sender())?;
//!
//!     sup.run(vec![Box::new(touch), Box::new(audio), Box::new(notifier)])
//!         .await?;
//!     Ok(())
//! }
//! ```

mod agents;
mod config;
mod core;
mod error;
mod events;
pub mod hw;
mod notify;

// ---- Public re-exports ----

pub use agents::{
    Agent, AlertSender, AudioAgent, NoiseAgent, ProximityAgent, ServoAgent, TouchAgent,
    VisionAgent, SWEEP_DUTIES,
};
pub use config::Config;
pub use core::Supervisor;
pub use error::{AgentError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use notify::{build_payload, DeliveryState, NotifierAgent};
