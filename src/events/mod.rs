//! Detection events: data model and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to fan
//! detections out from sensor agents to actuator and notifier consumers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — closed tagged-variant event model
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TouchAgent`, `NoiseAgent`, `ProximityAgent`,
//!   `VisionAgent`.
//! - **Consumers**: `ServoAgent`, `NotifierAgent`. (`AudioAgent` is driven by
//!   its idle timer and the notifier's alert line, not by the bus.)

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
