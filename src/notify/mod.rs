//! Remote notification: payload shape and the notifier consumer.
//!
//! ## Contents
//! - [`build_payload`] — deterministic JSON body construction
//! - [`NotifierAgent`], [`DeliveryState`] — best-effort, at-most-one-attempt
//!   HTTP delivery with local error feedback

mod notifier;
mod payload;

pub use notifier::{DeliveryState, NotifierAgent};
pub use payload::build_payload;
