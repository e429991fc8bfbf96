//! # Event bus for broadcasting detections.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that carries
//! [`Event`]s from every sensor agent to every subscribed consumer.
//!
//! ## Architecture
//! ```text
//! Publishers (sensors):              Subscribers (consumers):
//!   TouchAgent     ──┐             ┌──► ServoAgent    (filters Touch)
//!   NoiseAgent     ──┤             ├──► AudioAgent    (alert line only; see agents::audio)
//!   ProximityAgent ──┼──► Bus ─────┤
//!   VisionAgent    ──┘             └──► NotifierAgent (filters reportable kinds)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; a slow consumer can
//!   never stall sensor detection.
//! - **Broadcast semantics**: every subscriber sees every event published
//!   after it subscribed; an event is not consumed by being read.
//! - **Per-producer FIFO**: a subscriber observes events from a single
//!   producer in publication order. No ordering across producers.
//!
//! ## Capacity behavior (explicit drop-oldest)
//! The channel is a bounded ring shared by all receivers. When a receiver
//! falls more than `capacity` events behind, it observes
//! `RecvError::Lagged(n)` on its next `recv()` and skips the `n` oldest
//! items. This is the bus's full-buffer policy: drop-oldest per lagging
//! subscriber, never block the publisher.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for detection events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] providing a
/// `publish`/`subscribe` API. Multiple sensor agents publish concurrently;
/// each subscriber receives its own copy of each event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees; events
///   published with no subscribers are dropped.
/// - **Cloneable**: cheap to clone (internally an `Arc`-backed sender), so
///   the supervisor hands one clone to each sensor agent at construction.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given ring capacity (clamped to 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// Safe to call concurrently from every sensor agent. If there are no
    /// receivers the event is dropped and this still returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new independent receiver.
    ///
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers observe `RecvError::Lagged(n)` and skip missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_every_subscriber_sees_each_event_once() {
        let bus = Bus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::new(EventKind::Touch));

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.seq, e2.seq);
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_per_producer_fifo_order() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        let first = Event::new(EventKind::NoiseDetected { rms: 2100.0 });
        let second = Event::new(EventKind::NoiseDetected { rms: 2200.0 });
        bus.publish(first);
        bus.publish(second);

        assert_eq!(rx.recv().await.unwrap().seq, first.seq);
        assert_eq!(rx.recv().await.unwrap().seq, second.seq);
    }

    #[tokio::test]
    async fn test_subscriber_only_sees_events_after_subscribe() {
        let bus = Bus::new(16);
        bus.publish(Event::new(EventKind::Touch));

        let mut rx = bus.subscribe();
        let later = Event::new(EventKind::MotionDetected);
        bus.publish(later);

        assert_eq!(rx.recv().await.unwrap().seq, later.seq);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lagging_receiver_drops_oldest() {
        let bus = Bus::new(2);
        let mut rx = bus.subscribe();

        for _ in 0..4 {
            bus.publish(Event::new(EventKind::Touch));
        }

        // Ring holds the 2 newest; the next recv reports the lag.
        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(n)) => assert_eq!(n, 2),
            other => panic!("expected Lagged, got {other:?}"),
        }
    }
}
