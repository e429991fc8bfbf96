//! # Notifier consumer: best-effort HTTP forwarding of reportable events.
//!
//! Subscribes to the bus, filters for the configured reportable kinds, and
//! forwards each match as a single HTTP POST with a bounded timeout.
//!
//! ## Delivery state machine (per attempt)
//! ```text
//! Idle ──► Sending ──► Delivered   (2xx within timeout)
//!                 └──► Failed      (transport error, timeout, non-2xx)
//! ```
//! Both outcomes are terminal: delivery is best-effort, at-most-one-attempt.
//! There is no transition back to `Sending` for the same event.
//!
//! On `Failed`, the agent fires the error-feedback line exactly once so the
//! audio agent plays the alert sound; the event is not retried and the
//! failure never escalates to other agents.

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tokio::select;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::agents::{Agent, AlertSender};
use crate::config::Config;
use crate::error::{AgentError, RuntimeError};
use crate::events::{Bus, Event};
use crate::notify::payload::build_payload;

/// Terminal outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// 2xx response within the timeout.
    Delivered,
    /// Transport error, timeout, or non-2xx response.
    Failed,
}

/// Notifier agent.
pub struct NotifierAgent {
    rx: broadcast::Receiver<Event>,
    client: reqwest::Client,
    url: String,
    template: serde_json::Map<String, serde_json::Value>,
    reportable: HashSet<String>,
    alerts: AlertSender,
}

impl NotifierAgent {
    /// Creates the agent from configuration, subscribing to the bus
    /// immediately. The HTTP client carries the bounded request timeout; a
    /// client build failure is startup-fatal.
    pub fn new(cfg: &Config, bus: &Bus, alerts: AlertSender) -> Result<Self, RuntimeError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.http_timeout())
            .build()
            .map_err(|e| RuntimeError::Config {
                reason: format!("http client: {e}"),
            })?;

        Ok(Self {
            rx: bus.subscribe(),
            client,
            url: cfg.url.clone(),
            template: cfg.payload.clone(),
            reportable: cfg.reportable.iter().cloned().collect(),
            alerts,
        })
    }

    /// Overrides the request timeout. Test hook for sub-second timeouts.
    #[doc(hidden)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(client) = reqwest::Client::builder().timeout(timeout).build() {
            self.client = client;
        }
        self
    }

    /// Runs one delivery attempt: `Idle → Sending → {Delivered | Failed}`.
    async fn deliver(&self, ev: &Event) -> DeliveryState {
        let body = build_payload(&self.template, &ev.kind);
        let label = ev.kind.label();
        tracing::debug!(seq = ev.seq, event_type = label, "sending notification");

        match self.client.post(&self.url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(seq = ev.seq, event_type = label, status = %resp.status(), "notification delivered");
                DeliveryState::Delivered
            }
            Ok(resp) => {
                let err = AgentError::Delivery {
                    reason: format!("status {}", resp.status()),
                };
                tracing::warn!(seq = ev.seq, event_type = label, kind = err.as_label(), error = %err, "notification failed");
                DeliveryState::Failed
            }
            Err(e) => {
                let err = AgentError::Delivery {
                    reason: e.to_string(),
                };
                tracing::warn!(seq = ev.seq, event_type = label, kind = err.as_label(), error = %err, "notification failed");
                DeliveryState::Failed
            }
        }
    }

    /// Fires the error-feedback line once, without blocking. If the line is
    /// full the cue is dropped with a warning; the audio agent already has
    /// alerts pending.
    fn signal_failure(&self) {
        if let Err(e) = self.alerts.try_send(()) {
            tracing::warn!(error = %e, "alert line unavailable, feedback dropped");
        }
    }
}

#[async_trait]
impl Agent for NotifierAgent {
    fn name(&self) -> &str {
        "notifier"
    }

    async fn run(mut self: Box<Self>, ctx: CancellationToken) -> Result<(), AgentError> {
        loop {
            let ev = select! {
                res = self.rx.recv() => res,
                _ = ctx.cancelled() => return Ok(()),
            };

            match ev {
                Ok(ev) if self.reportable.contains(ev.kind.label()) => {
                    let outcome = select! {
                        state = self.deliver(&ev) => state,
                        _ = ctx.cancelled() => return Ok(()),
                    };
                    if outcome == DeliveryState::Failed {
                        self.signal_failure();
                    }
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
