//! Error types used by the petvisor runtime and agents.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`] — errors raised by the coordination runtime itself
//!   (startup configuration, shutdown grace).
//! - [`AgentError`] — errors raised inside individual agent loops
//!   (sampling, actuation, notification delivery).
//!
//! Both types provide `as_label()` helpers for logging, so log lines carry a
//! short stable kind alongside the human-readable message.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the coordination runtime.
///
/// These represent failures of the rig as a whole, not of a single agent:
/// a configuration document that cannot be loaded (startup-fatal), or a
/// shutdown sequence that exceeded its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be read or parsed. Always fatal at startup;
    /// no agent is started when this is returned.
    #[error("configuration error: {reason}")]
    Config {
        /// What went wrong (I/O or parse detail).
        reason: String,
    },

    /// Shutdown grace period was exceeded; some agents remained stuck.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of agents that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Config { .. } => "runtime_config",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// # Errors produced inside agent loops.
///
/// The variants map to the three operation kinds an agent performs. None of
/// them is fatal to the process: the runtime's policy is log-and-continue for
/// [`Sample`](AgentError::Sample) and [`Actuate`](AgentError::Actuate)
/// (handled inside the agent loop itself), and a delivery failure triggers
/// local error feedback without retry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AgentError {
    /// A sensor sample could not be read (capture device error, bad read).
    #[error("sample read failed: {reason}")]
    Sample {
        /// The underlying read error.
        reason: String,
    },

    /// An actuator output could not be driven (PWM write, audio play).
    #[error("actuation failed: {reason}")]
    Actuate {
        /// The underlying output error.
        reason: String,
    },

    /// A notification could not be delivered (timeout, transport, non-2xx).
    #[error("delivery failed: {reason}")]
    Delivery {
        /// The delivery failure detail, including status codes if any.
        reason: String,
    },
}

impl AgentError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use petvisor::AgentError;
    ///
    /// let err = AgentError::Sample { reason: "stream closed".into() };
    /// assert_eq!(err.as_label(), "agent_sample");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AgentError::Sample { .. } => "agent_sample",
            AgentError::Actuate { .. } => "agent_actuate",
            AgentError::Delivery { .. } => "agent_delivery",
        }
    }

    /// Wraps a hardware error as a sampling failure.
    pub fn sample(err: impl std::fmt::Display) -> Self {
        AgentError::Sample {
            reason: err.to_string(),
        }
    }

    /// Wraps a hardware error as an actuation failure.
    pub fn actuate(err: impl std::fmt::Display) -> Self {
        AgentError::Actuate {
            reason: err.to_string(),
        }
    }
}
