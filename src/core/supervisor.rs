//! # Supervisor: agent lifecycle and graceful shutdown.
//!
//! The [`Supervisor`] owns the event bus and the process-wide cancellation
//! token. It spawns one concurrent task per agent, waits for an OS shutdown
//! signal, then cancels all agents cooperatively and enforces a bounded
//! grace period.
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   Vec<Box<dyn Agent>>  ──►  Supervisor::run(agents)
//!
//! Spawn:
//!   agent[0]  agent[1]  ...  agent[N-1]
//!      │         │               │
//!      └──► set.spawn(run_agent(agent, token.child_token()))
//!
//! Event flow (wired by the caller at construction):
//!   sensor agents ── publish(Event) ──► Bus ──► {servo, notifier} receivers
//!   notifier ── alert line (mpsc) ──► audio agent
//!
//! Shutdown path:
//!   shutdown::wait_for_shutdown_signal()  (or trigger_shutdown())
//!             └─► token.cancel()  → propagates to child tokens
//!             └─► wait_all_with_grace(grace):
//!                    ├─ all joined in time → Ok, exit code 0
//!                    └─ timeout            → RuntimeError::GraceExceeded
//!                                            (AliveSet snapshot names stuck agents)
//! ```
//!
//! ## Rules
//! - No agent restart: an agent that exits (error or otherwise) stays down;
//!   the exit is logged with its error kind.
//! - No error propagation between agents: an error inside one agent can
//!   never terminate another agent or the bus.
//! - Hardware handles are owned by agents and released by drop when each
//!   agent task completes, so release happens exactly once per handle.

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::agents::Agent;
use crate::core::{alive::AliveSet, shutdown};
use crate::error::RuntimeError;
use crate::events::Bus;
use std::time::Duration;

/// Coordinates agent tasks, the shared bus, and graceful shutdown.
pub struct Supervisor {
    bus: Bus,
    grace: Duration,
    token: CancellationToken,
    alive: AliveSet,
}

impl Supervisor {
    /// Creates a supervisor with a fresh bus of the given capacity.
    pub fn new(bus_capacity: usize, grace: Duration) -> Self {
        Self {
            bus: Bus::new(bus_capacity),
            grace,
            token: CancellationToken::new(),
            alive: AliveSet::new(),
        }
    }

    /// The shared bus. Clone it into each sensor agent and lend it to each
    /// consumer at construction time; agents never reach for ambient state.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Requests shutdown without an OS signal. Used by embedding code and
    /// tests; `run` returns once all agents unwind (or grace expires).
    pub fn trigger_shutdown(&self) {
        self.token.cancel();
    }

    /// Runs the provided agents until either:
    /// - every agent exits on its own, or
    /// - a termination signal (or [`trigger_shutdown`](Self::trigger_shutdown))
    ///   arrives → cooperative cancellation, bounded by the grace period.
    pub async fn run(&self, agents: Vec<Box<dyn Agent>>) -> Result<(), RuntimeError> {
        let mut set = JoinSet::new();
        self.spawn_agents(&mut set, agents);
        self.drive_shutdown(&mut set).await
    }

    /// Spawns one task per agent, each with its own child token.
    fn spawn_agents(&self, set: &mut JoinSet<()>, agents: Vec<Box<dyn Agent>>) {
        for agent in agents {
            let child = self.token.child_token();
            let alive = self.alive.clone();
            set.spawn(async move {
                let name = agent.name().to_string();
                alive.insert(&name);
                tracing::info!(agent = %name, "agent started");
                match agent.run(child).await {
                    Ok(()) => tracing::info!(agent = %name, "agent stopped"),
                    Err(e) => {
                        tracing::error!(agent = %name, kind = e.as_label(), error = %e, "agent terminated")
                    }
                }
                // The agent and its hardware handles are dropped here.
                alive.remove(&name);
            });
        }
    }

    /// Waits until all agents finish or a shutdown request is received.
    async fn drive_shutdown(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => {
                tracing::info!("shutdown signal received");
                self.token.cancel();
                self.wait_all_with_grace(set).await
            }
            _ = self.token.cancelled() => {
                self.wait_all_with_grace(set).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                Ok(())
            }
        }
    }

    /// Waits for all agent tasks to finish within the grace period.
    async fn wait_all_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        let done = async { while set.join_next().await.is_some() {} };
        match tokio::time::timeout(self.grace, done).await {
            Ok(_) => {
                tracing::info!("all agents stopped within grace");
                Ok(())
            }
            Err(_) => {
                let stuck = self.alive.snapshot();
                tracing::error!(?stuck, grace = ?self.grace, "grace period exceeded");
                Err(RuntimeError::GraceExceeded {
                    grace: self.grace,
                    stuck,
                })
            }
        }
    }
}
