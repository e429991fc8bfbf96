//! Runtime core: orchestration and lifecycle.
//!
//! The only public API from this module is [`Supervisor`], which owns the
//! bus, spawns agent tasks, and drives graceful shutdown.
//!
//! Internal modules:
//! - [`supervisor`]: spawns agents, handles shutdown, enforces grace;
//! - [`alive`]: tracks running agents for the stuck-agent report;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod alive;
mod shutdown;
mod supervisor;

pub use supervisor::Supervisor;
