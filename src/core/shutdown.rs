//! # Shutdown signal handling.
//!
//! [`wait_for_shutdown_signal`] resolves when the operator asks the rig to
//! stop. The supervisor races it against its agent set: once it fires, every
//! agent's cancellation token is cancelled and the grace countdown starts.
//!
//! On Unix the rig listens for `SIGINT`, `SIGTERM`, and `SIGQUIT`, covering
//! a terminal Ctrl-C, a service-manager stop, and a hard quit alike. On
//! other platforms only Ctrl-C is available via [`tokio::signal::ctrl_c`].

/// Resolves on the first termination signal.
///
/// Listeners are registered per call, so the supervisor may be restarted
/// within one process without stale registrations. Returns `Err` only if
/// the OS refuses to register a listener.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Resolves on the first termination signal (Ctrl-C outside Unix).
///
/// Returns `Err` only if the OS refuses to register a listener.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
