// Shutdown signal handling.
//
// The process has one lifecycle transition of its own (not listening ->
// listening); everything after that belongs to the external supervisor,
// which stops it with SIGTERM or SIGINT.

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn a background task that fires `shutdown` on SIGTERM or SIGINT.
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                crate::logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                return;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                crate::logger::log_error(&format!("Failed to register SIGINT handler: {e}"));
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => println!("\n[Signal] SIGTERM received, shutting down"),
            _ = sigint.recv() => println!("\n[Signal] SIGINT received, shutting down"),
        }

        shutdown.notify_waiters();
    });
}

/// Off Unix only Ctrl+C is available.
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n[Signal] Ctrl+C received, shutting down");
            shutdown.notify_waiters();
        }
    });
}
