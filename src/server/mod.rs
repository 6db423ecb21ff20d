// Server module entry: listener creation, accept loop, shutdown signals.

pub mod listener;
pub mod signal;

pub use listener::create_reusable_listener;

use crate::config::Config;
use crate::handler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

/// Upper bound on waiting for in-flight connections at shutdown. Each
/// connection is already bounded by the configured read/write timeout;
/// this only guards against a counter that never reaches zero.
const SHUTDOWN_DRAIN_LIMIT: Duration = Duration::from_secs(30);

/// Accept connections until the shutdown signal fires, then drain.
///
/// Each accepted connection is served on its own task. After the signal,
/// no new connections are accepted and `run` waits for the active ones to
/// finish (bounded by [`SHUTDOWN_DRAIN_LIMIT`]) before returning, so the
/// runtime is not torn down under an in-flight response.
pub async fn run(
    listener: TcpListener,
    config: Arc<Config>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &config, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                break;
            }
        }
    }

    drain_connections(&active_connections).await;
    Ok(())
}

/// Wait for the active connection count to reach zero. Connection tasks
/// decrement the counter as their serve future completes or times out.
async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + SHUTDOWN_DRAIN_LIMIT;

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain limit reached with {} connections still active",
                active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Count the connection against the configured limit, then hand it to a
/// serving task. Increment-then-check keeps the limit race-free.
fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: &Arc<Config>,
    active_connections: &Arc<AtomicUsize>,
) {
    let prev_count = active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(config),
        Arc::clone(active_connections),
    );
}

/// Serve one HTTP/1.1 connection, bounded by the configured read/write
/// timeout, and decrement the active counter when it closes.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<Config>,
    active_connections: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let timeout_duration = Duration::from_secs(std::cmp::max(
            config.performance.read_timeout,
            config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        if config.performance.keep_alive_timeout > 0 {
            builder.keep_alive(true);
        }

        let service_config = Arc::clone(&config);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let config = Arc::clone(&service_config);
                async move { handler::handle_request(req, peer_addr, config).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
