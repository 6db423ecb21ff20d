use crate::config::Config;
use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Deployment check server started");
    println!("Listening on: http://{addr}");
    println!("Route: GET http://{addr}/api/get");
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!(
        "Access log: {}",
        if config.logging.access_log { "on" } else { "off" }
    );
    println!("======================================\n");
}

/// One line per request in Common Log Format, so the output sits next to
/// the reverse proxy's own access log without translation.
pub fn log_access(
    remote_addr: &SocketAddr,
    method: &Method,
    uri: &Uri,
    version: Version,
    status: u16,
    body_bytes: u64,
) {
    let query = uri
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();
    println!(
        "{} - - [{}] \"{} {}{} {:?}\" {} {}",
        remote_addr.ip(),
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        uri.path(),
        query,
        version,
        status,
        body_bytes,
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_shutdown(active_connections: usize) {
    println!("\n[Shutdown] Stopped accepting connections ({active_connections} still active)");
}
