//! Single-route HTTP responder used to smoke-check a deployment.
//!
//! The binary answers `GET /api/get` with a fixed HTML body so an operator
//! can confirm that the process supervisor and reverse proxy in front of it
//! are wired up. Everything else is the plumbing around that one route:
//! typed startup configuration, a reusable TCP listener, and an HTTP/1.1
//! connection loop with graceful shutdown.

pub mod config;
pub mod handler;
pub mod logger;
pub mod response;
pub mod server;
