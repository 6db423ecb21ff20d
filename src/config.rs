use config::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;

/// Startup configuration, populated once before the runtime is built.
///
/// Values are layered from an optional `config.toml` in the working
/// directory, then overridden by the `HOST` and `PORT` environment
/// variables. The listening port has no default: a process that cannot
/// name its port must not come up at all.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub default_content_type: String,
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.default_content_type", "text/html; charset=utf-8")?
            .set_default("http.server_name", "api-demo-server/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)?;

        // Uppercase is the documented convention for operators; nothing
        // reads the lowercase variants.
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        let settings = builder.build()?;

        // Fail here with a message naming both sources rather than letting
        // deserialization report a bare "missing field `port`".
        if let Err(e) = settings.get::<u16>("server.port") {
            return Err(ConfigError::Message(format!(
                "listening port is missing or invalid ({e}); set the PORT \
                 environment variable or server.port in config.toml"
            )));
        }

        settings.try_deserialize()
    }

    /// Reject values that would bind an address the reverse proxy cannot
    /// be pointed at.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message(
                "listening port 0 would pick an ephemeral port; set PORT or \
                 server.port to the fixed port the reverse proxy forwards to"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("invalid listen address: {e}"))
    }
}
