use std::net::SocketAddr;

/// Server configuration, read once at startup.
///
/// Defaults suit local development against a Vite dev server; deployments
/// override through the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address, `HOST` (default `0.0.0.0`).
    pub host: String,
    /// Bind port, `PORT` (default `3000`).
    pub port: u16,
    /// Allowed CORS origins, `CORS_ORIGINS` as a comma-separated list
    /// (default `http://localhost:5173`).
    pub cors_origins: Vec<String>,
    /// Request timeout in seconds, `REQUEST_TIMEOUT_SECS` (default `30`).
    pub request_timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Load configuration from environment variables, panicking on values
    /// that do not parse. Misconfiguration should fail at startup, not at
    /// the first request.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        }
    }

    /// The socket address to bind, from `host` and `port`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.parse().expect("HOST must be an IP address"), self.port)
    }
}
