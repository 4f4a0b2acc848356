//! Configuration management for the MyRamen server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to their default.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// `PostgreSQL` configuration
    pub postgres: PostgresConfig,
    /// Admin endpoint configuration
    pub admin: AdminConfig,
    /// Prometheus exporter configuration
    pub metrics: MetricsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: 0.0.0.0)
    pub host: String,
    /// Bind port (default: 8080)
    pub port: u16,
    /// Seconds allowed for in-flight requests to drain on shutdown (default: 30)
    pub shutdown_timeout: u64,
}

/// `PostgreSQL` configuration
#[derive(Clone)]
pub struct PostgresConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool (default: 10)
    pub max_connections: u32,
    /// Connection acquire timeout in seconds (default: 30)
    pub connect_timeout: u64,
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Admin endpoint configuration
#[derive(Clone)]
pub struct AdminConfig {
    /// Shared secret expected in `X-Admin-Password`
    pub password: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Prometheus exporter configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Exporter bind host (default: 0.0.0.0)
    pub host: String,
    /// Exporter bind port (default: 9090)
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let url = lookup("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                string_or("DB_USER", "postgres"),
                string_or("DB_PASSWORD", "password"),
                string_or("DB_HOST", "localhost"),
                parse_or(&lookup, "DB_PORT", 5432_u16),
                string_or("DB_DATABASE", "myramen"),
            )
        });

        Self {
            server: ServerConfig {
                host: string_or("APP_HOST", "0.0.0.0"),
                port: parse_or(&lookup, "APP_PORT", 8080),
                shutdown_timeout: parse_or(&lookup, "SHUTDOWN_TIMEOUT", 30),
            },
            postgres: PostgresConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
                connect_timeout: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT", 30),
            },
            admin: AdminConfig {
                password: string_or("ADMIN_PASSWORD", "admin1234"),
            },
            metrics: MetricsConfig {
                host: string_or("METRICS_HOST", "0.0.0.0"),
                port: parse_or(&lookup, "METRICS_PORT", 9090),
            },
        }
    }

    /// Address the HTTP server binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if `host:port` is not a socket address.
    pub fn server_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Address the Prometheus exporter binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if `host:port` is not a socket address.
    pub fn metrics_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.metrics.host, self.metrics.port).parse()
    }

    /// Pool acquire timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.postgres.connect_timeout)
    }

    /// Connection URL with the password masked, for logging.
    #[must_use]
    pub fn redacted_database_url(&self) -> String {
        redact_url(&self.postgres.url)
    }
}

fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}{user}:***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
