//! Platform configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// How services see course state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogMode {
    /// One catalog shared by every service.
    #[default]
    Shared,
    /// Each service owns a separately seeded copy; edits do not propagate.
    Isolated,
}

impl FromStr for CatalogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "isolated" => Ok(Self::Isolated),
            other => Err(format!("invalid CATALOG_MODE `{other}` (expected shared|isolated)")),
        }
    }
}

impl fmt::Display for CatalogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => f.write_str("shared"),
            Self::Isolated => f.write_str("isolated"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid LOG_FORMAT `{other}` (expected text|json)")),
        }
    }
}

/// Top-level platform configuration.
///
/// Loaded once at startup via [`EnrollConfig::from_env`].
#[derive(Debug, Clone)]
pub struct EnrollConfig {
    /// Bind address of the student service.
    pub student_listen_addr: SocketAddr,

    /// Bind address of the faculty service.
    pub faculty_listen_addr: SocketAddr,

    /// Bind address of the admin service.
    pub admin_listen_addr: SocketAddr,

    /// How long the event dispatcher waits on an empty queue before
    /// re-checking its stop signal.
    pub event_bus_poll_interval: Duration,

    /// Shared or per-service course state.
    pub catalog_mode: CatalogMode,

    /// Load demo courses, students, and rosters at startup.
    pub seed_demo_data: bool,

    /// Number of recent notifications kept in memory.
    pub notification_outbox_capacity: usize,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for EnrollConfig {
    fn default() -> Self {
        Self {
            student_listen_addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            faculty_listen_addr: SocketAddr::from(([0, 0, 0, 0], 5002)),
            admin_listen_addr: SocketAddr::from(([0, 0, 0, 0], 5003)),
            event_bus_poll_interval: Duration::from_millis(1000),
            catalog_mode: CatalogMode::Shared,
            seed_demo_data: true,
            notification_outbox_capacity: 1000,
            request_timeout: Duration::from_secs(10),
            log_format: LogFormat::Text,
        }
    }
}

impl EnrollConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if a listen address, `CATALOG_MODE`, or `LOG_FORMAT`
    /// is set but cannot be parsed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let student_listen_addr = parse_addr("STUDENT_LISTEN_ADDR", defaults.student_listen_addr)?;
        let faculty_listen_addr = parse_addr("FACULTY_LISTEN_ADDR", defaults.faculty_listen_addr)?;
        let admin_listen_addr = parse_addr("ADMIN_LISTEN_ADDR", defaults.admin_listen_addr)?;

        let catalog_mode = match std::env::var("CATALOG_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.catalog_mode,
        };
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.log_format,
        };

        let poll_ms = parse_env("EVENT_BUS_POLL_INTERVAL_MS", 1000_u64).max(1);
        let timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 10_u64).max(1);

        Ok(Self {
            student_listen_addr,
            faculty_listen_addr,
            admin_listen_addr,
            event_bus_poll_interval: Duration::from_millis(poll_ms),
            catalog_mode,
            seed_demo_data: parse_env_bool("SEED_DEMO_DATA", defaults.seed_demo_data),
            notification_outbox_capacity: parse_env(
                "NOTIFICATION_OUTBOX_CAPACITY",
                defaults.notification_outbox_capacity,
            ),
            request_timeout: Duration::from_secs(timeout_secs),
            log_format,
        })
    }
}

fn parse_addr(key: &str, default: SocketAddr) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| format!("invalid {key} `{raw}`: {e}").into()),
        Err(_) => Ok(default),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_mode_parses_case_insensitively() {
        assert_eq!("Shared".parse::<CatalogMode>(), Ok(CatalogMode::Shared));
        assert_eq!(" isolated ".parse::<CatalogMode>(), Ok(CatalogMode::Isolated));
        assert!("split".parse::<CatalogMode>().is_err());
    }

    #[test]
    fn log_format_parses() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn defaults_match_service_ports() {
        let cfg = EnrollConfig::default();
        assert_eq!(cfg.student_listen_addr.port(), 5001);
        assert_eq!(cfg.faculty_listen_addr.port(), 5002);
        assert_eq!(cfg.admin_listen_addr.port(), 5003);
        assert_eq!(cfg.catalog_mode, CatalogMode::Shared);
        assert!(cfg.seed_demo_data);
    }
}
