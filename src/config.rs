//! Configuration constants and CLI option types.

use std::time::Duration;

use clap::ValueEnum;

/// How long a cached registration date stays valid: 30 days. Registration
/// dates never change, but a bounded TTL keeps stale entries from surviving
/// domain drops and re-registrations forever.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Interval between blink frames for an alerting tab indicator.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Base URL of the RDAP aggregation service.
pub const RDAP_BASE_URL: &str = "https://rdap.org/domain";

/// Registry lookup timeout in seconds.
pub const REGISTRY_TIMEOUT_SECS: u64 = 10;

/// Maximum age in days for the RED tier (one year).
pub const RED_MAX_AGE_DAYS: f64 = 365.0;

/// Maximum age in days for the YELLOW tier (three years).
pub const YELLOW_MAX_AGE_DAYS: f64 = 3.0 * 365.0;

/// Default directory for the persistent age cache.
pub const DEFAULT_CACHE_DIR: &str = ".domain_alert_cache";

/// Default path for the persistent whitelist.
pub const DEFAULT_WHITELIST_PATH: &str = ".domain_alert_whitelist.json";

/// Queue depth of the coordinator's inbound message channel.
pub const COORDINATOR_QUEUE_DEPTH: usize = 64;

/// Queue depth of each page context's inbound event channel.
pub const PAGE_QUEUE_DEPTH: usize = 8;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace).
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
