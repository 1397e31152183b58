//! Logging infrastructure
//!
//! Centralized tracing setup for the framework, with support for different
//! log levels, formats, and output targets, plus a redaction helper so
//! sensitive property values never reach log output verbatim.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// One-time initialization flag for logging
static INIT: Once = Once::new();

/// Logging configuration structure
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub target: LogTarget,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            target: LogTarget::Stderr,
        }
    }
}

/// Log levels supported by the logging system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert log level to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Filter directive understood by the tracing env filter
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse log level from string
    pub fn from_str(s: &str) -> Option<LogLevel> {
        match s.to_uppercase().as_str() {
            "ERROR" => Some(LogLevel::Error),
            "WARN" | "WARNING" => Some(LogLevel::Warn),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            "TRACE" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Full format with targets and timestamps
    Full,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    /// Parse log format from string
    pub fn from_str(s: &str) -> Option<LogFormat> {
        match s.to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Log output targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Log to stderr
    Stderr,
    /// Log to stdout
    Stdout,
}

/// Initialize logging with the given configuration
///
/// This should be called once at application startup. Subsequent calls are
/// ignored, as is initialization when another subscriber is already
/// installed. A `RUST_LOG` environment filter overrides the configured
/// level.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

        let result = match (config.format, config.target) {
            (LogFormat::Compact, LogTarget::Stderr) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .with_writer(std::io::stderr)
                .try_init(),
            (LogFormat::Compact, LogTarget::Stdout) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .with_writer(std::io::stdout)
                .try_init(),
            (LogFormat::Full, LogTarget::Stderr) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init(),
            (LogFormat::Full, LogTarget::Stdout) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stdout)
                .try_init(),
            (LogFormat::Json, LogTarget::Stderr) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(std::io::stderr)
                .try_init(),
            (LogFormat::Json, LogTarget::Stdout) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(std::io::stdout)
                .try_init(),
        };

        // A failed init means another subscriber is already installed
        let _ = result;
    });
}

/// Initialize logging with default configuration
pub fn init_default_logging() {
    init_logging(LoggingConfig::default());
}

/// Check if logging has been initialized
pub fn is_logging_initialized() -> bool {
    INIT.is_completed()
}

/// Redact sensitive `name=value` pairs from a log message
pub fn redact_sensitive(message: &str) -> String {
    let sensitive_patterns = [
        (r"password[=:\s]+[^\s]+", "password=***"),
        (r"token[=:\s]+[^\s]+", "token=***"),
        (r"key[=:\s]+[^\s]+", "key=***"),
        (r"secret[=:\s]+[^\s]+", "secret=***"),
    ];

    let mut redacted = message.to_string();
    for (pattern, replacement) in &sensitive_patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            redacted = re.replace_all(&redacted, *replacement).to_string();
        }
    }

    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_log_level_string_conversion() {
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
        assert_eq!(LogLevel::Debug.as_filter(), "debug");

        assert_eq!(LogLevel::from_str("ERROR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("invalid"), None);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::from_str("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_str("xml"), None);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.target, LogTarget::Stderr);
    }

    #[test]
    fn test_redaction() {
        let message = "set password=secret123 and token=abc123def";
        let redacted = redact_sensitive(message);

        assert!(!redacted.contains("secret123"));
        assert!(!redacted.contains("abc123def"));
        assert!(redacted.contains("password=***"));
        assert!(redacted.contains("token=***"));
    }

    #[test]
    fn test_redaction_leaves_plain_messages() {
        assert_eq!(redact_sensitive("normal message"), "normal message");
    }
}
