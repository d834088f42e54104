//! Logging infrastructure for view composition
//!
//! This module provides structured logging using the `tracing` crate.
//! It supports configurable log levels and formats.
//!
//! # Usage
//!
//! ```rust,no_run
//! use archview::core::logging::init_logging;
//!
//! // Initialize with default settings
//! init_logging(None, None).unwrap();
//!
//! // Or with custom level and format
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! ```
//!
//! # What gets logged
//!
//! - `trace`: every element/relationship inserted into or removed from a view
//! - `debug`: candidates skipped by best-effort expansion (nearest neighbours,
//!   default population, deployment inclusion)
//! - `info`: spans around default-view generation, hydrate and layout copy
//! - `warn`: layout merge finding no counterpart for an element or relationship
//!
//! # Environment Variables
//!
//! - `ARCHVIEW_LOG_LEVEL`: Set log level (trace|debug|info|warn|error)
//! - `ARCHVIEW_LOG_FORMAT`: Set log format (compact|pretty|json)
//! - `RUST_LOG`: Alternative way to set log level (tracing-subscriber standard)
//!
//! # Filtering Logs
//!
//! ```bash
//! # Show only layout merge decisions
//! RUST_LOG="archview::views::layout_merge=debug" archview merge --previous old.json --input new.json
//! ```

use std::fmt as stdfmt;
use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// How log lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event, no source locations
    Compact,
    /// Multi-line, coloured, with span enter/exit
    Pretty,
    /// Newline-delimited JSON
    Json,
}

impl LogFormat {
    const ALL: [LogFormat; 3] = [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json];

    pub fn name(self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }

    /// Names accepted by `from_str`
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

impl stdfmt::Display for LogFormat {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown log format: {} (expected one of {})",
                    s,
                    Self::variants().join(", ")
                )
            })
    }
}

fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var("ARCHVIEW_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    match format
        .map(str::to_string)
        .or_else(|| std::env::var("ARCHVIEW_LOG_FORMAT").ok())
    {
        Some(name) => name
            .parse()
            .map_err(|e| format!("Invalid log format: {}", e)),
        None => Ok(LogFormat::Compact),
    }
}

/// Directives that fail to parse fall back to `RUST_LOG`, then `info`
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Compact => Box::new(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        ),
        LogFormat::Pretty => Box::new(
            fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE),
        ),
        LogFormat::Json => Box::new(
            fmt::layer()
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE),
        ),
    }
}

/// Install the global tracing subscriber
///
/// `level` is an `EnvFilter` directive such as `debug` or
/// `archview::views=trace`; when `None` it comes from `ARCHVIEW_LOG_LEVEL`,
/// then `RUST_LOG`, then `info`. `format` comes from `ARCHVIEW_LOG_FORMAT`
/// when `None` and defaults to compact.
///
/// Fails on an unknown format, or when a global subscriber is already set.
///
/// ```rust,no_run
/// use archview::core::logging::init_logging;
///
/// init_logging(Some("debug"), Some("pretty")).unwrap();
/// ```
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = resolve_format(format)?;
    let filter = filter_for(&resolve_level(level));

    Registry::default()
        .with(fmt_layer(format))
        .with(filter)
        .try_init()?;
    Ok(())
}

/// `init_logging(None, None)`
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip() {
        for name in LogFormat::variants() {
            let format: LogFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), *name);
        }
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn test_unknown_format_lists_choices() {
        let error = "xml".parse::<LogFormat>().unwrap_err();
        assert!(error.contains("xml"));
        assert!(error.contains("compact, pretty, json"));
    }

    #[test]
    fn test_explicit_format_wins() {
        assert_eq!(resolve_format(Some("pretty")).unwrap(), LogFormat::Pretty);
        assert!(resolve_format(Some("yaml")).is_err());
    }

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(resolve_level(Some("archview=trace")), "archview=trace");
    }

    #[test]
    fn test_invalid_format_rejected_before_install() {
        let result = init_logging(Some("debug"), Some("xml"));
        assert!(result.unwrap_err().to_string().contains("xml"));
    }
}
