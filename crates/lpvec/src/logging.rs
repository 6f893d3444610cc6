//! Structured logging setup.
//!
//! Library code only emits `tracing` events. Applications that want to see
//! them call [`init_logging`] once, or install their own subscriber.

use lpvec_highs::highs_version;
use std::env;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Environment variable holding the default filter directive.
pub const TRACE_ENV: &str = "LPVEC_TRACE";
/// Environment variable selecting `pretty` or `json` output.
pub const FORMAT_ENV: &str = "LPVEC_LOG_FORMAT";
/// Environment variable naming an optional log file.
pub const FILE_ENV: &str = "LPVEC_LOG_FILE";

#[derive(Debug)]
pub enum LoggingError {
    InvalidFilter(String),
    InvalidFormat(String),
    LogFile(io::Error),
    Init(String),
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter(_) => "LOGGING_INVALID_FILTER",
            LoggingError::InvalidFormat(_) => "LOGGING_INVALID_FORMAT",
            LoggingError::LogFile(_) => "LOGGING_FILE",
            LoggingError::Init(_) => "LOGGING_INIT",
        }
    }
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code())?;
        match self {
            LoggingError::InvalidFilter(detail) => write!(f, "invalid log filter: {detail}"),
            LoggingError::InvalidFormat(format) => {
                write!(f, "{FORMAT_ENV}={format:?} is neither 'json' nor 'pretty'")
            }
            LoggingError::LogFile(err) => write!(f, "cannot open log file: {err}"),
            LoggingError::Init(detail) => write!(f, "subscriber not installed: {detail}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::LogFile(err) => Some(err),
            _ => None,
        }
    }
}

/// Output format of every sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(LoggingError::InvalidFormat(value.to_string()))
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn sink<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LoggingError::LogFile)
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// The filter is `level`, else `LPVEC_TRACE`, else `off`. `LPVEC_LOG_FORMAT`
/// picks `pretty` (default) or `json`. `LPVEC_LOG_FILE` adds an uncoloured
/// sink appending to that file. Returns `Ok(false)` when a subscriber is
/// already installed.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let directive = match level {
        Some(level) => level.to_string(),
        None => env::var(TRACE_ENV).unwrap_or_else(|_| "off".to_string()),
    };
    let filter = build_filter(&directive)?;
    let format = match env::var(FORMAT_ENV) {
        Ok(value) => value.parse()?,
        Err(_) => LogFormat::default(),
    };

    let mut sinks = vec![sink(io::stderr, format, true)];
    if let Ok(path) = env::var(FILE_ENV) {
        sinks.push(sink(open_log_file(&path)?, format, false));
    }

    tracing_subscriber::registry()
        .with(sinks)
        .with(filter)
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;

    tracing::debug!(
        component = "logging",
        operation = "init",
        status = "success",
        filter = %directive,
        format = ?format,
        solver_version = highs_version().as_deref().unwrap_or("unknown"),
        "Logging initialized"
    );
    Ok(true)
}
