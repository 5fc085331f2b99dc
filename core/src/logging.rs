use crate::config;
use flexi_logger::FlexiLoggerError;
use log::LevelFilter;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

mod loglog;

pub use loglog::LogLogger;

#[derive(Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
pub enum FormatType {
    /// Timestamp, thread, level, source location and message.
    PLAIN,
    /// `PLAIN` without the thread.
    DETAILED,
}

#[derive(Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SinkType {
    CONSOLE,
    FILE,
    SYSLOG,
}

#[derive(Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec())
    }
}

impl LogLevel {
    /// Level string in the form `flexi_logger` specs expect.
    fn spec(&self) -> &'static str {
        match self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::TRACE => LevelFilter::Trace,
            LogLevel::DEBUG => LevelFilter::Debug,
            LogLevel::INFO => LevelFilter::Info,
            LogLevel::WARN => LevelFilter::Warn,
            LogLevel::ERROR => LevelFilter::Error,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct LoggerConfig {
    #[serde(default = "default_format")]
    pub format: FormatType,
    #[serde(default = "default_level")]
    pub level: LogLevel,
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

fn default_format() -> FormatType {
    FormatType::PLAIN
}

fn default_level() -> LogLevel {
    LogLevel::INFO
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![SinkConfig::console()]
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            level: default_level(),
            sinks: default_sinks(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SinkConfig {
    pub sink_type: SinkType,
    pub file_directory: Option<String>,
    pub file_max_size_bytes: Option<u64>,
    pub file_max_log_history: Option<u32>,
}

impl SinkConfig {
    pub fn console() -> Self {
        Self {
            sink_type: SinkType::CONSOLE,
            file_directory: None,
            file_max_size_bytes: None,
            file_max_log_history: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum LogError {
    #[error("failed to read logging config: {0}")]
    ConfigReadError(#[from] config::ConfigError),
    #[error("syslog error: {0}")]
    SyslogError(#[from] #[source] syslog::Error),
    #[error(transparent)]
    FlexiLoggerError(#[from] FlexiLoggerError),
    #[error("logger already installed: {0}")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Builds the process logger from the `[logging]` section of the main config
/// and installs it. Without that section a console INFO logger is used.
pub fn init_main_logger() -> Result<(), LogError> {
    let main_config = config::main_config();
    let config = config::read_struct::<LoggerConfig>(main_config, &config::path(&["logging"]))?
        .unwrap_or_default();
    let level = LevelFilter::from(config.level);
    let logger = LogLogger::new(config)?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
