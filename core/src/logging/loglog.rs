use super::{FormatType, LogError, LoggerConfig, SinkConfig, SinkType};
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, FormatFunction, LoggerHandle, Naming};
use log::{LevelFilter, Metadata, Record};
use syslog::Facility;

const PROCESS_NAME: &str = "signup";

/// Fans each record out to every configured sink.
pub struct LogLogger {
    level: LevelFilter,
    sinks: Vec<Box<dyn log::Log>>,
    // Dropping a handle shuts its flexi_logger writer down.
    _flexi_handles: Vec<LoggerHandle>,
}

impl log::Log for LogLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.sinks.iter().for_each(|sink| {
            sink.log(record);
        });
    }

    fn flush(&self) {
        self.sinks.iter().for_each(|sink| {
            sink.flush();
        });
    }
}

impl LogLogger {
    pub fn new(config: LoggerConfig) -> Result<Self, LogError> {
        let spec = config.level.spec();
        let mut sinks: Vec<Box<dyn log::Log>> = vec![];
        let mut handles = vec![];
        for sink_cfg in &config.sinks {
            match sink_cfg.sink_type {
                SinkType::CONSOLE => {
                    let (sink, handle) = flexi_logger::Logger::try_with_str(spec)?
                        .log_to_stdout()
                        .format(formatter(config.format, true))
                        .build()?;
                    sinks.push(sink);
                    handles.push(handle);
                }
                SinkType::FILE => {
                    let (sink, handle) = file_logger(spec, config.format, sink_cfg)?;
                    sinks.push(sink);
                    handles.push(handle);
                }
                SinkType::SYSLOG => {
                    let logger = syslog::unix(syslog::Formatter3164 {
                        facility: Facility::LOG_USER,
                        hostname: None,
                        process: PROCESS_NAME.to_string(),
                        pid: std::process::id(),
                    })?;
                    sinks.push(Box::new(syslog::BasicLogger::new(logger)));
                }
            };
        }

        Ok(LogLogger {
            level: config.level.into(),
            sinks,
            _flexi_handles: handles,
        })
    }
}

fn formatter(format: FormatType, colored: bool) -> FormatFunction {
    match (format, colored) {
        (FormatType::PLAIN, true) => flexi_logger::colored_with_thread,
        (FormatType::PLAIN, false) => flexi_logger::with_thread,
        (FormatType::DETAILED, true) => flexi_logger::colored_detailed_format,
        (FormatType::DETAILED, false) => flexi_logger::detailed_format,
    }
}

fn file_logger(
    spec: &str,
    format: FormatType,
    sink_cfg: &SinkConfig,
) -> Result<(Box<dyn log::Log>, LoggerHandle), LogError> {
    let directory = sink_cfg
        .file_directory
        .clone()
        .unwrap_or_else(|| "logs/".to_string());
    Ok(flexi_logger::Logger::try_with_str(spec)?
        .log_to_file(FileSpec::default().basename(PROCESS_NAME).directory(directory))
        .format(formatter(format, false))
        .rotate(
            Criterion::AgeOrSize(
                Age::Day,
                sink_cfg.file_max_size_bytes.unwrap_or(5 * 1024 * 1024),
            ),
            Naming::TimestampsCustomFormat {
                current_infix: Some("LATEST"),
                format: "%Y-%m-%d_%H:%M:%S",
            },
            Cleanup::KeepLogFiles(sink_cfg.file_max_log_history.unwrap_or(10) as usize),
        )
        .build()?)
}
