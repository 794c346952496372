use crate::{CliError, CliResult};

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, Record, info};
use sms_config::LogLevel;

/// Where log lines go. stdout is never a target: it carries command results.
enum LogTarget {
    File(PathBuf),
    Stderr { colored: bool },
}

impl LogTarget {
    fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file={}", path.display()),
            Self::Stderr { colored } => format!("stderr, colored={colored}"),
        }
    }
}

/// Install the global fern logger.
///
/// `log_file` wins over `colored`; file output is always plain and carries
/// the source location of each record.
pub fn initialize(log_level: LogLevel, log_file: Option<PathBuf>, colored: bool) -> CliResult<()> {
    let level: LevelFilter = log_level.0;
    let target = match log_file {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Stderr { colored },
    };

    let output = match &target {
        LogTarget::File(path) => Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} - {}] {} [{}]",
                    timestamp(),
                    record.level(),
                    message,
                    source_of(record)
                ))
            })
            .chain(open_log_file(path)?),
        LogTarget::Stderr { colored: true } => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);
            Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{} - {}] {}",
                        timestamp(),
                        colors.color(record.level()),
                        message
                    ))
                })
                .chain(std::io::stderr())
        }
        LogTarget::Stderr { colored: false } => Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{} - {}] {}", timestamp(), record.level(), message))
            })
            .chain(std::io::stderr()),
    };

    Dispatch::new()
        .level(level)
        // reqwest/hyper internals are noise at debug
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(output)
        .apply()
        .map_err(|e| CliError::logger(format!("Failed to initialize logger: {e}")))?;

    info!("Logger initialized: level={level:?}, {}", target.describe());
    Ok(())
}

fn open_log_file(path: &Path) -> CliResult<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            CliError::logger(format!("Failed to create log directory {}: {e}", dir.display()))
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CliError::logger(format!("Failed to open log file {}: {e}", path.display())))
}

fn timestamp() -> humantime::Rfc3339Timestamp {
    humantime::format_rfc3339(SystemTime::now())
}

fn source_of(record: &Record) -> String {
    format!(
        "{}:{}",
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0)
    )
}
