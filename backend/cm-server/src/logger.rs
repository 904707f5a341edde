use crate::error::{Result as ServerErrorResult, ServerError};

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use std::time::SystemTime;

use error_location::ErrorLocation;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record, info};

/// Crates whose debug output drowns the migrator's own logs.
const QUIET_TARGETS: [&str; 3] = ["sqlx", "hyper", "zip"];

/// Initialize the fern logger.
///
/// `log_file` set means plain lines appended to that file; otherwise lines
/// go to stdout, colored when `colored` is set.
#[track_caller]
pub fn initialize(
    log_level: cm_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let level_filter = LevelFilter::from(log_level);

    let base_dispatch = QUIET_TARGETS
        .iter()
        .fold(Dispatch::new().level(level_filter), |dispatch, target| {
            dispatch.level_for(*target, LevelFilter::Warn)
        });

    let output = match &log_file {
        Some(log_path) => {
            let file = fern::log_file(log_path).map_err(|e| ServerError::Logger {
                message: format!("Failed to open log file {}: {}", log_path.display(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            Dispatch::new()
                .format(|out, message, record| write_line(out, message, record, &record.level()))
                .chain(file)
        }
        None if colored => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);
            Dispatch::new()
                .format(move |out, message, record| {
                    write_line(out, message, record, &colors.color(record.level()))
                })
                .chain(std::io::stdout())
        }
        // Plain output for systemd / docker logs
        None => Dispatch::new()
            .format(|out, message, record| write_line(out, message, record, &record.level()))
            .chain(std::io::stdout()),
    };

    base_dispatch
        .chain(output)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    match &log_file {
        Some(path) => info!("Logger initialized: level={level_filter}, file={}", path.display()),
        None => info!("Logger initialized: level={level_filter}, stdout"),
    }

    // Bridge tracing to log
    tracing_log::LogTracer::init().ok();

    Ok(())
}

/// `[<rfc3339> - LEVEL] message [file:line]`
fn write_line(
    out: FormatCallback<'_>,
    message: &fmt::Arguments<'_>,
    record: &Record<'_>,
    level: &dyn fmt::Display,
) {
    out.finish(format_args!(
        "[{date} - {level}] {message} [{file}:{line}]",
        date = humantime::format_rfc3339(SystemTime::now()),
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}
