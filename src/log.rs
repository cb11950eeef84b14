//! Initialisation of the program logger.
//!
//! Messages go to the console (stdout for ordinary messages, stderr for warnings and errors) and,
//! when a simulation is run, to log files in the output folder.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the `SOSIM_LOG_LEVEL`
/// environment variable or the settings.toml file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable used to override the log level
const LOG_LEVEL_ENV_VAR: &str = "SOSIM_LOG_LEVEL";

/// Log file for ordinary messages
const LOG_INFO_FILE_NAME: &str = "sosim_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "sosim_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level is taken from the `SOSIM_LOG_LEVEL` environment variable if set, else from
/// `log_level_from_settings`, else [`DEFAULT_LOG_LEVEL`]. Valid levels are `off`, `error`, `warn`,
/// `info`, `debug` and `trace`.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_dir`: Folder in which to create log files, if any
pub fn init(log_level_from_settings: Option<&str>, log_dir: Option<&Path>) -> Result<()> {
    let log_level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => level,
        Err(_) => log_level_from_settings
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string(),
    };
    let log_level = parse_log_level(&log_level)?;

    let mut dispatch = console_dispatch(log_level);
    if let Some(log_dir) = log_dir {
        dispatch = dispatch.chain(file_dispatch(log_level, log_dir)?);
    }
    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Convert a log level name (case insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Ordinary messages to stdout and warnings/errors to stderr, coloured when writing to a terminal
fn console_dispatch(log_level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let colour_stdout = std::io::stdout().is_terminal();
    let colour_stderr = std::io::stderr().is_terminal();

    Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, colour_stdout.then_some(&colours));
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, colour_stderr.then_some(&colours));
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        )
}

/// Log files in `log_dir`, truncating any left over from a previous run.
///
/// The info file always records at least info-level messages, whatever the console level.
fn file_dispatch(log_level: LevelFilter, log_dir: &Path) -> Result<Dispatch> {
    let create = |file_name: &str| -> Result<File> {
        let file_path = log_dir.join(file_name);
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Could not create log file {}", file_path.display()))
    };

    Ok(Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(write_log_plain)
                .level(log_level.max(LevelFilter::Info))
                .chain(create(LOG_INFO_FILE_NAME)?),
        )
        .chain(
            Dispatch::new()
                .format(write_log_plain)
                .level(LevelFilter::Warn)
                .chain(create(LOG_ERROR_FILE_NAME)?),
        ))
}

/// Write a message as `[time level target] message`
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    match colours {
        Some(colours) => write_log(out, colours.color(record.level()), record.target(), message),
        None => write_log_plain(out, message, record),
    }
}
