//! Tracing subscriber setup.
//!
//! Console output goes to stderr (pretty or JSON). Every event is also
//! written as a JSON line to a rolling log file when one can be created.

use std::{fs, io, path::Path};

use anyhow::Context;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat, LogRotation};

pub const DEFAULT_FILTER: &str = "todos=info,tower_http=info";

/// Initialize the global tracing subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process. A log file that cannot be created is not fatal:
/// the service keeps console logging and reports the problem once the
/// subscriber is up.
pub fn init_tracing(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_writer, guard, file_error) = match rolling_appender(config) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let pretty_layer = (config.log_format == LogFormat::Pretty)
        .then(|| fmt::layer().with_target(true).with_writer(io::stderr));
    let json_layer = (config.log_format == LogFormat::Json)
        .then(|| fmt::layer().json().with_writer(io::stderr));
    let file_layer =
        file_writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()?;

    let log_path = config.log_path();
    match file_error {
        None => tracing::info!(
            path = %log_path.display(),
            rotation = ?config.log_rotation,
            max_files = config.log_max_files,
            "file logging enabled"
        ),
        Some(e) => tracing::warn!(
            path = %log_path.display(),
            error = %format!("{e:#}"),
            "cannot open log file, logging to console only"
        ),
    }

    Ok(guard)
}

/// Builds the rolling file appender described by `config`.
///
/// Files are named `<stem>.<date>.<ext>` inside `log_dir`, or exactly
/// `log_file` when rotation is disabled. At most `log_max_files` dated files
/// are kept.
pub fn rolling_appender(config: &Config) -> anyhow::Result<RollingFileAppender> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("cannot create log directory {}", config.log_dir.display()))?;

    let name = Path::new(&config.log_file);
    let prefix = name
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.log_file.clone());

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation(config.log_rotation))
        .filename_prefix(prefix)
        .max_log_files(config.log_max_files);
    if let Some(ext) = name.extension() {
        builder = builder.filename_suffix(ext.to_string_lossy().into_owned());
    }

    builder
        .build(&config.log_dir)
        .with_context(|| format!("cannot open log file in {}", config.log_dir.display()))
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}
