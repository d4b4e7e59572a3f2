use std::{env, path::PathBuf, time::Duration};

use crate::storage::{JournalMode, SqliteOptions};

/// Console log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// How often the log file is rolled over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "minutely" => Some(LogRotation::Minutely),
            "hourly" => Some(LogRotation::Hourly),
            "daily" => Some(LogRotation::Daily),
            "never" => Some(LogRotation::Never),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "./data/todos.db")
    pub sqlite_path: PathBuf,
    /// SQLite journal mode (default: WAL)
    pub journal_mode: JournalMode,
    /// Directory for the JSON log file (default: "./logs")
    pub log_dir: PathBuf,
    /// Log file name inside `log_dir` (default: "app.log")
    pub log_file: String,
    /// Console log format (default: pretty)
    pub log_format: LogFormat,
    /// Log file rotation period (default: daily)
    pub log_rotation: LogRotation,
    /// Rotated log files kept on disk, oldest deleted first (default: 7)
    pub log_max_files: usize,
    /// Per-request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "./data/todos.db")
    /// - `SQLITE_JOURNAL_MODE` - delete, truncate, persist, memory, wal or off (default: wal)
    /// - `LOG_DIR` - Log directory (default: "./logs")
    /// - `LOG_FILE` - Log file name (default: "app.log")
    /// - `LOG_FORMAT` - Console format, "pretty" or "json" (default: pretty)
    /// - `LOG_ROTATION` - minutely, hourly, daily or never (default: daily)
    /// - `LOG_MAX_FILES` - Rotated log files to keep (default: 7)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 30)
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            sqlite_path: non_empty("SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/todos.db")),
            journal_mode: non_empty("SQLITE_JOURNAL_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            log_dir: non_empty("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs")),
            log_file: non_empty("LOG_FILE").unwrap_or_else(|| "app.log".to_string()),
            log_format: non_empty("LOG_FORMAT")
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            log_rotation: non_empty("LOG_ROTATION")
                .and_then(|v| LogRotation::parse(&v))
                .unwrap_or_default(),
            log_max_files: non_empty("LOG_MAX_FILES")
                .and_then(|v| v.trim().parse().ok())
                .filter(|files| *files > 0)
                .unwrap_or(7),
            request_timeout_seconds: non_empty("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(30),
        }
    }

    /// Options for opening the todo store.
    pub fn sqlite_options(&self) -> SqliteOptions {
        SqliteOptions::new(&self.sqlite_path).with_journal_mode(self.journal_mode)
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }

    /// Get request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.sqlite_path, PathBuf::from("./data/todos.db"));
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert_eq!(config.log_path(), PathBuf::from("./logs/app.log"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.log_rotation, LogRotation::Daily);
        assert_eq!(config.log_max_files, 7);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("SQLITE_PATH", "/var/lib/todos/todos.db"),
            ("SQLITE_JOURNAL_MODE", "DELETE"),
            ("LOG_DIR", "/var/log/todos"),
            ("LOG_FILE", "service.log"),
            ("LOG_FORMAT", "json"),
            ("LOG_ROTATION", "Hourly"),
            ("LOG_MAX_FILES", "3"),
            ("REQUEST_TIMEOUT_SECONDS", "5"),
        ]);

        assert_eq!(config.sqlite_path, PathBuf::from("/var/lib/todos/todos.db"));
        assert_eq!(config.journal_mode, JournalMode::Delete);
        assert_eq!(
            config.log_path(),
            PathBuf::from("/var/log/todos/service.log")
        );
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_rotation, LogRotation::Hourly);
        assert_eq!(config.log_max_files, 3);
        assert_eq!(config.request_timeout_seconds, 5);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_with(&[
            ("SQLITE_PATH", "  "),
            ("SQLITE_JOURNAL_MODE", "fast"),
            ("LOG_FORMAT", "xml"),
            ("LOG_ROTATION", "weekly"),
            ("LOG_MAX_FILES", "0"),
            ("REQUEST_TIMEOUT_SECONDS", "soon"),
        ]);

        assert_eq!(config.sqlite_path, PathBuf::from("./data/todos.db"));
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.log_rotation, LogRotation::Daily);
        assert_eq!(config.log_max_files, 7);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn test_sqlite_options() {
        let config = config_with(&[("SQLITE_PATH", "todos.db"), ("SQLITE_JOURNAL_MODE", "truncate")]);

        let options = config.sqlite_options();

        assert_eq!(options.path, PathBuf::from("todos.db"));
        assert_eq!(options.journal_mode, JournalMode::Truncate);
    }
}
