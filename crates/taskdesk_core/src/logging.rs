//! Rolling-file logging driven by `CoreConfig`.
//!
//! # Responsibility
//! - Start the flexi_logger backend once per process from `log_level` and
//!   `log_dir`.
//! - Keep log lines metadata-only: ids, counts and status codes, never titles.
//!
//! # Invariants
//! - The first successful init fixes the level and directory for the process;
//!   a later init with the same target is a no-op, any other target fails.
//! - A config without `log_dir` leaves logging off and never fails.
//! - Initialization never panics.

use crate::config::{ConfigError, CoreConfig};
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "taskdesk";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Level and directory of the running file logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

#[derive(Debug)]
pub enum LoggingError {
    Config(ConfigError),
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(FlexiLoggerError),
    /// Logging already runs with another level or directory.
    Conflict { active: LogTarget, requested: LogTarget },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::CreateDir { dir, source } => {
                write!(f, "failed to create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already runs at {} in `{}`; refusing {} in `{}`",
                active.level,
                active.dir.display(),
                requested.level,
                requested.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::Conflict { .. } => None,
        }
    }
}

impl From<ConfigError> for LoggingError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Parses a config log level. Accepts `warning` as an alias of `warn`.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// Level used when the config does not name one.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts file logging as configured.
///
/// Returns `Ok(None)` when `config.log_dir` is unset, otherwise the active
/// target.
///
/// # Errors
/// - `Config` when the level or directory fails config validation.
/// - `CreateDir`/`Backend` when the backend cannot start.
/// - `Conflict` when an earlier init chose a different target.
pub fn init_logging(config: &CoreConfig) -> Result<Option<LogTarget>, LoggingError> {
    config.validate()?;
    let (Some(dir), Some(level)) = (config.log_dir.clone(), parse_level(&config.log_level))
    else {
        return Ok(None);
    };
    let requested = LogTarget { level, dir };

    let active = ACTIVE.get_or_try_init(|| start_backend(requested.clone()))?;
    if active.target != requested {
        return Err(LoggingError::Conflict {
            active: active.target.clone(),
            requested,
        });
    }
    Ok(Some(requested))
}

/// Target of the running logger, if any.
pub fn logging_status() -> Option<LogTarget> {
    ACTIVE.get().map(|active| active.target.clone())
}

fn start_backend(target: LogTarget) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&target.dir).map_err(|source| LoggingError::CreateDir {
        dir: target.dir.clone(),
        source,
    })?;

    let handle = Logger::with(LogSpecification::builder().default(target.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(target.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=core_start module=core status=ok platform={} version={} level={} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        target.level,
        target.dir.display()
    );

    Ok(ActiveLogger {
        target,
        _handle: handle,
    })
}

// Runs once: only called from the `ACTIVE` initializer.
fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            one_line(payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

/// Flattens a panic payload onto one capped line; payloads may carry titles.
fn one_line(value: &str, max_chars: usize) -> String {
    let mut line: String = value
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r') { ' ' } else { ch })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, parse_level, LoggingError};
    use crate::config::{ConfigError, CoreConfig};
    use log::LevelFilter;
    use std::path::PathBuf;

    fn config_at(level: &str, dir: PathBuf) -> CoreConfig {
        CoreConfig {
            log_level: level.to_string(),
            log_dir: Some(dir),
            ..CoreConfig::default()
        }
    }

    #[test]
    fn parse_level_accepts_aliases_and_case() {
        assert_eq!(parse_level(" INFO "), Some(LevelFilter::Info));
        assert_eq!(parse_level("warning"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn config_without_log_dir_leaves_logging_off() {
        assert_eq!(init_logging(&CoreConfig::default()).unwrap(), None);
    }

    #[test]
    fn relative_log_dir_is_a_config_error() {
        let err = init_logging(&config_at("info", PathBuf::from("logs/dev"))).unwrap_err();
        assert!(matches!(
            err,
            LoggingError::Config(ConfigError::InvalidValue { key: "log_dir", .. })
        ));
    }

    #[test]
    fn one_line_flattens_and_caps_payload() {
        let line = one_line("line1\nline2\rline3", 8);
        assert_eq!(line, "line1 li...");
    }

    #[test]
    fn init_is_idempotent_for_same_target_and_rejects_conflicts() {
        let root = tempfile::tempdir().unwrap();
        let first = config_at("info", root.path().join("logs"));

        let target = init_logging(&first).unwrap().unwrap();
        assert_eq!(init_logging(&first).unwrap(), Some(target.clone()));

        let louder = config_at("debug", root.path().join("logs"));
        assert!(matches!(
            init_logging(&louder).unwrap_err(),
            LoggingError::Conflict { .. }
        ));
        let elsewhere = config_at("info", root.path().join("other"));
        assert!(matches!(
            init_logging(&elsewhere).unwrap_err(),
            LoggingError::Conflict { .. }
        ));

        assert_eq!(logging_status(), Some(target));
    }
}
