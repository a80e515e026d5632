//! Core logging bootstrap.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process, either to stderr or
//!   to size-rotated files in a directory.
//! - Emit metadata-only diagnostic events; glossary text never reaches logs.
//!
//! # Invariants
//! - Initialization is idempotent for the same level and target.
//! - Re-initialization with a different level or target is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "glossary";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Absolute directory holding rotated `glossary*.log` files.
    Directory(PathBuf),
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => write!(f, "stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

struct LoggingState {
    level: &'static str,
    target: LogTarget,
    _logger: LoggerHandle,
}

/// Initializes logging with `level` and an optional log directory.
///
/// `log_dir = None` logs to stderr.
///
/// # Errors
/// - Unsupported `level`, or a relative/empty `log_dir`.
/// - Log directory cannot be created or the backend fails to start.
/// - Logging is already active with a different level or target.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), String> {
    let normalized_level = normalize_level(level)?;
    let target = match log_dir {
        Some(dir) => LogTarget::Directory(normalize_log_dir(dir)?),
        None => LogTarget::Stderr,
    };

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = start_backend(normalized_level, &target)?;
        install_panic_hook();

        info!(
            "event=glossary_start module=core status=ok version={} profile={} os={}",
            crate::core_version(),
            build_profile(),
            std::env::consts::OS
        );
        info!(
            "event=logging_init module=core status=ok level={} target={}",
            normalized_level, target
        );

        Ok(LoggingState {
            level: normalized_level,
            target: target.clone(),
            _logger: logger,
        })
    })?;

    if state.target != target || state.level != normalized_level {
        return Err(format!(
            "logging already initialized as `{}` -> `{}`; refusing to switch to `{}` -> `{}`",
            state.level, state.target, normalized_level, target
        ));
    }
    Ok(())
}

/// Returns `(level, target)` when logging is active.
pub fn logging_status() -> Option<(&'static str, LogTarget)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.target.clone()))
}

/// Default level for the current build mode: `debug` or `info`.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if !log_dir.is_absolute() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            log_dir.display()
        ));
    }
    Ok(log_dir.to_path_buf())
}

fn start_backend(level: &'static str, target: &LogTarget) -> Result<LoggerHandle, String> {
    let logger = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?;

    let logger = match target {
        LogTarget::Stderr => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
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
        }
    };

    logger
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    }
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let (file, line) = info
                .location()
                .map_or(("unknown", 0), |location| (location.file(), location.line()));
            let (kind, chars) = payload_shape(info.payload());
            error!(
                "event=panic module=core status=error file={} line={} payload_kind={} payload_chars={}",
                file, line, kind, chars
            );
            default_hook(info);
        }));
    });
}

// Payloads may quote phrases or meanings, so only their shape is logged.
fn payload_shape(payload: &(dyn Any + Send)) -> (&'static str, usize) {
    if let Some(text) = payload.downcast_ref::<&str>() {
        ("str", text.chars().count())
    } else if let Some(text) = payload.downcast_ref::<String>() {
        ("string", text.chars().count())
    } else {
        ("opaque", 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, payload_shape,
        LogTarget,
    };
    use std::any::Any;
    use std::path::Path;

    #[test]
    fn level_names_are_case_and_alias_tolerant() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert_eq!(normalize_level("Off").unwrap(), "off");
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let message = normalize_log_dir(Path::new("logs/dev")).unwrap_err();
        assert!(message.contains("absolute"));
        assert!(normalize_log_dir(Path::new("")).is_err());
    }

    #[test]
    fn panic_payload_reports_shape_not_text() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("caf\u{e9} au lait"));
        assert_eq!(payload_shape(owned.as_ref()), ("string", 12));

        let borrowed: Box<dyn Any + Send> = Box::new("cat");
        assert_eq!(payload_shape(borrowed.as_ref()), ("str", 3));

        let opaque: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(payload_shape(opaque.as_ref()), ("opaque", 0));
    }

    #[test]
    fn second_init_must_match_first() {
        let glossary_logs = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();

        init_logging("info", Some(glossary_logs.path())).unwrap();
        init_logging("INFO", Some(glossary_logs.path())).unwrap();

        let level_error = init_logging("debug", Some(glossary_logs.path())).unwrap_err();
        assert!(level_error.contains("refusing to switch"));
        let target_error = init_logging("info", None).unwrap_err();
        assert!(target_error.contains("stderr"));
        assert!(init_logging("info", Some(elsewhere.path())).is_err());

        let (level, target) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(
            target,
            LogTarget::Directory(glossary_logs.path().to_path_buf())
        );
    }
}
