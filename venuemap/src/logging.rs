//! Logging setup.
//!
//! Structured `tracing` output goes to a log file (cleared at the start of
//! each session) and, optionally, to stderr so stdout stays free for command
//! output. `RUST_LOG` overrides the default `info` filter unless debug mode
//! is requested.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Log file only.
    FileOnly,
    /// Log file plus stderr.
    FileAndStderr,
}

/// Initialize logging.
///
/// Creates the log file's directory if needed and truncates the file.
/// `debug_mode` forces the `debug` level regardless of `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be cleared.
pub fn init_logging(
    log_file: &Path,
    target: LogTarget,
    debug_mode: bool,
) -> Result<LoggingGuard, io::Error> {
    let (dir, name) = prepare_log_file(log_file)?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = (target == LogTarget::FileAndStderr).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .compact()
    });

    let env_filter = if debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates the log directory and clears any previous session's log.
fn prepare_log_file(log_file: &Path) -> Result<(&Path, &std::ffi::OsStr), io::Error> {
    let (dir, name) = split_log_path(log_file)?;
    fs::create_dir_all(dir)?;
    fs::write(log_file, "")?;
    Ok((dir, name))
}

fn split_log_path(log_file: &Path) -> Result<(&Path, &std::ffi::OsStr), io::Error> {
    let name = log_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", log_file.display()),
        )
    })?;
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/venuemap.log")).unwrap();
        assert_eq!(dir, Path::new("/var/log"));
        assert_eq!(name, "venuemap.log");

        let (dir, name) = split_log_path(Path::new("venuemap.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "venuemap.log");
    }

    #[test]
    fn test_split_log_path_without_file_name() {
        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_guard_structure() {
        // Can't call init_logging here: the global subscriber can only be set
        // once per process.
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }

    #[test]
    fn test_prepare_log_file_creates_dirs_and_truncates() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let log_file: PathBuf = temp_dir.path().join("deep/nested/venuemap.log");

        let (dir, name) = prepare_log_file(&log_file).unwrap();
        assert_eq!(dir, temp_dir.path().join("deep/nested"));
        assert_eq!(name, "venuemap.log");
        assert!(log_file.exists());

        fs::write(&log_file, "previous session").unwrap();
        prepare_log_file(&log_file).unwrap();
        assert_eq!(fs::read_to_string(&log_file).unwrap(), "");
    }
}
