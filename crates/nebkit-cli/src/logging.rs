use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps `-q` and the `-v` count to a level: warnings by default, then info,
/// debug and trace.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: compact colored output on stderr, plus a
/// plain-text copy with thread ids in `log_file` when given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(File::create(&path)?)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, warn};

    #[test]
    fn verbosity_maps_to_increasing_levels() {
        let levels: Vec<_> = (0..4).map(|v| level_filter(v, false)).collect();
        assert_eq!(
            levels,
            vec![
                LevelFilter::WARN,
                LevelFilter::INFO,
                LevelFilter::DEBUG,
                LevelFilter::TRACE
            ]
        );
        assert_eq!(level_filter(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_disables_logging_regardless_of_verbosity() {
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn file_layer_writes_plain_text_with_thread_ids() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nebkit.log");

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(File::create(&log_path).unwrap())
                .with_ansi(false)
                .with_thread_ids(true),
        );
        tracing::subscriber::with_default(subscriber, || {
            debug!(index = 4, "Located migrating ion.");
            warn!("No corresponding template file found.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Located migrating ion. index=4"));
        assert!(content.contains("WARN"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = setup_logging(0, false, Some(dir.path().to_path_buf()));

        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
