use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize logging.
///
/// With `MULTI_AUDIO_DEBUG` set, debug logs go to a daily file under the data
/// directory. Otherwise warnings (or whatever `RUST_LOG` asks for) go to
/// stderr, raised to debug when `verbose` is set.
pub fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    if std::env::var("MULTI_AUDIO_DEBUG").is_ok() {
        let log_dir = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("multi-audio-importer");

        let _ = std::fs::create_dir_all(&log_dir);

        let file_appender = tracing_appender::rolling::daily(&log_dir, "multi-audio-importer.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .init();

        tracing::info!("Multi-audio importer logging initialized");
        Some(guard)
    } else {
        let default_level = if verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(filter)
            .init();
        None
    }
}
