//! Logging Infrastructure
//!
//! Console logging always; a daily rolling file as well when a log directory
//! is configured. Filter comes from `RUST_LOG`, falling back to the default
//! directive below.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "forno_server=info,tower_http=info,security=info";

/// Initialize the logger.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init_logger(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let console = tracing_subscriber::fmt::layer().with_target(true);

    if let Some(dir) = log_dir {
        let path = Path::new(dir);
        if std::fs::create_dir_all(path).is_ok() {
            let appender = tracing_appender::rolling::daily(path, "forno-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .init();
    None
}
