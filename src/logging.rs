use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::AppPaths;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber: stdout always, plus a daily-rolling
/// file under the log directory when it is writable.
pub fn init(paths: &AppPaths) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    let file_layer = match std::fs::create_dir_all(&paths.log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(&paths.log_dir, "backend.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = LOG_GUARD.set(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .boxed(),
            )
        }
        Err(err) => {
            eprintln!(
                "Log directory {} unavailable ({}); logging to stdout only",
                paths.log_dir.display(),
                err
            );
            None
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}
