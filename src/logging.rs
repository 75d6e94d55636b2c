use crate::config::LOG_FILE_NAME;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "print2fax=debug,info"
    } else {
        "print2fax=info,warn"
    }
}

/// Installs stdout logging plus a daily rolling file under `logs_dir`.
///
/// Keep the returned guard alive for as long as the process logs; dropping it
/// flushes and stops the file writer.
pub fn init_tracing(verbose: bool, logs_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}
