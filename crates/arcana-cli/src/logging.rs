//! Tracing setup: stderr plus a daily log file in the config directory.

use arcana_infrastructure::ArcanaPaths;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "ARCANA_LOG";
const LOG_FILE_PREFIX: &str = "arcana.log";

fn env_filter() -> Option<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .ok()
}

/// `--verbose` raises the default level to debug; per-target directives
/// from the environment still apply.
fn make_filter(from_env: Option<EnvFilter>, verbose: bool) -> EnvFilter {
    let filter = from_env.unwrap_or_else(|| EnvFilter::new("info"));
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer and must live until exit.
/// Without a usable logs directory only stderr is written.
pub fn init(config_dir: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let logs_dir = ArcanaPaths::new(config_dir)
        .logs_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    let (file_layer, guard) = match logs_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(make_filter(env_filter(), verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}
