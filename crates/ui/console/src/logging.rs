use std::fs;

use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::filter_fn, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    Layer,
};

use crate::config::get_data_dir;

/// Initialize file logging.
///
/// Logs go to a file only: stdout belongs to the TUI. The returned guard
/// must stay alive for the duration of the application so buffered log
/// lines are flushed on exit.
pub fn init() -> Result<WorkerGuard> {
    let log_dir = get_data_dir();
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "console.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    #[cfg(debug_assertions)]
    let level = LevelFilter::DEBUG;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::INFO;

    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    tracing_subscriber::registry().with(file_layer).init();

    Ok(guard)
}
