//! Logging setup shared by every Reserva binary.
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and a formatted stdout layer.
//! When `RESERVA_LOG_DIR` is set, a second layer writes daily rolling files there.

use std::env;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory for rolling log files. Unset means stdout only.
pub const LOG_DIR_ENV: &str = "RESERVA_LOG_DIR";

/// Initialize the tracing subscriber at INFO.
///
/// Keep the returned guard alive for the lifetime of the process, otherwise buffered
/// file output is dropped.
///
/// # Examples
///
/// ```
/// use reserva_common::logging;
///
/// let _guard = logging::init();
/// ```
pub fn init() -> Option<WorkerGuard> {
    init_with_level(Level::INFO)
}

/// Initialize the tracing subscriber with a specific log level for the `reserva*` targets.
/// `RUST_LOG` directives are honoured on top of it.
pub fn init_with_level(level: Level) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env();
    let filter = match format!("reserva={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };

    let (file_layer, guard) = match env::var(LOG_DIR_ENV) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "reserva.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(file_layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
    guard
}
