//! Logging setup
//!
//! Targets worth filtering on with `RUST_LOG`:
//! - `textdock::editor::hover` - hover span recomputation (`start`, `stop`, `url`)
//! - `textdock::editor` - settings reloads per `document`
//! - `textdock::sidebars` - results tree mutations (`document`, `count`) and preview renders
//! - `textdock::model` - document load/save, encoding fallbacks, registry inserts and closes
//! - `textdock::config` - config load/save and parse failures
//!
//! e.g. `RUST_LOG=warn,textdock::sidebars=debug`. Encoding problems are
//! reported at `warn` (lossy decode, unmappable characters) or `error`
//! (unknown codec label), so they show with the default console filter.
//!
//! Debug and above also land in `<config dir>/textdock/logs/textdock.log.YYYY-MM-DD`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing subscriber with console and file logging
///
/// The console layer respects RUST_LOG (default `warn`); the file layer
/// always records at debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "textdock.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: Logging already initialized: {}", e);
    }
}
