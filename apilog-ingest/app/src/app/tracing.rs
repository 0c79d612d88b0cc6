use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FORMAT_VAR: &str = "RUST_LOG_FORMAT";

/// JSON unless `RUST_LOG_FORMAT` names another format.
fn use_json_format(format: Option<&str>) -> bool {
    format.is_none_or(|value| value == "json")
}

/// Initialize the tracing subscriber.
///
/// A second call (for instance from a test harness that already installed a
/// subscriber) is a no-op.
pub fn init_tracing() {
    let format = std::env::var(LOG_FORMAT_VAR).ok();
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    let result = if use_json_format(format.as_deref()) {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {e}");
    }
}
