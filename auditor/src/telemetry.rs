// Third party imports
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the default subscriber: env-filtered, stderr, ANSI colors.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .try_init();
}
