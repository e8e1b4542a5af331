use tracing_subscriber::{fmt, EnvFilter};

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
/// Console output meant for the user is printed directly by the commands.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
