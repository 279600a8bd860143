//! Diagnostic logging to stderr. Operator status lines go to stdout and are
//! not part of this.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset; keeps the prompt readable.
const DEFAULT_FILTER: &str = "warn";

pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("imgfetch: logging unavailable: {e}");
    }
}
