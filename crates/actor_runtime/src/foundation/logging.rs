//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize logging with a fallback filter, still overridable through `RUST_LOG`
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}
