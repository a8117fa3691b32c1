//! Optional `tracing` setup for applications embedding the client.
//!
//! The library only emits events; nothing is installed until the application
//! calls [`init`] (process-wide) or [`init_scoped`] (current thread, removed
//! when the guard drops). Both honor `RUST_LOG` and fall back to the given
//! directive, e.g. `"blaseball=debug"`.

use crate::{Error, Result};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a global subscriber that writes to stderr.
///
/// # Errors
///
/// Fails if the directive is invalid or a global subscriber already exists.
pub fn init(default_directive: &str) -> Result<()> {
    let filter = env_filter(default_directive)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .map_err(|e| Error::ConfigurationError(format!("Failed to install logger: {}", e)))
}

/// Installs a subscriber for the current thread only.
///
/// Output goes through the test writer so `cargo test` captures it. Logging
/// stops when the returned guard is dropped.
pub fn init_scoped(default_directive: &str) -> Result<DefaultGuard> {
    let filter = env_filter(default_directive)?;

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_ansi(false)
            .with_filter(filter),
    );

    Ok(tracing::subscriber::set_default(subscriber))
}

fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| Error::ConfigurationError(format!("Invalid log directive: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_logging_accepts_directive() {
        let guard = init_scoped("blaseball=debug").unwrap();
        tracing::debug!("scoped subscriber installed");
        drop(guard);
    }
}
