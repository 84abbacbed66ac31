//! Process-level setup for embedding applications.

use tracing_subscriber::EnvFilter;

/// Initialize logging with tracing_subscriber.
///
/// Honors `RUST_LOG`; falls back to debug for this crate and info elsewhere.
/// Safe to call when a global subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("content_audit=debug,info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .with_ansi(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Global subscriber already set, keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_repeatable() {
        init_logging();
        init_logging();
        tracing::info!("[AUDIT] logging initialised");
    }
}
