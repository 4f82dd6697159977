use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default
/// `info`). Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Err only when a global subscriber is already installed.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialised twice");
    }
}
