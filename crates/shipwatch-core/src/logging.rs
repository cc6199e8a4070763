use tracing_subscriber::EnvFilter;

/// Install the global JSON log subscriber on stderr.
///
/// Quiet mode suppresses every level so stdout/stderr carry only user-facing
/// output. Otherwise `RUST_LOG` is honoured, defaulting to `info`.
pub fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // try_init: tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
