use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset. The HTTP stack is noisy at `info`.
const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,reqwest=warn";

/// Installs the global subscriber with uptime timestamps and compact lines.
/// Notifications come out under the `toast` target.
pub fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // A second call finds a subscriber already set and leaves it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(true)
        .compact()
        .try_init();
}
