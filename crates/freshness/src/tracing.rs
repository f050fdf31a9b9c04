/// Initializes the tracing/logging infrastructure for the application.
///
/// Structured logging via the `tracing` crate, filtered through the
/// `RUST_LOG` environment variable:
/// - `RUST_LOG=info` - phase transitions and load-sequence milestones
/// - `RUST_LOG=debug` - individual settlements, dropped triggers, discarded
///   stale results
/// - `RUST_LOG=warn` - load and refresh failures only
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
