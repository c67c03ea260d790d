//! Structured logging configuration.
//!
//! Library crates log through the `log` facade; those records are bridged into
//! the tracing subscriber installed here.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the RUST_LOG env var.
///
/// # Example
///
/// ```no_run
/// use lt_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a registry lifecycle event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of registry event
/// * `table_id` - Optional table ID
/// * `message` - Event message
pub fn log_registry_event(event_type: &str, table_id: Option<u64>, message: &str) {
    tracing::info!(
        event_type = event_type,
        table_id = table_id,
        "REGISTRY: {}",
        message
    );
}
