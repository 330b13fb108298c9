use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directives: our crates and audit lines at `LOG_LEVEL`, noisy
/// dependencies at warn.
pub(crate) fn default_directives(level: &str) -> String {
    format!(
        "welding_admin={level},welding_admin_firebase={level},welding_admin_observability={level},audit=info,tower_http=warn,hyper=warn,reqwest=warn,tonic=warn,h2=warn"
    )
}

/// Console-only logging, used when the `observability` feature is off or
/// `OBSERVABILITY_ENABLED=false`.
///
/// - **Log Level**: `LOG_LEVEL` (default `info`), overridden by `RUST_LOG`
/// - **Format**: compact, with file and line numbers
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // try_init: a subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
