//! Logging integration for trod.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-table spans
//! around DDL generation.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`; an unparsable directive falls
/// back to "info". In debug mode a pretty format is used, otherwise JSON.
/// Installing a second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for rendering the columns of one table.
///
/// # Examples
///
/// ```
/// use trod_core::logging::ddl_span;
///
/// let span = ddl_span("user");
/// let _guard = span.enter();
/// tracing::info!("rendering columns");
/// ```
pub fn ddl_span(table: &str) -> tracing::Span {
    tracing::info_span!("ddl", table = table)
}
