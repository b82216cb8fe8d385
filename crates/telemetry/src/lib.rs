//! Tracing subscriber setup shared by the service and CLI binaries.

use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Build the level filter. `RUST_LOG` takes precedence over the configured
/// directive string.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(from_env.as_deref(), &settings.filter)
}

/// Pick the filter from `rust_log` when it parses, otherwise from `configured`.
fn resolve_filter(rust_log: Option<&str>, configured: &str) -> anyhow::Result<EnvFilter> {
    if let Some(filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", configured, e))
}

/// Install the global subscriber. Calling it twice is harmless; the second
/// call keeps the first subscriber.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.log_format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "bookshelf-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        let err = resolve_filter(None, "bookshelf=loudest").unwrap_err();
        assert!(err.to_string().contains("bookshelf=loudest"));
    }

    #[test]
    fn rust_log_wins_over_configured_filter() {
        let filter = resolve_filter(Some("bookshelf=trace"), "info").unwrap();
        assert_eq!(filter.to_string(), "bookshelf=trace");
    }

    #[test]
    fn unparsable_rust_log_falls_back_to_configured_filter() {
        let filter = resolve_filter(Some("bookshelf=loudest"), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn init_twice_is_not_an_error() {
        let settings = TelemetrySettings::default();
        init(&settings).unwrap();
        init(&settings).unwrap();
    }
}
