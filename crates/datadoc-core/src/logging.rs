//! Tracing subscriber setup for hosts embedding the core.

use crate::config::DatadocSettings;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber honoring the configured level.
///
/// `RUST_LOG` takes precedence over the settings when present. Calling this
/// more than once is harmless; only the first subscriber is kept.
pub fn init_logging(settings: &DatadocSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("datadoc_core={}", settings.log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let result = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed, keeping the existing one");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let settings = DatadocSettings::default();
        init_logging(&settings);
        init_logging(&settings);
    }
}
