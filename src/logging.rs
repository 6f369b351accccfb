use crate::config::AppConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Set to `1` for JSON log lines.
pub const LOG_JSON_ENV: &str = "SATCHEL_LOG_JSON";

/// Installs the stderr subscriber. `RUST_LOG` wins over the app's debug flag.
///
/// Only the first call installs anything; later calls leave the existing
/// subscriber in place.
pub fn init_logging(config: &AppConfig) -> bool {
    let default_level = if config.is_debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let use_json = std::env::var(LOG_JSON_ENV).map(|value| value == "1").unwrap_or(false);

    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);
    let installed = (if use_json { builder.json().try_init() } else { builder.pretty().try_init() }).is_ok();

    tracing::debug!(
        installed,
        json = use_json,
        data_dir = %config.data_dir.display(),
        lightning = config.lightning_feature_enabled,
        "logging ready"
    );
    installed
}
