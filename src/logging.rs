//! Logger setup for drivers and tests

use crate::config::LoggingConfig;

/// Installs `env_logger` with the configured level as the default filter.
/// `RUST_LOG` still takes precedence. Calling this more than once is harmless.
pub fn init(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    if let Err(err) = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
    {
        log::debug!("logger already initialised: {err}");
    }
}

/// Test-friendly variant: output is captured by the test harness.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
