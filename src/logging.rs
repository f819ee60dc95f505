//! Logger initialization
//!
//! `RUST_LOG` wins over the configured level so a run can be made verbose
//! without editing config files.

use crate::config::DebugConfig;

/// Install the global logger. Returns false if one was already installed.
pub fn init(config: &DebugConfig) -> bool {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .format_timestamp_millis()
    .try_init()
    .is_ok()
}
