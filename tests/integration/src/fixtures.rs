//! Test fixtures and data generators

use lobby_common::AppConfig;

/// Config with an aggressive heartbeat so liveness tests finish quickly
pub fn fast_heartbeat_config(interval_ms: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.heartbeat.interval_ms = interval_ms;
    config
}
