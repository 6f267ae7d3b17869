use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading
/// env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a `DMAP_*` value cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in
/// the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful
/// for testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a `DMAP_*` value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("DMAP_LOG_LEVEL", "info");
    let raw_dir = PathBuf::from(or_default("DMAP_RAW_DIR", "./data/raw"));
    let out_dir = PathBuf::from(or_default("DMAP_OUT_DIR", "./data/cleaned"));
    let policy_path = lookup("DMAP_POLICY_PATH").ok().map(PathBuf::from);

    let probe_timeout_secs = parse_u64("DMAP_PROBE_TIMEOUT_SECS", "10")?;
    let probe_concurrency = parse_usize("DMAP_PROBE_CONCURRENCY", "50")?;
    if probe_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DMAP_PROBE_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let probe_user_agent = or_default(
        "DMAP_USER_AGENT",
        "dumpstermap/0.1 (provider-validation)",
    );

    Ok(AppConfig {
        log_level,
        raw_dir,
        out_dir,
        policy_path,
        probe_timeout_secs,
        probe_concurrency,
        probe_user_agent,
    })
}
