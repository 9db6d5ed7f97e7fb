use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads `BINOPS_*` settings, loading a `.env` file first if one exists.
///
/// # Errors
///
/// Returns [`ConfigError`] when `BINOPS_API_URL` is unset or a value does
/// not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads `BINOPS_*` settings from the process environment only.
///
/// # Errors
///
/// Same as [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Builds the config from `lookup`; tests pass a `HashMap`-backed closure.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let api_base_url = require("BINOPS_API_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BINOPS_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_base_url}\""),
        });
    }

    let api_token = lookup("BINOPS_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let env = parse_environment(&or_default("BINOPS_ENV", "development"));
    let log_level = or_default("BINOPS_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("BINOPS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BINOPS_USER_AGENT", "binops/0.1 (fleet-operations)");

    Ok(AppConfig {
        env,
        api_base_url,
        api_token,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

/// Unknown names fall back to development.
fn parse_environment(name: &str) -> Environment {
    match name.trim().to_ascii_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
