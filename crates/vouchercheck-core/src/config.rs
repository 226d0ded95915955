use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let env = parse_environment(&or_default("VOUCHERCHECK_ENV", "development"));

    let bind_addr = parse_addr("VOUCHERCHECK_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VOUCHERCHECK_LOG_LEVEL", "info");
    let vouchers_path = PathBuf::from(or_default(
        "VOUCHERCHECK_VOUCHERS_PATH",
        "./config/vouchers.yaml",
    ));
    let validation_path = PathBuf::from(or_default(
        "VOUCHERCHECK_VALIDATION_PATH",
        "./config/validation.yaml",
    ));

    let rate_limit_max_requests = parse_usize("VOUCHERCHECK_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("VOUCHERCHECK_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        vouchers_path,
        validation_path,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw.to_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    fn lookup_from<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let vars = HashMap::new();
        let config = build_app_config(lookup_from(&vars)).expect("config with defaults");

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.vouchers_path.to_string_lossy(),
            "./config/vouchers.yaml"
        );
        assert_eq!(
            config.validation_path.to_string_lossy(),
            "./config/validation.yaml"
        );
        assert_eq!(config.rate_limit_max_requests, 120);
        assert_eq!(config.rate_limit_window_secs, 60);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let mut vars = HashMap::new();
        vars.insert("VOUCHERCHECK_ENV", "production");
        vars.insert("VOUCHERCHECK_BIND_ADDR", "127.0.0.1:8080");
        vars.insert("VOUCHERCHECK_LOG_LEVEL", "debug");
        vars.insert("VOUCHERCHECK_VOUCHERS_PATH", "/data/vouchers.yaml");
        vars.insert("VOUCHERCHECK_RATE_LIMIT_MAX_REQUESTS", "10");

        let config = build_app_config(lookup_from(&vars)).expect("config");

        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.vouchers_path.to_string_lossy(), "/data/vouchers.yaml");
        assert_eq!(config.rate_limit_max_requests, 10);
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut vars = HashMap::new();
        vars.insert("VOUCHERCHECK_BIND_ADDR", "not-an-addr");

        let err = build_app_config(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("VOUCHERCHECK_BIND_ADDR"));
    }

    #[test]
    fn invalid_rate_limit_is_rejected() {
        let mut vars = HashMap::new();
        vars.insert("VOUCHERCHECK_RATE_LIMIT_WINDOW_SECS", "soon");

        let err = build_app_config(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("VOUCHERCHECK_RATE_LIMIT_WINDOW_SECS"));
    }

    #[test]
    fn unknown_environment_falls_back_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
        assert_eq!(parse_environment("PRODUCTION"), Environment::Production);
        assert_eq!(parse_environment("test"), Environment::Test);
    }
}
