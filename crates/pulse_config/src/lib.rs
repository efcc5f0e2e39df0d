//! Configuration for the Aimo Pulse backend.
//!
//! Values are layered: built-in defaults, `config/default.*`, `config/{RUN_ENV}.*`,
//! then `PULSE__SECTION__KEY` environment variables. String values equal to
//! `"secret_from_env"` are replaced from `PULSE_SECRET_*` variables afterwards.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;

pub use models::*;

/// Marker that asks the loader to pull a value from the secret environment variables.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the application configuration from files and environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = config_dir();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let raw: AppConfig = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    apply_env_overrides_from_marker(raw)
}

fn config_dir() -> PathBuf {
    env::var("PULSE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"))
}

/// Replaces every `"secret_from_env"` string in the serialized config with the value of the
/// matching secret environment variable.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|e| ConfigError::Message(format!("config is not serializable: {e}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|e| ConfigError::Message(format!("config no longer deserializes: {e}")))
}

fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                match env_vars::get_secret_env_var(&path_str) {
                    Some(env_val) => *obj = Value::String(env_val),
                    None => warn!(
                        "Secret for {} not found in {}",
                        path_str,
                        env_vars::secret_path_to_env_var(&path_str)
                    ),
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file once per process and returns the path that was used.
///
/// `DOTENV_OVERRIDE` names an alternative file; otherwise `.env` in the working directory.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path =
        std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pairing.code_ttl_minutes, 15);
        assert_eq!(config.shark_mode.max_days, 7);
        assert!(!config.use_push);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_secret_marker_is_replaced_from_env() {
        std::env::set_var("PULSE_SECRET_PUSH_KEY_PATH", "/tmp/service-account.json");
        let config = AppConfig {
            push: Some(PushConfig {
                project_id: Some("pulse-test".to_string()),
                key_path: Some(SECRET_MARKER.to_string()),
            }),
            ..AppConfig::default()
        };

        let resolved = apply_env_overrides_from_marker(config).unwrap();
        let push = resolved.push.unwrap();
        assert_eq!(push.key_path.as_deref(), Some("/tmp/service-account.json"));
        assert_eq!(push.project_id.as_deref(), Some("pulse-test"));
        std::env::remove_var("PULSE_SECRET_PUSH_KEY_PATH");
    }
}
