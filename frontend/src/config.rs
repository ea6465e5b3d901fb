use crate::logging::log_error;
use shared::ClientConfig;

const EMBEDDED_CONFIG: &str = include_str!("../config.toml");

/// Load the client configuration compiled into the bundle.
///
/// An invalid document is logged and replaced by defaults so the app still routes.
pub fn load_client_config() -> ClientConfig {
    match ClientConfig::from_toml(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(error) => {
            log_error(&format!("{error}; falling back to defaults"));
            ClientConfig::default()
        }
    }
}
