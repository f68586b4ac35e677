//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use hirewire_core::error::{HirewireError, Result};

pub use schema::{DevSeed, GatewayConfig, GatewaySection, Limits};

/// Env var overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "HIREWIRE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "hirewire.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| HirewireError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| HirewireError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config path from the environment, falling back to `hirewire.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
