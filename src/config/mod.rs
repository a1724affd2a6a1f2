mod types;

pub use types::*;

use anyhow::{Context, Result};
use scrubview_common::UserId;
use std::path::{Path, PathBuf};

/// Environment variables that override file settings.
pub const ENV_SERVER_URL: &str = "SCRUBVIEW_SERVER_URL";
pub const ENV_API_KEY: &str = "SCRUBVIEW_API_KEY";
pub const ENV_USER_ID: &str = "SCRUBVIEW_USER_ID";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Locations searched, in order, when no config path is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "./scrubview.toml",
    "~/.config/scrubview/config.toml",
    "/etc/scrubview/config.toml",
];

/// First default location that exists, if any
pub fn find_config_file() -> Option<PathBuf> {
    first_existing(&DEFAULT_CONFIG_PATHS)
}

fn first_existing(paths: &[&str]) -> Option<PathBuf> {
    paths
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    if let Some(path) = find_config_file() {
        return load_config(&path);
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply `SCRUBVIEW_*` environment overrides on top of file settings
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(url) = std::env::var(ENV_SERVER_URL) {
        config.server.url = url;
    }
    if let Ok(key) = std::env::var(ENV_API_KEY) {
        config.server.api_key = key;
    }
    if let Ok(user) = std::env::var(ENV_USER_ID) {
        let user: UserId = user
            .parse()
            .with_context(|| format!("{} is not a valid user id", ENV_USER_ID))?;
        config.server.user_id = Some(user);
    }
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.url.trim().is_empty() {
        anyhow::bail!("Server URL cannot be empty");
    }
    if !config.server.url.starts_with("http://") && !config.server.url.starts_with("https://") {
        anyhow::bail!("Server URL must start with http:// or https://");
    }
    if config.server.timeout_secs == 0 {
        anyhow::bail!("Server timeout cannot be 0");
    }

    let preview = &config.preview;
    if preview.cache_capacity == 0 {
        anyhow::bail!("Preview cache capacity must be at least 1");
    }
    if preview.eviction_batch == 0 || preview.eviction_batch > preview.cache_capacity {
        anyhow::bail!(
            "Eviction batch must be between 1 and the cache capacity ({})",
            preview.cache_capacity
        );
    }
    if preview.fallback_interval_ms == 0 {
        anyhow::bail!("Fallback preview interval cannot be 0");
    }

    if config.server.api_key.is_empty() {
        tracing::warn!("No API key configured; server requests will be unauthenticated");
    }

    Ok(())
}

/// Check that everything needed to talk to the server is present
pub fn require_credentials(config: &Config) -> Result<UserId> {
    if config.server.api_key.is_empty() {
        anyhow::bail!("server.api_key is not set (or export {})", ENV_API_KEY);
    }
    config
        .server
        .user_id
        .ok_or_else(|| anyhow::anyhow!("server.user_id is not set (or export {})", ENV_USER_ID))
}
