use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::theme::{THEME_NAMES, Theme};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "funnel-preview";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const SESSION_COOKIE_ENV: &str = "FUNNEL_SESSION_COOKIE";

pub const KEYS: [&str; 5] = [
    "server.base_url",
    "server.session_cookie",
    "server.timeout_secs",
    "defaults.theme",
    "defaults.windowed",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Raw `Cookie` header value. If not set, falls back to the
    /// FUNNEL_SESSION_COOKIE environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "No config found. Run `funnel-preview config init` to create one."
                )
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Funnel Preview configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Session cookie from config, then from the environment.
    pub fn session_cookie(&self) -> Option<String> {
        if let Some(cookie) = self.server.as_ref().and_then(|s| s.session_cookie.as_ref()) {
            if !cookie.is_empty() {
                return Some(cookie.clone());
            }
        }
        std::env::var(SESSION_COOKIE_ENV)
            .ok()
            .filter(|c| !c.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        let secs = self
            .server
            .as_ref()
            .and_then(|s| s.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn default_theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn windowed(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.windowed)
            .unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.base_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    anyhow::bail!("Invalid base_url: {value}. Must start with http:// or https://.");
                }
                self.server.get_or_insert_with(ServerConfig::default).base_url =
                    Some(value.trim_end_matches('/').to_string());
            }
            "server.session_cookie" => {
                self.server
                    .get_or_insert_with(ServerConfig::default)
                    .session_cookie = Some(value.to_string());
            }
            "server.timeout_secs" => {
                let secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => anyhow::bail!(
                        "Invalid timeout_secs: {value}. Must be a positive number of seconds."
                    ),
                };
                self.server
                    .get_or_insert_with(ServerConfig::default)
                    .timeout_secs = Some(secs);
            }
            "defaults.theme" => {
                if !Theme::is_known(value) {
                    anyhow::bail!(
                        "Invalid theme: {value}. Must be one of: {}.",
                        THEME_NAMES.join(", ")
                    );
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.windowed" => {
                let windowed = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid windowed: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(windowed);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(!config.windowed());
        assert!(config.default_theme().is_none());
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("server.base_url", "ftp://x").is_err());
        assert!(config.set("server.timeout_secs", "0").is_err());
        assert!(config.set("defaults.windowed", "maybe").is_err());
        assert!(config.set("server.port", "80").is_err());

        config.set("defaults.theme", "sunrise").unwrap();
        config.set("server.base_url", "https://app.example.com/").unwrap();
        config.set("server.timeout_secs", "5").unwrap();
        config.set("defaults.windowed", "yes").unwrap();
        assert_eq!(config.default_theme(), Some("sunrise"));
        assert_eq!(config.base_url(), "https://app.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.windowed());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("server.session_cookie", "sid=abc").unwrap();
        config.set("defaults.theme", "light").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Funnel Preview configuration"));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session_cookie().as_deref(), Some("sid=abc"));
        assert_eq!(loaded.default_theme(), Some("light"));
    }

    #[test]
    fn test_missing_file_error_mentions_init() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("config init"));
    }
}
