//! CLI settings.
//!
//! Reads/writes `~/.pointer/config.toml`: the shared [`HrConfig`] keys at
//! the top level plus where the session token lives.

use std::path::{Path, PathBuf};

use pointer_hr::HrConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    pub hr: HrConfig,

    /// Token file (default: ~/.pointer/token).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl CliConfig {
    /// Default config file path: ~/.pointer/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn token_path(&self) -> PathBuf {
        self.token_file
            .clone()
            .unwrap_or_else(|| dirs_path().join("token"))
    }

    /// Apply the `--api-url` / `POINTER_API_URL` override.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.hr.api_url = url;
        }
        self
    }
}

/// ~/.pointer
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".pointer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.token_path().ends_with(".pointer/token"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://rh.example.com/api\"\npage_size = 25\ntoken_file = \"/tmp/pointer-token\"\n",
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.hr.api_url, "https://rh.example.com/api");
        assert_eq!(config.hr.page_size, 25);
        assert_eq!(config.hr.resend_cooldown_secs, 60);
        assert_eq!(config.token_path(), PathBuf::from("/tmp/pointer-token"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = CliConfig::default();
        config.hr.locale = "en-US".to_string();
        config.save(&path).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn api_url_override() {
        let config = CliConfig::default().with_api_url(Some("http://10.0.0.5:8082".into()));
        assert_eq!(config.hr.api_url, "http://10.0.0.5:8082");

        let untouched = CliConfig::default().with_api_url(Some("  ".into()));
        assert_eq!(untouched.hr.api_url, pointer_hr::config::DEFAULT_API_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = \"ten\"").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }
}
