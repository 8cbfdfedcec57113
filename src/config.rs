use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// バックエンドURLを上書きする環境変数
pub const BACKEND_URL_ENV: &str = "PLANT_ADMIN_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub backend_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AdminError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("plant-admin").join("config.json"))
    }

    /// 接続先（環境変数を優先）
    pub fn backend_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }

        self.backend_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or(AdminError::MissingBackendUrl)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AdminError::Config(format!("URLはhttp://またはhttps://で始めてください: {}", url)));
        }
        self.backend_url = Some(url);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plant-admin").join("config.json");
        let config = Config {
            backend_url: Some("http://localhost:8080".into()),
            timeout_seconds: 5,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_timeout_defaults_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend_url": "http://x"}"#).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timeout_seconds, 30);
    }

    #[test]
    fn test_broken_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AdminError::JsonParse(_))));
    }
}
