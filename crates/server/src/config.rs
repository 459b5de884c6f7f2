use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use filemgr_capabilities::{
    DirectStorage, EngineOptions, FileOperationEngine, MediatedStorage, StorageAccess,
};
use serde::Deserialize;
use tracing::info;
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// 配置文件不存在时使用默认配置。
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// 浏览根目录，未配置时使用用户主目录。
    pub fn root(&self) -> Result<PathBuf> {
        match &self.browser.root {
            Some(root) => Ok(root.clone()),
            None => dirs::home_dir()
                .ok_or_else(|| anyhow!("no browser.root configured and home directory is unknown")),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            file_extension: self.browser.file_extension.clone(),
            file_template: self.browser.file_template.clone(),
        }
    }

    pub fn build_engine(&self) -> Result<FileOperationEngine> {
        let storage: Arc<dyn StorageAccess> = match self.storage.backend {
            StorageBackend::Direct => Arc::new(DirectStorage::new()),
            StorageBackend::Mediated => {
                let grants = if self.storage.grants.is_empty() {
                    vec![self.root()?]
                } else {
                    self.storage.grants.clone()
                };
                Arc::new(MediatedStorage::new(self.storage.authority.clone(), grants))
            }
        };

        Ok(FileOperationEngine::new(storage, self.engine_options()))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListenConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(default)]
    pub file_template: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            root: None,
            file_extension: default_file_extension(),
            file_template: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub grants: Vec<PathBuf>,
    #[serde(default = "default_authority")]
    pub authority: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            grants: Vec::new(),
            authority: default_authority(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Direct,
    Mediated,
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

fn default_file_extension() -> String {
    "txt".to_string()
}

fn default_authority() -> String {
    "filemgr.provider".to_string()
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, StorageBackend};

    #[test]
    fn test_parse_config() {
        let raw = r#"
[server]
bind = "0.0.0.0:9000"

[browser]
root = "/srv/files"
file_extension = "md"
file_template = "Hello, this is a new text file!"

[storage]
backend = "mediated"
grants = ["/srv/files/Documents"]
"#;

        let config = ServerConfig::from_str(raw).expect("config should parse");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(
            config.root().expect("root is configured").to_str(),
            Some("/srv/files")
        );
        assert_eq!(config.browser.file_extension, "md");
        assert_eq!(
            config.browser.file_template.as_deref(),
            Some("Hello, this is a new text file!")
        );
        assert_eq!(config.storage.backend, StorageBackend::Mediated);
        assert_eq!(config.storage.grants.len(), 1);
        assert_eq!(config.storage.authority, "filemgr.provider");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServerConfig::from_str("").expect("empty config should parse");
        assert_eq!(config.server.bind, "127.0.0.1:7878");
        assert_eq!(config.browser.file_extension, "txt");
        assert!(config.browser.file_template.is_none());
        assert_eq!(config.storage.backend, StorageBackend::Direct);

        let options = config.engine_options();
        assert_eq!(options.file_extension, "txt");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = ServerConfig::from_str("[storage]\nbackend = \"cloud\"\n")
            .expect_err("unknown backend should fail");
        assert!(err.to_string().contains("server config"));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let temp = tempfile::TempDir::new().expect("temp dir should be created");
        let config =
            ServerConfig::load(temp.path().join("absent.toml")).expect("missing file is fine");
        assert_eq!(config.server.bind, "127.0.0.1:7878");
    }
}
