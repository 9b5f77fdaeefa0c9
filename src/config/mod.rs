//! Persistent settings for adopr
//!
//! Four named string settings stored as TOML under the platform config
//! directory. The config is loaded once and passed through the pipeline;
//! nothing here touches process-wide state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const CONFIG_DIR: &str = "adopr";

/// Filename for the settings file.
const CONFIG_FILE: &str = "config.toml";

/// The named settings a user can get or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigKey {
    /// OpenAI API key used for draft generation
    OpenaiApiKey,
    /// Azure DevOps personal access token
    AzurePat,
    /// Organization URL (e.g. `https://dev.azure.com/myorg`)
    OrganizationUrl,
    /// Default target branch for pull requests
    TargetBranch,
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenaiApiKey => write!(f, "openai-api-key"),
            Self::AzurePat => write!(f, "azure-pat"),
            Self::OrganizationUrl => write!(f, "organization-url"),
            Self::TargetBranch => write!(f, "target-branch"),
        }
    }
}

/// Persisted settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// Azure DevOps personal access token
    pub azure_pat: Option<String>,
    /// Organization URL
    pub organization_url: Option<String>,
    /// Default target branch
    pub target_branch: Option<String>,
}

impl Config {
    /// Get a setting by key.
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::OpenaiApiKey => self.openai_api_key.as_deref(),
            ConfigKey::AzurePat => self.azure_pat.as_deref(),
            ConfigKey::OrganizationUrl => self.organization_url.as_deref(),
            ConfigKey::TargetBranch => self.target_branch.as_deref(),
        }
    }

    /// Set a setting by key.
    pub fn set(&mut self, key: ConfigKey, value: String) {
        let slot = match key {
            ConfigKey::OpenaiApiKey => &mut self.openai_api_key,
            ConfigKey::AzurePat => &mut self.azure_pat,
            ConfigKey::OrganizationUrl => &mut self.organization_url,
            ConfigKey::TargetBranch => &mut self.target_branch,
        };
        *slot = Some(value);
    }

    /// Return the credentials the pipeline cannot run without.
    ///
    /// Returns `(api_key, pat, organization_url)` or `Error::MissingConfig`
    /// naming every absent key, checked before any network activity.
    pub fn require(&self) -> Result<(&str, &str, &str)> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push(ConfigKey::OpenaiApiKey.to_string());
        }
        if self.azure_pat.is_none() {
            missing.push(ConfigKey::AzurePat.to_string());
        }
        if self.organization_url.is_none() {
            missing.push(ConfigKey::OrganizationUrl.to_string());
        }
        if !missing.is_empty() {
            return Err(Error::MissingConfig(missing));
        }
        Ok((
            self.openai_api_key.as_deref().unwrap_or_default(),
            self.azure_pat.as_deref().unwrap_or_default(),
            self.organization_url.as_deref().unwrap_or_default(),
        ))
    }
}

/// Get the path to the settings file.
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;
    Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load settings from disk.
///
/// Returns the default (empty) config if the file doesn't exist.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Load settings from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    Ok(config)
}

/// Save settings to disk.
///
/// Creates the config directory if it doesn't exist.
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(&config_path()?, config)
}

/// Save settings to an explicit path.
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Config(format!("failed to create {}: {e}", dir.display())))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;

    let content_with_header =
        format!("# adopr settings\n# Managed by `adopr config set` - edits here are preserved\n\n{content}");

    fs::write(path, content_with_header)
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config_path(temp: &TempDir) -> PathBuf {
        temp.path().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp_config_path(&temp)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp_config_path(&temp);
        assert!(!path.parent().unwrap().exists());

        save_config_to(&path, &Config::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let temp = TempDir::new().unwrap();
        let path = temp_config_path(&temp);

        let mut config = Config::default();
        config.set(ConfigKey::OpenaiApiKey, "sk-test".to_string());
        config.set(ConfigKey::TargetBranch, "develop".to_string());

        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.get(ConfigKey::OpenaiApiKey), Some("sk-test"));
        assert_eq!(loaded.get(ConfigKey::TargetBranch), Some("develop"));
        assert_eq!(loaded.get(ConfigKey::AzurePat), None);
    }

    #[test]
    fn test_file_contains_header_comment() {
        let temp = TempDir::new().unwrap();
        let path = temp_config_path(&temp);
        save_config_to(&path, &Config::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# adopr settings"));
    }

    #[test]
    fn test_require_names_all_missing_keys() {
        let config = Config::default();
        match config.require() {
            Err(Error::MissingConfig(missing)) => {
                assert_eq!(
                    missing,
                    vec!["openai-api-key", "azure-pat", "organization-url"]
                );
            }
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_require_ignores_optional_target_branch() {
        let mut config = Config::default();
        config.set(ConfigKey::OpenaiApiKey, "key".to_string());
        config.set(ConfigKey::AzurePat, "pat".to_string());
        config.set(
            ConfigKey::OrganizationUrl,
            "https://dev.azure.com/org".to_string(),
        );

        let (key, pat, org) = config.require().unwrap();
        assert_eq!(key, "key");
        assert_eq!(pat, "pat");
        assert_eq!(org, "https://dev.azure.com/org");
    }
}
