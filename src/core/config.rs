use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_namespace() -> String {
    "famfin".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Namespace under which all documents are filed. Two configs with
    /// different namespaces share nothing, even on the same data path.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub currency: String,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "famfin")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "famfin")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
namespace: "our-family"
currency: "EUR"
data_path: "/tmp/famfin-data"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.namespace, "our-family");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/famfin-data"));
    }

    #[test]
    fn test_namespace_defaults_when_missing() {
        let yaml_str = r#"
currency: "USD"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.namespace, "famfin");
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_custom_data_path_wins() {
        let config = AppConfig {
            namespace: "famfin".to_string(),
            currency: "USD".to_string(),
            data_path: Some("/tmp/elsewhere".to_string()),
        };
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/elsewhere")
        );
    }
}
