use std::path::Path;

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Heading shown on every page
    #[serde(default = "default_title")]
    pub title: String,

    /// Include dotfiles in listings
    #[serde(default = "default_show_hidden")]
    pub show_hidden: bool,
}

fn default_title() -> String {
    "Shared Files".to_string()
}

fn default_show_hidden() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            show_hidden: default_show_hidden(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.title, "Shared Files");
        assert!(config.show_hidden);
    }

    #[test]
    fn test_from_file_partial() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sharedir.toml");
        std::fs::write(&path, "title = \"Team Drop Box\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.title, "Team Drop Box");
        assert!(config.show_hidden);
    }
}
