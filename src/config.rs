//! Configuration for a terminal instance

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of history rows
pub const DEFAULT_SCROLLBACK: usize = 1000;

/// Upper bound accepted for `scrollback`
pub const MAX_SCROLLBACK: usize = 100_000;

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Width in columns
    pub cols: usize,
    /// Height in rows
    pub rows: usize,
    /// Maximum scrollback rows
    pub scrollback: usize,
    /// Colorscheme file applied at construction
    pub colorscheme: Option<PathBuf>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            scrollback: DEFAULT_SCROLLBACK,
            colorscheme: None,
        }
    }
}

impl TerminalConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TerminalConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check bounds
    pub fn validate(&self) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(Error::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.scrollback > MAX_SCROLLBACK {
            return Err(Error::Config(format!(
                "scrollback must be at most {}, got {}",
                MAX_SCROLLBACK, self.scrollback
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TerminalConfig::default();
        assert_eq!((config.cols, config.rows), (80, 24));
        assert_eq!(config.scrollback, 1000);
        assert!(config.colorscheme.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = TerminalConfig::default();
        config.scrollback = MAX_SCROLLBACK;
        assert!(config.validate().is_ok());

        config.scrollback = MAX_SCROLLBACK + 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = TerminalConfig {
            cols: 0,
            ..TerminalConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDimensions { cols: 0, rows: 24 })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TerminalConfig = serde_json::from_str(r#"{"cols": 132}"#).unwrap();
        assert_eq!(config.cols, 132);
        assert_eq!(config.rows, 24);
        assert_eq!(config.scrollback, DEFAULT_SCROLLBACK);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = TerminalConfig {
            cols: 100,
            rows: 30,
            scrollback: 500,
            colorscheme: Some(PathBuf::from("/tmp/scheme.conf")),
        };
        config.save(&path).unwrap();
        assert_eq!(TerminalConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"scrollback": 200000}"#).unwrap();
        assert!(matches!(TerminalConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(TerminalConfig::load(&path), Err(Error::Json(_))));
    }
}
