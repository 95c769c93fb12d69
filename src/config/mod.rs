use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "repokeeper.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the database file.
    pub data_dir: PathBuf,
    pub db_file: String,
    /// Default tracing filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Config {
    /// Loads configuration from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Loads `path` when given, otherwise `repokeeper.toml` in the working
    /// directory if it exists, otherwise the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            db_file: "repokeeper.db".to_string(),
            log_filter: "repokeeper=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_db_path() {
        let config = Config::default();
        assert_eq!(config.db_path(), PathBuf::from("./data/repokeeper.db"));
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("repokeeper.toml");
        fs::write(&path, "data_dir = \"/srv/repokeeper\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/repokeeper"));
        assert_eq!(config.db_file, "repokeeper.db");
        assert_eq!(config.log_filter, "repokeeper=info");
    }

    #[test]
    fn test_load_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "data_dir = [").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_discover_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            Config::discover(Some(&missing)),
            Err(Error::Io(_))
        ));
    }
}
