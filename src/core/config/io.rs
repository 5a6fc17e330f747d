use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tempfile::NamedTempFile;

use crate::core::config::{path_display, Config};
use crate::core::error::ConfigurationError;

impl Config {
    /// Loads the config file, or the defaults when it does not exist yet.
    pub fn load() -> Result<Config, ConfigurationError> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigurationError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents =
            fs::read_to_string(config_path).map_err(|source| ConfigurationError::Read {
                path: path_display(config_path),
                source,
            })?;
        toml::from_str(&contents).map_err(|source| ConfigurationError::Parse {
            path: path_display(config_path),
            source,
        })
    }

    pub fn save(&self) -> Result<PathBuf, ConfigurationError> {
        let path = Self::config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// Writes through a temp file in the same directory, then renames it
    /// over the target.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigurationError> {
        let write_error = |message: String| ConfigurationError::Write {
            path: path_display(config_path),
            message,
        };

        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(|e| write_error(e.to_string()))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;
        temp_file
            .as_file_mut()
            .sync_all()
            .map_err(|e| write_error(e.to_string()))?;
        temp_file
            .persist(config_path)
            .map_err(|e| write_error(e.error.to_string()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigurationError> {
        let proj_dirs = ProjectDirs::from("org", "shadowcoder", "shadowcoder")
            .ok_or(ConfigurationError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
