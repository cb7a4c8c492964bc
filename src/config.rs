/// Application settings
///
/// Resolution order (later wins):
/// 1. Built-in defaults: `<data dir>/tattoo-studio/studio.db`
///    - Linux: ~/.local/share/tattoo-studio
///    - macOS: ~/Library/Application Support/tattoo-studio
///    - Windows: %APPDATA%\tattoo-studio
/// 2. `TATTOO_STUDIO_DATA_DIR` environment variable (moves the whole directory)
/// 3. `studio.toml` inside the data directory

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TATTOO_STUDIO_DATA_DIR";

/// Name of the optional settings file inside the data directory
pub const SETTINGS_FILE: &str = "studio.toml";

const APP_DIR: &str = "tattoo-studio";
const DEFAULT_DATABASE_FILE: &str = "studio.db";

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Directory holding the database and settings file
    pub data_dir: PathBuf,
    /// Database file name, relative to `data_dir`
    pub database_file: String,
    /// Largest serialized collection accepted by the database (None = unlimited)
    pub max_value_bytes: Option<usize>,
}

/// On-disk shape of `studio.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    database_file: Option<String>,
    max_value_bytes: Option<usize>,
}

impl StudioConfig {
    /// Defaults rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            max_value_bytes: None,
        }
    }

    /// Resolve settings from the platform defaults, the environment and `studio.toml`
    pub fn load() -> Result<Self, ConfigError> {
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_data_dir()?,
        };
        Self::load_from(data_dir)
    }

    /// Resolve settings rooted at an explicit data directory
    pub fn load_from(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::with_data_dir(data_dir);
        let settings_path = config.data_dir.join(SETTINGS_FILE);

        if settings_path.exists() {
            let settings = read_settings(&settings_path)?;
            if let Some(file) = settings.database_file {
                config.database_file = file;
            }
            if settings.max_value_bytes.is_some() {
                config.max_value_bytes = settings.max_value_bytes;
            }
            tracing::info!("⚙️  Loaded settings from {}", settings_path.display());
        }

        Ok(config)
    }

    /// Full path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    fn default_data_dir() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoDataDir)?;
        path.push(APP_DIR);
        Ok(path)
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
