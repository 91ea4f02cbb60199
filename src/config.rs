use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::richtext::history::DEFAULT_HISTORY_LIMIT;
use crate::richtext::input::Input;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Folio";
const APPLICATION: &str = "folio";
const CONFIG_FILE_NAME: &str = "folio.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Editor settings read from `folio.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept
    pub history_limit: usize,
    /// Extra host key codes mapped onto critical inputs, e.g. `NumpadEnter = "Enter"`
    pub keys: HashMap<String, Input>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            history_limit: DEFAULT_HISTORY_LIMIT,
            keys: HashMap::new(),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl EditorConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path, or else from the per-user config
    /// directory. Problems with the per-user file only produce a warning.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let Some(path) = config_file_path() else {
            return Ok(Self::default());
        };
        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!("{err}; using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self).map_err(|err| {
            io::Error::new(ErrorKind::Other, format!("toml serialization error: {err}"))
        })?;

        fs::write(path, toml)
    }
}
