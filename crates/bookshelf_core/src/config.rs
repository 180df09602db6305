//! Connection settings persisted to a local config file.
//!
//! # Responsibility
//! - Load and save the database credential tuple.
//! - Resolve OS-appropriate default locations for config and data files.
//!
//! # Invariants
//! - File access happens only through an injected `ConfigProvider`; core
//!   logic never reads the environment or the filesystem ambiently.
//! - A missing config file is not an error; `load` returns `None`.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "db_connection.toml";
const DATABASE_FILE_NAME: &str = "bookshelf.db";

/// Database credential tuple. An operational setting, not a domain entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub username: String,
    pub password: String,
    pub host: String,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    NoConfigDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config file io error: {err}"),
            Self::Parse(err) => write!(f, "config file is not valid: {err}"),
            Self::Serialize(err) => write!(f, "config could not be serialized: {err}"),
            Self::NoConfigDir => {
                write!(f, "could not determine an OS config directory for this user")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::NoConfigDir => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialize(value)
    }
}

// On-disk shape: a `[Database]` section with capitalized keys.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(rename = "Database")]
    database: DatabaseSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DatabaseSection {
    username: String,
    password: String,
    host: String,
}

/// Injected seam for connection-config persistence.
pub trait ConfigProvider {
    /// Returns the stored config, or `None` when none has been saved yet.
    fn load(&self) -> ConfigResult<Option<ConnectionConfig>>;
    /// Overwrites the stored config.
    fn save(&self, config: &ConnectionConfig) -> ConfigResult<()>;
}

/// Path-addressed `ConfigProvider` over a TOML file.
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the OS config directory, e.g. `~/.config/bookshelf` on Linux.
    pub fn at_default_location() -> ConfigResult<Self> {
        Ok(Self::new(project_dirs()?.config_dir().join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> ConfigResult<Option<ConnectionConfig>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let file: ConfigFile = toml::from_str(&text)?;
        Ok(Some(ConnectionConfig {
            username: file.database.username,
            password: file.database.password,
            host: file.database.host,
        }))
    }

    fn save(&self, config: &ConnectionConfig) -> ConfigResult<()> {
        let file = ConfigFile {
            database: DatabaseSection {
                username: config.username.clone(),
                password: config.password.clone(),
                host: config.host.clone(),
            },
        };
        let text = toml::to_string(&file)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Default location of the embedded database file (OS data dir).
pub fn default_database_path() -> ConfigResult<PathBuf> {
    Ok(project_dirs()?.data_dir().join(DATABASE_FILE_NAME))
}

/// Default directory for rotating log files (OS data dir).
pub fn default_log_dir() -> ConfigResult<PathBuf> {
    Ok(project_dirs()?.data_dir().join("logs"))
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("", "", "bookshelf").ok_or(ConfigError::NoConfigDir)
}
