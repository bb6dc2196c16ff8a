//! Bootstrap errors
//!
//! Failures while reading the config file, preparing the root folder or
//! opening the database. Per-request failures are typed in the service crate.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Root folder or database directory could not be created
    #[error("Cannot create folder {}: {source}", path.display())]
    Folder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file unreadable
    #[error("Cannot read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config content is not valid TOML for [`crate::config::TomlConfig`]
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Create `path` and its parents
pub(crate) fn create_folder(path: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::Folder {
        path: path.to_path_buf(),
        source,
    })
}
