//! Where configuration and data live on disk, and how config files are read
//! and written.
//!
//! Configuration is looked up in the working directory first
//! (`cardgrid.json5`, then `cardgrid.json`), then in the user config
//! directory (`~/.config/cardgrid/config.json5`, then `config.json`). The
//! first existing file wins.
//!
//! Layout storage and the log file live under [`default_data_dir`].
//! Files are parsed as JSON5, which also accepts plain JSON. They are written
//! back as pretty-printed JSON.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Directory name under the platform config and data directories.
const APP_DIR: &str = "cardgrid";

/// File names tried in the working directory.
const LOCAL_FILE_NAMES: [&str; 2] = ["cardgrid.json5", "cardgrid.json"];

/// File names tried in the user config directory.
const USER_FILE_NAMES: [&str; 2] = ["config.json5", "config.json"];

/// Name of the log file inside the data directory.
const LOG_FILE_NAME: &str = "cardgrid.log";

/// Returns every location a config file may live at, in lookup order.
fn candidate_paths(user_config_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let local = LOCAL_FILE_NAMES.iter().map(PathBuf::from);
    let user = user_config_dir
        .map(|dir| dir.join(APP_DIR))
        .into_iter()
        .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(name)));
    local.chain(user).collect()
}

/// Finds the configuration file to load, if any.
///
/// # Examples
///
/// ```no_run
/// use cardgrid_config::persistence::find_config_file;
///
/// match find_config_file() {
///     Some(path) => println!("Using {}", path.display()),
///     None => println!("Using defaults"),
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    candidate_paths(dirs::config_dir())
        .into_iter()
        .find(|path| path.is_file())
}

/// Returns the data directory for layouts and logs.
///
/// This is typically `~/.local/share/cardgrid/` on Linux.
///
/// # Errors
///
/// Returns an error if the platform has no data directory.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the path of the log file inside `data_dir`.
#[must_use]
pub fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Reads and parses a JSON5 (or JSON) file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse as `T`.
///
/// # Examples
///
/// ```no_run
/// use cardgrid_config::Config;
/// use cardgrid_config::persistence::read_config_file;
///
/// # fn main() -> cardgrid_config::Result<()> {
/// let config: Config = read_config_file("cardgrid.json5")?;
/// # Ok(())
/// # }
/// ```
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json5::from_str(&content)?)
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the file cannot be
/// written.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    let content = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, content).map_err(write_error)
}
