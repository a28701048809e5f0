//! Configuration file support.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables of the form `BOOK_FINDER__<SECTION>__<KEY>`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! search_endpoint = "https://openlibrary.org/search.json"
//! cover_endpoint = "https://covers.openlibrary.org"
//! timeout_seconds = 30
//!
//! [search]
//! debounce_ms = 600
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! file = "/tmp/book-finder.log"
//! ```

use std::path::{Path, PathBuf};

use super::{Config, ConfigError, ENV_PREFIX};

const LOCAL_CONFIG_FILE: &str = "book-finder.toml";
const APP_DIR: &str = "book-finder";

/// Per-user config location (`<config dir>/book-finder/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Log file used by the interactive UI (`<cache dir>/book-finder/book-finder.log`)
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("book-finder.log"))
}

/// First existing config file: `./book-finder.toml`, then the per-user file
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|path| path.is_file())
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Write configuration as TOML, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
