//! Configuration file discovery and loading
//!
//! Values are layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (handled by clap)
//! 3. Config file, located by [`find_config_file`]
//! 4. Built-in defaults

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where a configuration file was found
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given on the command line or through the config env var
    Explicit(PathBuf),
    /// Found in the current working directory
    CurrentDir(PathBuf),
    /// Found under `$XDG_CONFIG_HOME/station-climate/`
    XdgConfig(PathBuf),
    /// Found under `/etc/station-climate/`
    System(PathBuf),
    /// Nothing found, built-in defaults apply
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p.as_path()),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Locate a config file, checking `env_var` first, then the working
/// directory, the XDG config home and finally `/etc/station-climate/`.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Ok(path) = env::var(env_var) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return ConfigSource::Explicit(path);
        }
        debug!("{} points at missing file {}", env_var, path.display());
    }

    let candidates = [
        ConfigSource::CurrentDir(PathBuf::from(filename)),
        ConfigSource::XdgConfig(xdg_config_home().join(APP_NAME).join(filename)),
        ConfigSource::System(Path::new("/etc").join(APP_NAME).join(filename)),
    ];

    candidates
        .into_iter()
        .find(|source| source.path().is_some_and(Path::is_file))
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_home() -> PathBuf {
    match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg), _) => PathBuf::from(xdg),
        (Err(_), Ok(home)) => PathBuf::from(home).join(".config"),
        _ => PathBuf::from(".config"),
    }
}

/// Parse the TOML file behind `source`, or fall back to `T::default()` when
/// no file was found.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
