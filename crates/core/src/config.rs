//! Config file discovery and loading
//!
//! CLI flags win over environment variables (both handled by clap), which win
//! over the TOML file found here, which wins over built-in defaults.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the config file came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// `--config` flag or the config env var
    Explicit(PathBuf),
    /// `./climate.toml`
    CurrentDir(PathBuf),
    /// `$XDG_CONFIG_HOME/climate-api/`
    XdgConfig(PathBuf),
    /// `/etc/climate-api/`
    System(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

/// First existing `filename` among `$env_var`, the working directory, the
/// XDG config dir and `/etc/climate-api/`
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    let candidates = [
        env::var(env_var).ok().map(|p| ConfigSource::Explicit(p.into())),
        Some(ConfigSource::CurrentDir(PathBuf::from(filename))),
        Some(ConfigSource::XdgConfig(
            xdg_dir("XDG_CONFIG_HOME", ".config").join(filename),
        )),
        Some(ConfigSource::System(
            PathBuf::from("/etc").join(APP_NAME).join(filename),
        )),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|source| source.path().is_some_and(|p| p.exists()))
        .unwrap_or(ConfigSource::Defaults)
}

/// Where the observations database is looked up when none is configured
/// and none sits in the working directory
pub fn get_xdg_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

/// `$var/climate-api`, else `$HOME/<home_relative>/climate-api`
fn xdg_dir(var: &str, home_relative: &str) -> PathBuf {
    match (env::var(var), env::var("HOME")) {
        (Ok(base), _) => PathBuf::from(base).join(APP_NAME),
        (Err(_), Ok(home)) => PathBuf::from(home).join(home_relative).join(APP_NAME),
        (Err(_), Err(_)) => PathBuf::from(home_relative).join(APP_NAME),
    }
}

/// Parse the TOML file behind `source`; `T::default()` when there is none
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    match source.path() {
        Some(path) => Ok(toml::from_str(&fs::read_to_string(path)?)?),
        None => Ok(T::default()),
    }
}
