use std::path::PathBuf;

use eyre::Context;

use crate::logging::Flags;

pub const PREFIX_VAR: &str = "LINELOG_PREFIX";
pub const FLAGS_VAR: &str = "LINELOG_FLAGS";

pub trait ConfigManager: Sized + Clone + Send + Sync {
    fn get_log_path(&self) -> eyre::Result<String>;
}

#[derive(Default, Clone, Debug)]
pub struct LocalConfigManager {}

impl LocalConfigManager {
    pub fn new() -> Self {
        Self {}
    }
}

// NOTE: falls back to the current directory when HOME is unset.
#[cfg(not(target_os = "windows"))]
pub fn home_dir() -> PathBuf {
    std::env::var("HOME").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

#[cfg(target_os = "windows")]
pub fn home_dir() -> PathBuf {
    std::env::var("USERPROFILE").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

pub fn data_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map_or_else(|_| home_dir().join(".local").join("share"), PathBuf::from);

    data_dir.join("linelog")
}

impl ConfigManager for LocalConfigManager {
    fn get_log_path(&self) -> eyre::Result<String> {
        let mut log_path = data_dir();
        log_path.push("linelog.log");

        match log_path.to_str() {
            Some(path) => Ok(path.to_string()),
            None => Err(eyre::eyre!("Can't construct log path in data dir!")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prefix: String,
    pub flags: Flags,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            flags: Flags::STD,
        }
    }
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let mut config = Self::default();

        if let Some(prefix) = lookup(PREFIX_VAR) {
            config.prefix = prefix;
        }

        if let Some(flags) = lookup(FLAGS_VAR) {
            config.flags = flags
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", FLAGS_VAR, flags))?;
        }

        Ok(config)
    }
}
