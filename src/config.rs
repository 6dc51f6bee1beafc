use eyre::{Error, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "rdirectory.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub dataset: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_owned(),
            port: 5000,
            dataset: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout_secs: 5,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load the configuration from `file_name`, or from `rdirectory.toml` if it
    /// exists when no file is given. Defaults are used otherwise.
    pub fn load(file_name: Option<&Path>) -> Result<Config, Error> {
        match file_name {
            Some(file_name) => Self::load_from(file_name),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Config::default()),
        }
    }

    fn load_from(file_name: &Path) -> Result<Config, Error> {
        let content = std::fs::read_to_string(file_name).wrap_err_with(|| {
            format!("cannot load configuration file {}", file_name.display())
        })?;
        toml::from_str(&content).wrap_err_with(|| {
            format!("cannot parse configuration file {}", file_name.display())
        })
    }
}
