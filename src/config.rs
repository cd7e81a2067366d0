use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::client::DEFAULT_BASE_URL;
use crate::error::{Result, UsersError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| UsersError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| UsersError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "users")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(UsersError::NoConfigDir)
    }

    /// Collection URL: explicit flag, then USERS_API_URL, then config file, then the public demo API
    pub fn resolve_base_url(&self, explicit: Option<&str>) -> String {
        self.resolve_base_url_with(explicit, std::env::var("USERS_API_URL").ok())
    }

    fn resolve_base_url_with(&self, explicit: Option<&str>, env: Option<String>) -> String {
        explicit
            .map(String::from)
            .or(env)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Request timeout with env var taking precedence over config file
    pub fn timeout(&self) -> Result<Duration> {
        self.timeout_with(std::env::var("USERS_TIMEOUT_SECS").ok())
    }

    fn timeout_with(&self, env: Option<String>) -> Result<Duration> {
        let secs = match env {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| UsersError::InvalidValue {
                    name: "USERS_TIMEOUT_SECS",
                    value,
                })?,
            None => self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        Ok(Duration::from_secs(secs))
    }
}
