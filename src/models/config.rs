use std::{env, path::PathBuf};

use thiserror::Error;

const DEFAULT_DATA_FILE: &str = "botdata.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),
}

#[derive(Debug)]
pub struct Config {
    pub discord_token: String,
    pub data_file: PathBuf,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))?;

        Ok(Config {
            discord_token,
            data_file: lookup("DATA_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_FILE), PathBuf::from),
            debug: lookup("DEBUG").is_some_and(|debug| debug == "true"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_is_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string())
        );
        assert!(config_from(&[("DISCORD_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply_when_only_the_token_is_set() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.data_file, PathBuf::from("botdata.json"));
        assert!(!config.debug);
    }

    #[test]
    fn optional_values_are_read() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DATA_FILE", "/data/state.json"),
            ("DEBUG", "true"),
        ])
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/data/state.json"));
        assert!(config.debug);
    }
}
