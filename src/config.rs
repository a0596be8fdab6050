use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "seo-studio";

pub const KEYS: [&str; 3] = ["data_dir", "mock_latency_ms", "log_file"];

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where saved results and exports live. Defaults to the platform data dir.
    pub data_dir: Option<String>,
    /// Artificial delay added to every mock backend call.
    pub mock_latency_ms: u64,
    /// Log file used while the TUI owns the terminal.
    pub log_file: Option<String>,
}

impl Config {
    /// A missing config file is not an error; the defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = get_config_file_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = get_config_file_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = toml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&config_path, content).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "data_dir" => self.data_dir = non_empty(value),
            "mock_latency_ms" => {
                self.mock_latency_ms = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key.to_string(), value.to_string()))?;
            }
            "log_file" => self.log_file = non_empty(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Empty string for unset optional values.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "data_dir" => Ok(self.data_dir.clone().unwrap_or_default()),
            "mock_latency_ms" => Ok(self.mock_latency_ms.to_string()),
            "log_file" => Ok(self.log_file.clone().unwrap_or_default()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(dirs::data_dir().ok_or(ConfigError::DataDirNotFound)?.join(APP_DIR)),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(file) => Ok(PathBuf::from(file)),
            None => Ok(self.data_dir()?.join("seo-studio.log")),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() { None } else { Some(value.to_string()) }
}

fn get_config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    Ok(config_dir.join(APP_DIR).join("config.toml"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config directory")]
    ConfigDirNotFound,
    #[error("Could not find a data directory; run 'seo-studio config set data_dir <path>'")]
    DataDirNotFound,
    #[error("Unknown configuration key '{0}'. Supported keys: data_dir, mock_latency_ms, log_file")]
    UnknownKey(String),
    #[error("Invalid value '{1}' for '{0}'")]
    InvalidValue(String, String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Failed to parse config file: {0}")]
    ParseError(String),
    #[error("Failed to serialize config: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mock_latency_ms, 0);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse("mock_latency_ms = 250\n").unwrap();
        assert_eq!(config.mock_latency_ms, 250);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        let err = Config::parse("mock_latency_ms = \"soon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_set_and_get_known_keys() {
        let mut config = Config::default();
        config.set("data_dir", "/tmp/seo").unwrap();
        config.set("mock_latency_ms", " 40 ").unwrap();

        assert_eq!(config.get("data_dir").unwrap(), "/tmp/seo");
        assert_eq!(config.get("mock_latency_ms").unwrap(), "40");
        assert_eq!(config.get("log_file").unwrap(), "");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/seo"));
        assert_eq!(config.log_path().unwrap(), PathBuf::from("/tmp/seo/seo-studio.log"));
    }

    #[test]
    fn test_set_blank_clears_optional_value() {
        let mut config = Config::default();
        config.set("log_file", "/tmp/a.log").unwrap();
        config.set("log_file", "  ").unwrap();
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_unknown_key_and_bad_value() {
        let mut config = Config::default();
        assert!(matches!(config.set("file_path", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            config.set("mock_latency_ms", "fast"),
            Err(ConfigError::InvalidValue(_, _))
        ));
        assert!(config.get("theme").is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = Config::default();
        config.set("data_dir", "/srv/seo").unwrap();
        config.set("mock_latency_ms", "10").unwrap();

        let text = toml::to_string(&config).unwrap();

        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
