use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Settings read from the JSON file given with `--config`. Missing keys fall
/// back to the defaults below; command line flags win over both.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub api_server_hostname: String,
    pub api_server_port: u16,
    pub latency_ms: u64,
    pub seed: bool,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_server_hostname: "0.0.0.0".to_string(),
            api_server_port: 8080,
            latency_ms: 500,
            seed: true,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            log_level: "debug".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.api_server_hostname, self.api_server_port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid API server address {}:{}",
                    self.api_server_hostname, self.api_server_port
                )
            })
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn log_level(&self) -> anyhow::Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown log level {:?}", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_server_port": 9090, "seed": false}}"#).unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_server_port, 9090);
        assert!(!config.seed);
        assert_eq!(config.latency(), Duration::from_millis(500));
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:9090");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"geocoder_key": "abc"}}"#).unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ServerConfig::load(Some(Path::new("/nonexistent/explorer.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        let config = ServerConfig {
            log_level: "WARN".to_string(),
            ..Default::default()
        };
        assert_eq!(config.log_level().unwrap(), Level::WARN);

        let config = ServerConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.log_level().is_err());
    }
}
