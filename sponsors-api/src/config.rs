use gateway::config::{Config as GatewayConfig, ValidationError};
use serde::Deserialize;
use sponsors::config::{Cache as CacheConfig, GitHub as GitHubConfig};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Settings taken from the command line or the environment. They win over
/// the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub port: Option<u16>,
    pub cache_ttl: Option<Duration>,
    pub github_token: Option<String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Loads the file if one is given, applies the overrides and validates the result.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply(overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.gateway.url = url;
        }
        if let Some(port) = overrides.port {
            self.gateway.listener.port = port;
        }
        // The cache works in whole seconds.
        if let Some(ttl) = overrides.cache_ttl {
            self.cache.ttl_secs = ttl.as_secs();
        }
        if let Some(token) = overrides.github_token {
            self.github.token = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;

        if self.github.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(())
    }
}

fn default_metrics_prefix() -> String {
    "sponsors".into()
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("no GitHub token configured, set GITHUB_TOKEN")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://key@sentry.example.com/1
            gateway:
                url: https://sponsors.example.com
                listener:
                    host: 0.0.0.0
                    port: 8080
                admin_listener:
                    host: 127.0.0.1
                    port: 8081
            github:
                token: file-token
                timeout_secs: 10
            cache:
                ttl_secs: 600
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::load(Some(tmp.path()), Overrides::default()).expect("load config");

        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
        assert_eq!(metrics.prefix, "sponsors");
        assert_eq!(
            config.common.logging.expect("logging config").sentry_dsn,
            "https://key@sentry.example.com/1"
        );
        assert_eq!(config.gateway.url, "https://sponsors.example.com");
        assert_eq!(config.gateway.listener.port, 8080);
        assert_eq!(config.github.token, "file-token");
        assert_eq!(config.github.timeout_secs, 10);
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let yaml = r#"
            gateway:
                url: https://sponsors.example.com
            github:
                token: file-token
            "#;
        let tmp = write_tmp_file(yaml);
        let overrides = Overrides {
            url: Some("http://localhost:4000".into()),
            port: Some(4000),
            cache_ttl: Some(Duration::from_secs(60)),
            github_token: Some("env-token".into()),
        };
        let config = Config::load(Some(tmp.path()), overrides).expect("load config");

        assert_eq!(config.gateway.url, "http://localhost:4000");
        assert_eq!(config.gateway.listener.port, 4000);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.github.token, "env-token");
    }

    #[test]
    fn test_defaults_without_file() {
        let overrides = Overrides {
            github_token: Some("token".into()),
            ..Overrides::default()
        };
        let config = Config::load(None, overrides).expect("load config");

        assert_eq!(config.gateway.url, "http://localhost:3000");
        assert_eq!(config.gateway.listener.host, "0.0.0.0");
        assert_eq!(config.gateway.listener.port, 3000);
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert!(config.common.metrics.is_none());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            Config::load(None, Overrides::default()),
            Err(ConfigError::MissingToken)
        ));

        let overrides = Overrides {
            port: Some(0),
            github_token: Some("token".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            Config::load(None, overrides),
            Err(ConfigError::ValidationError(ValidationError::InvalidPort))
        ));

        let tmp = write_tmp_file("gateway: [not, a, map]");
        assert!(matches!(
            Config::load(Some(tmp.path()), Overrides::default()),
            Err(ConfigError::ParseError(_))
        ));

        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/sponsors.yaml")),
            Err(ConfigError::LoadError(_))
        ));
    }
}
