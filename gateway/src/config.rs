use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Invalid base URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Public base URL of this service, used for the links in the markdown list
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub listener: Listener,
    /// Serves /health and /ready when set
    #[serde(default)]
    pub admin_listener: Option<Listener>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: default_url(),
            listener: Listener::default(),
            admin_listener: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        if let Some(admin_listener) = &self.admin_listener {
            admin_listener.validate()?;
        }

        Url::parse(&self.url).map_err(|e| ValidationError::InvalidUrl(self.url.clone(), e))?;

        Ok(())
    }
}

fn default_url() -> String {
    DEFAULT_URL.into()
}
