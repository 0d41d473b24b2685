use serde::Deserialize;
use std::time::Duration;
use url::Url;

const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Connection settings for the GitHub GraphQL API.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct GitHub {
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,
    // Usually supplied through GITHUB_TOKEN rather than the config file.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHub {
    fn default() -> Self {
        GitHub {
            endpoint: default_endpoint(),
            token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GitHub {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Cache {
    /// Maximum age of the sponsor list before the next request refreshes it.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Cache {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_GRAPHQL_ENDPOINT).expect("default endpoint is a valid URL")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
