mod config;
mod observability;

use clap::Parser;
use config::{Config, Overrides};
use gateway::errors::GatewayError;
use sponsors::{GitHubSource, SourceError, SponsorCache};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

/// Serves the sponsors of a GitHub account as markdown and image redirects.
#[derive(Parser, Debug)]
#[command(name = "sponsors-api")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, env = "SPONSORS_CONFIG")]
    config: Option<PathBuf>,

    /// Public base URL used in the markdown links
    #[arg(long, env = "URL")]
    url: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Age before the sponsor list is fetched again, e.g. "1h" or "90s"
    #[arg(long, env = "CACHE_TTL", value_parser = humantime::parse_duration)]
    cache_ttl: Option<Duration>,

    /// GitHub token used for the GraphQL API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            url: cli.url,
            port: cli.port,
            cache_ttl: cli.cache_ttl,
            github_token: cli.github_token,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error("could not create sponsor source: {0}")]
    Source(#[from] SourceError),
    #[error("server error: {0}")]
    Gateway(#[from] GatewayError),
}

fn main() {
    let mut cli = Cli::parse();
    let config_path = cli.config.take();

    let config = match Config::load(config_path.as_deref(), cli.into()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let _sentry_guard = match observability::init_logging(config.common.logging.as_ref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    if let Err(err) = observability::init_metrics(config.common.metrics.as_ref()) {
        tracing::error!(error = %err, "Could not set up metrics");
        process::exit(1);
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!(error = %err, "Could not start runtime");
            process::exit(1);
        }
    };

    if let Err(err) = rt.block_on(run(config)) {
        tracing::error!(error = %err, "Exiting");
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), RunError> {
    let source = GitHubSource::new(&config.github)?;
    let cache = Arc::new(SponsorCache::new(Arc::new(source), config.cache.ttl()));

    tracing::info!(
        url = %config.gateway.url,
        ttl_secs = config.cache.ttl_secs,
        "Starting sponsors-api"
    );

    gateway::run(config.gateway, cache).await?;
    Ok(())
}
