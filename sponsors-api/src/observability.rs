use crate::config::{LoggingConfig, MetricsConfig};
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use shared::metrics_defs::describe_all;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("could not build statsd recorder: {0}")]
    Statsd(#[from] StatsdError),
    #[error("a metrics recorder is already installed")]
    RecorderInstalled,
    #[error("could not install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the tracing subscriber, with Sentry reporting when a DSN is
/// configured. The returned guard flushes Sentry on drop.
pub fn init_logging(
    logging: Option<&LoggingConfig>,
) -> Result<Option<sentry::ClientInitGuard>, ObservabilityError> {
    let guard = logging.map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let sentry_layer = guard
        .as_ref()
        .map(|_| sentry::integrations::tracing::layer());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .try_init()?;

    Ok(guard)
}

/// Sends metrics to statsd when configured. Without a recorder every metric
/// call is a no-op.
pub fn init_metrics(metrics_config: Option<&MetricsConfig>) -> Result<(), ObservabilityError> {
    let Some(metrics_config) = metrics_config else {
        tracing::info!("No metrics backend configured");
        return Ok(());
    };

    let recorder = StatsdBuilder::from(
        metrics_config.statsd_host.as_str(),
        metrics_config.statsd_port,
    )
    .build(Some(metrics_config.prefix.as_str()))?;

    metrics::set_global_recorder(recorder).map_err(|_| ObservabilityError::RecorderInstalled)?;

    describe_all(sponsors::metrics_defs::ALL_METRICS);
    describe_all(gateway::metrics_defs::ALL_METRICS);

    tracing::info!(
        host = %metrics_config.statsd_host,
        port = metrics_config.statsd_port,
        "Sending metrics to statsd"
    );

    Ok(())
}
