pub mod config;
pub mod errors;
mod handlers;
pub mod metrics_defs;
mod placeholder;
pub mod service;

use errors::GatewayError;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use sponsors::SponsorCache;
use std::sync::Arc;

pub use service::SponsorService;

/// Serves the sponsor endpoints, and the admin endpoints when an admin
/// listener is configured. Only returns on a listener error.
pub async fn run(config: config::Config, cache: Arc<SponsorCache>) -> Result<(), GatewayError> {
    let sponsor_service = SponsorService::new(cache.clone(), &config.url);
    let sponsor_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        sponsor_service,
    );

    match &config.admin_listener {
        Some(admin_listener) => {
            let admin_service = AdminService::new(move || cache.is_ready());
            let admin_task =
                run_http_service(&admin_listener.host, admin_listener.port, admin_service);
            tokio::try_join!(sponsor_task, admin_task)?;
        }
        None => sponsor_task.await?,
    }

    Ok(())
}
