use crate::errors::{GatewayError, HandlerBody};
use crate::handlers::{self, AVATAR_PREFIX, MARKDOWN_PREFIX, PROFILE_PREFIX};
use crate::metrics_defs::REQUEST_DURATION;
use hyper::body::Incoming;
use hyper::service::Service;
use hyper::{Method, Request, Response};
use shared::histogram;
use sponsors::SponsorCache;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Serves the markdown list and the avatar/profile redirects.
///
/// Every request primes the cache before it is routed. The handlers read the
/// snapshot returned by the prime, never the cache itself.
#[derive(Clone)]
pub struct SponsorService {
    cache: Arc<SponsorCache>,
    base_url: Arc<str>,
}

impl SponsorService {
    pub fn new(cache: Arc<SponsorCache>, base_url: &str) -> Self {
        SponsorService {
            cache,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    pub async fn respond(&self, method: &Method, path: &str) -> Response<HandlerBody> {
        let start = Instant::now();
        tracing::info!(%method, path, "Request received");

        let response = match self.route(path).await {
            Ok(response) => response,
            Err(err) => {
                let status = err.status_code();
                let elapsed = start.elapsed();
                if status.is_server_error() {
                    tracing::error!(%method, path, ?elapsed, error = %err, "Request failed");
                } else {
                    tracing::warn!(%method, path, ?elapsed, error = %err, "Request rejected");
                }
                err.into_response()
            }
        };

        let duration = start.elapsed();
        let status = response.status();
        histogram!(REQUEST_DURATION, "status" => status.as_str().to_owned())
            .record(duration.as_secs_f64());
        tracing::info!(
            %method,
            path,
            status = status.as_u16(),
            ?duration,
            "Request completed"
        );

        response
    }

    async fn route(&self, path: &str) -> Result<Response<HandlerBody>, GatewayError> {
        let snapshot = self.cache.ensure_fresh().await?;

        if path.starts_with(MARKDOWN_PREFIX) {
            handlers::markdown(&self.base_url)
        } else if path.starts_with(AVATAR_PREFIX) {
            handlers::avatar(path, &snapshot)
        } else if path.starts_with(PROFILE_PREFIX) {
            handlers::profile(path, &snapshot)
        } else {
            Err(GatewayError::NotImplemented(path.to_string()))
        }
    }
}

impl Service<Request<Incoming>> for SponsorService {
    type Response = Response<HandlerBody>;
    type Error = GatewayError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.respond(req.method(), req.uri().path()).await) })
    }
}
