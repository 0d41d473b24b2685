use crate::http::{full_body, make_boxed_error_response};
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

/// Liveness and readiness endpoints served on the admin listener.
///
/// `/health` always answers `ok`. `/ready` answers `ok` once `is_ready`
/// returns true and 503 before that.
pub struct AdminService<F, E> {
    is_ready: F,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> AdminService<F, E>
where
    F: Fn() -> bool,
{
    pub fn new(is_ready: F) -> Self {
        Self {
            is_ready,
            _error: PhantomData,
        }
    }

    fn respond(&self, path: &str) -> Response<BoxBody<Bytes, E>>
    where
        E: 'static,
    {
        match path {
            "/health" => Response::new(full_body("ok\n")),
            "/ready" => match (self.is_ready)() {
                true => Response::new(full_body("ok\n")),
                false => make_boxed_error_response(StatusCode::SERVICE_UNAVAILABLE),
            },
            _ => make_boxed_error_response(StatusCode::NOT_FOUND),
        }
    }
}

impl<F, E> Service<Request<Incoming>> for AdminService<F, E>
where
    F: Fn() -> bool + Send + Sync + 'static,
    E: Send + 'static,
{
    type Response = Response<BoxBody<Bytes, E>>;
    type Error = E;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let res = self.respond(req.uri().path());
        Box::pin(async move { Ok(res) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::serve;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::net::TcpListener;

    #[derive(thiserror::Error, Debug)]
    enum TestError {
        #[error("io error: {0}")]
        Io(#[from] std::io::Error),
    }

    #[tokio::test]
    async fn test_admin_endpoints() {
        let ready = Arc::new(AtomicBool::new(false));
        let ready_clone = ready.clone();
        let service =
            AdminService::<_, TestError>::new(move || ready_clone.load(Ordering::Relaxed));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(serve(listener, service));

        let base = format!("http://127.0.0.1:{port}");
        let client = reqwest::Client::new();

        let health = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.status(), 200);
        assert_eq!(health.text().await.unwrap(), "ok\n");

        let not_ready = client.get(format!("{base}/ready")).send().await.unwrap();
        assert_eq!(not_ready.status(), 503);

        ready.store(true, Ordering::Relaxed);
        let is_ready = client.get(format!("{base}/ready")).send().await.unwrap();
        assert_eq!(is_ready.status(), 200);

        let missing = client.get(format!("{base}/metrics")).send().await.unwrap();
        assert_eq!(missing.status(), 404);
    }
}
