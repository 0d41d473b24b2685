use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run_http_service<S, E>(host: &str, port: u16, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!(host, port, "Listening");
    serve(listener, service).await
}

/// Accepts connections on an already bound listener until accepting fails.
pub async fn serve<S, E>(listener: TcpListener, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let service_arc = Arc::new(service);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service_arc.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            if let Err(err) = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await
            {
                tracing::debug!(%peer_addr, error = %err, "Connection closed with error");
            }
        });
    }
}

/// Wraps a complete in-memory body.
pub fn full_body<T, E>(chunk: T) -> BoxBody<Bytes, E>
where
    T: Into<Bytes>,
    E: 'static,
{
    Full::new(chunk.into()).map_err(|e| match e {}).boxed()
}

/// Plain text response with the given status.
pub fn make_text_response<E: 'static>(
    status_code: StatusCode,
    message: impl Into<String>,
) -> Response<BoxBody<Bytes, E>> {
    let mut response = Response::new(full_body(message.into()));
    *response.status_mut() = status_code;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Plain text response carrying the canonical reason of the status code.
pub fn make_boxed_error_response<E: 'static>(
    status_code: StatusCode,
) -> Response<BoxBody<Bytes, E>> {
    let message = status_code
        .canonical_reason()
        .unwrap_or("an error occurred");

    make_text_response(status_code, format!("{message}\n"))
}
