use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use shared::http::{make_boxed_error_response, make_text_response};
use sponsors::CacheError;
use thiserror::Error;

pub type HandlerBody = BoxBody<Bytes, GatewayError>;

/// Errors that can occur while serving a sponsor request
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("invalid sponsor index {0:?}")]
    InvalidIndex(String),

    #[error("no sponsor at index {0}")]
    NotFound(usize),

    #[error("no handler for path {0}")]
    NotImplemented(String),

    #[error("cache prime failed: {0}")]
    CachePrime(#[from] CacheError),

    #[error("could not build response: {0}")]
    Response(#[from] http::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidIndex(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            GatewayError::CachePrime(_) | GatewayError::Response(_) | GatewayError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain text response sent to the client. Internal details stay in the logs.
    pub fn into_response(self) -> Response<HandlerBody> {
        let status = self.status_code();
        match self {
            GatewayError::InvalidIndex(_) => {
                make_text_response(status, "Sponsor index must be a number\n")
            }
            GatewayError::NotFound(_) => make_text_response(status, "Not found\n"),
            GatewayError::CachePrime(_) => make_text_response(status, "Error fetching sponsors\n"),
            GatewayError::NotImplemented(_) | GatewayError::Response(_) | GatewayError::Io(_) => {
                make_boxed_error_response(status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use sponsors::SourceError;

    async fn body_text(response: Response<HandlerBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_responses() {
        let cases = vec![
            (
                GatewayError::InvalidIndex("abc".into()),
                StatusCode::BAD_REQUEST,
                "Sponsor index must be a number\n",
            ),
            (
                GatewayError::NotFound(150),
                StatusCode::NOT_FOUND,
                "Not found\n",
            ),
            (
                GatewayError::NotImplemented("/".into()),
                StatusCode::NOT_IMPLEMENTED,
                "Not Implemented\n",
            ),
            (
                GatewayError::CachePrime(CacheError::Fetch(SourceError::MissingCursor)),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching sponsors\n",
            ),
        ];

        for (error, status, body) in cases {
            assert_eq!(error.status_code(), status);
            let response = error.into_response();
            assert_eq!(response.status(), status);
            assert_eq!(body_text(response).await, body);
        }
    }
}
