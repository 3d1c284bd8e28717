//! Error types shared by the upstream clients and the HTTP layer.
//!
//! Every failure a request can hit is one of the variants below. The HTTP
//! layer never inspects error messages; it only asks an error for its
//! [`StatusCode`] and renders `{"detail": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Request-scoped failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input the upstream contract cannot accept (e.g. a 3-letter country code).
    #[error("{0}")]
    InvalidArgument(String),

    /// A path or query parameter failed its declared constraints.
    #[error("{0}")]
    Validation(String),

    /// A filter matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// Transport failure, timeout, or non-2xx status from an upstream.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// The upstream answered with an explicit error envelope.
    #[error("{0}")]
    UpstreamError(String),

    /// The upstream answered, but not in the shape we deserialize.
    #[error("Unexpected upstream response: {0}")]
    UpstreamFormat(String),

    /// Any of the above, prefixed with what the handler was doing.
    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::UpstreamUnavailable(_) | Error::UpstreamError(_) | Error::UpstreamFormat(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Context { source, .. } => source.status_code(),
        }
    }

    /// Prefix server-side failures with a description of the operation.
    ///
    /// Client errors (400/404/422) are returned untouched so their message
    /// stays exactly what the caller needs to fix.
    pub fn context(self, context: &'static str) -> Self {
        if self.status_code().is_server_error() {
            Error::Context {
                context,
                source: Box::new(self),
            }
        } else {
            self
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Extension for attaching handler context to a [`Result`].
pub trait ResultExt<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| e.context(context))
    }
}
