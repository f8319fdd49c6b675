//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn classified failures into a status code and a JSON envelope.
//! The envelope never carries operator detail for internal failures.

use std::future::Future;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{Error, ErrorKind, TRACE_ID_HEADER};
use crate::logging::log_error;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message shown to clients in place of internal detail.
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Transport status for an error kind.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use registry::domain::ErrorKind;
/// use registry::inbound::http::error::status_for;
///
/// assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
/// assert_eq!(status_for(ErrorKind::Exists), StatusCode::INTERNAL_SERVER_ERROR);
/// ```
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        ErrorKind::Unauthorized | ErrorKind::NotAuthenticated | ErrorKind::ShouldLogout => {
            StatusCode::UNAUTHORIZED
        }
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-safe message for `err`.
pub fn external_message(err: &Error) -> &str {
    match err.kind() {
        ErrorKind::Internal | ErrorKind::Unknown => GENERIC_MESSAGE,
        _ if err.message().is_empty() => GENERIC_MESSAGE,
        _ => err.message(),
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: ErrorKind,
    pub message: String,
    pub details: Value,
}

impl From<&Error> for ErrorEnvelope {
    fn from(err: &Error) -> Self {
        let details = err
            .trace_id()
            .map_or(Value::Null, |id| json!({ "traceId": id }));
        Self {
            code: err.kind(),
            message: external_message(err).to_owned(),
            details,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        log_error(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::from(self))
    }
}

impl From<actix_web::Error> for Error {
    #[track_caller]
    fn from(err: actix_web::Error) -> Self {
        Error::internal(format!("actix error: {err}"))
    }
}

/// Run `fut` under a deadline. An expired deadline surfaces as `canceled`.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(elapsed) => Err(Error::internal(format!("request aborted: {elapsed}"))),
    }
}

#[cfg(test)]
mod tests;
