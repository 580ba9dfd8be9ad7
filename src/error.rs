use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::io;
use tracing::{error, warn};

/// Failures that end a single request. Each one renders as a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Error creating gzip reader: {0}")]
    GzipReader(#[source] io::Error),

    #[error("Error reading gzipped request body: {0}")]
    GzipBody(#[source] io::Error),

    #[error("Error reading request body")]
    BodyRead(#[source] axum::Error),

    #[error("Error parsing ORTB payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Error encoding response")]
    ResponseEncoding(#[source] io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::GzipReader(_)
            | AppError::GzipBody(_)
            | AppError::BodyRead(_)
            | AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::ResponseEncoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (
            status,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            format!("{}\n", self),
        )
            .into_response()
    }
}
