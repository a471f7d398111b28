//! Error handler for profpoll.
//!
//! Malformed input, wrong credentials and unknown ids are all handled
//! inside their handlers and surfaced as form hints or coded payloads;
//! what remains here are genuine server faults.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::router::{CODE_SERVER_FAULT, Outcome};

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("SQL request failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("could not read export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("could not render verification image: {0}")]
    Render(#[from] crate::captcha::RenderError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "server returned 500 status");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Outcome::new(CODE_SERVER_FAULT, "internal server error")),
        )
            .into_response()
    }
}
