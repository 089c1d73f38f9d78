use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::counter::CounterError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Hit counter error: {0}")]
    Counter(#[from] CounterError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The counter error is logged verbatim; the client only sees a 500.
        tracing::error!("Internal error: {:?}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
            .into_response()
    }
}
