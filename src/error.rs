use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The challenge sent alongside every 401.
pub const CHALLENGE: &str = r#"Bearer realm="Restricted""#;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // 401 carries the WWW-Authenticate challenge and no body.
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, CHALLENGE)],
            )
                .into_response(),
        }
    }
}
