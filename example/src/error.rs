use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("only POST is allowed, got {0}")]
    MethodNotAllowed(String),
    #[error("missing or wrong credentials")]
    Unauthorized,
    #[error("login payload is not a json object: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl LoginError {
    pub fn status(&self) -> StatusCode {
        match self {
            LoginError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            LoginError::Unauthorized => StatusCode::UNAUTHORIZED,
            LoginError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}
