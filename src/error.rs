use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::jsonwebtoken::errors::Error as JsonWebTokenError;
use crate::response::{ErrorResponse, ValidationErrorResponse};
use crate::thiserror::Error as ThisError;
use crate::validation::ValidationErrors;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("jwt error: {0}")]
    JWTError(#[from] JsonWebTokenError),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("missing or malformed jwt")]
    MissingToken,

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,
}

impl Error {
    /// The message a client is allowed to see. Storage failures stay opaque.
    fn public_message(&self) -> String {
        match self {
            Error::BadRequest(msg) => msg.clone(),
            Error::JsonError(e) => e.to_string(),
            Error::ValidationError(e) => e.to_string(),
            Error::MissingToken => "Missing or malformed JWT".into(),
            Error::JWTError(_) => "Invalid or expired JWT".into(),
            Error::Unauthorized => "Unauthorized".into(),
            Error::NotFound | Error::DatabaseError(sqlx::Error::RowNotFound) => "Not found".into(),
            Error::DatabaseError(_) => "Internal error".into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::ValidationError(_) | Error::BadRequest(_) | Error::JsonError(_) => StatusCode::BAD_REQUEST,
            Error::MissingToken | Error::JWTError(_) | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotFound | Error::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Error::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {:?}", self);
        }
        match self {
            Error::ValidationError(errors) => HttpResponse::build(status).json(ValidationErrorResponse::new(errors)),
            _ => HttpResponse::build(status).json(ErrorResponse::new(self.public_message())),
        }
    }
}
