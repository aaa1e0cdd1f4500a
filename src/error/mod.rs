use jsonwebtoken::errors::Error as JwtError;
use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::Responder,
    serde::json::{json, Json},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A single field-level validation failure, reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path of the offending field, e.g. `questions[2].options[0]`.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status(Status::Unauthorized, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Status(Status::NotFound, message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Status(Status::Conflict, message.into())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    /// Convert the error into a JSON response of the shape
    /// `{"message": ..., "errors": [...]?}` with the appropriate status.
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match &self {
            Self::Db(_) | Self::Csv(_) | Self::Io(_) => Status::InternalServerError,
            Self::Jwt(_) => Status::Unauthorized,
            Self::Validation(_) => Status::BadRequest,
            Self::Status(status, _) => *status,
        };

        // Internal detail goes to the log, never into the body.
        if status == Status::InternalServerError {
            error!("Internal error handling {}: {}", req.uri(), self);
        }
        let body = match self {
            Self::Validation(errors) => json!({"message": "Validation failed", "errors": errors}),
            Self::Status(_, message) => json!({ "message": message }),
            Self::Jwt(_) => json!({"message": "Invalid or expired token"}),
            _ => json!({"message": "Server error"}),
        };

        let mut response = Json(body).respond_to(req)?;
        response.set_status(status);
        Ok(response)
    }
}
