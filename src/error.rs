//! Defines the app level error type and its conversion into JSON responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::constants::*;
use crate::models::{ErrorBody, ExpenseId, FieldError};

/// The errors that may occur while serving expense requests.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of a request body failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// The id embedded in an update payload differs from the id in the path.
    #[error("the id in the path ({path}) does not match the id in the body ({body})")]
    IdMismatch { path: ExpenseId, body: ExpenseId },

    /// The request body could not be parsed as an expense.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The expense id in the URL path is not a number.
    #[error("invalid expense id: {0}")]
    InvalidPath(String),

    /// The query string contained an invalid filter.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// No expense exists with the given id.
    #[error("expense {0} not found")]
    NotFound(ExpenseId),

    /// The expense exists but was modified by another write while this
    /// update was in flight. The client may retry.
    #[error("expense {0} was modified concurrently, try again")]
    Conflict(ExpenseId),

    /// An unexpected failure in the storage engine.
    ///
    /// The error string is only logged on the server. Clients receive a
    /// generic internal server error instead.
    #[error("database error: {0}")]
    Database(String),
}

impl From<libsql::Error> for Error {
    fn from(value: libsql::Error) -> Self {
        Error::Database(value.to_string())
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::IdMismatch { .. }
            | Error::InvalidBody(_)
            | Error::InvalidPath(_)
            | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Error::Validation(fields) => ErrorBody {
                error: ERR_VALIDATION.to_string(),
                fields,
            },
            Error::InvalidBody(message) => ErrorBody {
                error: ERR_INVALID_BODY.to_string(),
                fields: vec![FieldError::new("body", message)],
            },
            Error::Database(detail) => {
                tracing::error!("an unhandled SQL error occurred: {}", detail);
                ErrorBody::message(ERR_INTERNAL)
            }
            error => ErrorBody::message(error.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
