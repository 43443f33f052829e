use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use villa_core::errors::{ErrorKind as CoreKind, FieldError, VillaError};

#[derive(Error, Debug)]
#[error(transparent)]
pub struct AppError(Box<ErrorKind>);

#[derive(Error, Debug)]
#[error(transparent)]
pub enum ErrorKind {
    #[error(transparent)]
    Villa(#[from] VillaError),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    CompareCapacity(&'static str),
    #[error("Invalid query parameter {name}: {value}")]
    InvalidQuery { name: &'static str, value: String },
}

impl<E> From<E> for AppError
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        AppError(Box::new(ErrorKind::from(err)))
    }
}

impl AppError {
    pub fn invalid_query(name: &'static str, value: &str) -> Self {
        ErrorKind::InvalidQuery {
            name,
            value: value.to_string(),
        }
        .into()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    fn get_codes(&self) -> (StatusCode, u16) {
        match &*self.0 {
            ErrorKind::Villa(err) => match err.kind() {
                CoreKind::Validation(_) => (StatusCode::BAD_REQUEST, 40001),
                CoreKind::InvalidCredentials => (StatusCode::UNAUTHORIZED, 40101),
                CoreKind::NotAuthenticated => (StatusCode::UNAUTHORIZED, 40102),
                CoreKind::PropertyNotFound(_) => (StatusCode::NOT_FOUND, 40401),
                CoreKind::BlogNotFound(_) => (StatusCode::NOT_FOUND, 40402),
                // Catalog and config problems only surface while loading at startup.
                CoreKind::SerdeJsonError(_)
                | CoreKind::IoError(_)
                | CoreKind::ConfigError(_)
                | CoreKind::DuplicateProperty(_) => (StatusCode::INTERNAL_SERVER_ERROR, 50001),
            },
            ErrorKind::CompareCapacity(_) => (StatusCode::BAD_REQUEST, 40002),
            ErrorKind::InvalidQuery { .. } => (StatusCode::BAD_REQUEST, 40003),
            ErrorKind::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, 50002),
        }
    }

    fn fields(&self) -> Vec<FieldError> {
        match &*self.0 {
            ErrorKind::Villa(err) => match err.kind() {
                CoreKind::Validation(errors) => errors.0.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorCode {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, code) = self.get_codes();
        let message = self.to_string();
        let body = Json(ErrorCode {
            code,
            message,
            fields: self.fields(),
        });
        (status_code, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
