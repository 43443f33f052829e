use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct VillaError(Box<ErrorKind>);

#[derive(Error, Debug)]
#[error(transparent)]
pub enum ErrorKind {
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
    #[error("ConfigError: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,
    #[error("Admin session required")]
    NotAuthenticated,
    #[error("Property not found: {0}")]
    PropertyNotFound(String),
    #[error("Blog not found: {0}")]
    BlogNotFound(String),
    #[error("Property already exists: {0}")]
    DuplicateProperty(String),
    #[error("ValidationError: {0}")]
    Validation(#[from] FieldErrors),
}

impl<E> From<E> for VillaError
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        VillaError(Box::new(ErrorKind::from(err)))
    }
}

impl VillaError {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Every failed field of one form submission, in form order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field == field)
    }

    pub fn into_result(self) -> crate::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|err| format!("{}: {}", err.field, err.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for FieldErrors {}
