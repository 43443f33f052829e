pub mod errors;

pub type Result<T> = std::result::Result<T, errors::VillaError>;

pub mod admin;
pub mod chat;
pub mod compare;
pub mod config;
pub mod home;
pub mod lead;
pub mod listing;
pub mod price;
pub mod router;
pub mod search;
pub mod seed;
pub mod site;
pub mod store;
pub mod types;

pub mod prelude {
    pub use super::errors::{ErrorKind, FieldError, FieldErrors, VillaError};
    pub use super::Result;
}
