//! Shared error types for the lead tracking system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("Invalid lead payload: {message}")]
    InvalidLead { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
