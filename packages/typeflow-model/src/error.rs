//! Error types for typeflow-model

use thiserror::Error;

/// Errors raised while building or querying a program model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Duplicate method definition: {name}")]
    DuplicateMethod { name: String },

    #[error("Entry point '{name}' is not a method of the program")]
    UnknownEntryPoint { name: String },

    #[error("Method '{method}' statement {index}: {message}")]
    InvalidStatement {
        method: String,
        index: usize,
        message: String,
    },
}

impl ModelError {
    pub fn duplicate_method(name: impl Into<String>) -> Self {
        Self::DuplicateMethod { name: name.into() }
    }

    pub fn unknown_entry_point(name: impl Into<String>) -> Self {
        Self::UnknownEntryPoint { name: name.into() }
    }

    pub fn invalid_statement(
        method: impl Into<String>,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidStatement {
            method: method.into(),
            index,
            message: message.into(),
        }
    }
}

/// Result alias for model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;
