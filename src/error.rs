//! # Error Types
//!
//! All failures surface synchronously at application setup time. Nothing here is
//! meant to be recovered from at runtime; callers fix the call site.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DaprError {
    /// A parameter had the wrong kind of value
    #[error("Expected {expected} for \"{param}\"")]
    TypeMismatch {
        expected: &'static str,
        param: &'static str,
    },

    /// A required key was absent from a dynamic subscription definition
    #[error("Missing required parameter \"{param}\"")]
    MissingParameter { param: &'static str },

    /// The method and path are already registered on the route table
    #[error("Route already registered: {method} {path}")]
    RouteConflict { method: String, path: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DaprError {
    pub fn type_mismatch(expected: &'static str, param: &'static str) -> Self {
        Self::TypeMismatch { expected, param }
    }

    pub fn missing(param: &'static str) -> Self {
        Self::MissingParameter { param }
    }

    pub fn route_conflict(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::RouteConflict {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DaprError>;
