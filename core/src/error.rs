//! Error types for the routing engine.
//!
//! # Design
//! Each stage fails with its own enum so callers can tell a programmer
//! error (bad pattern, missing fixture context) from an expected runtime
//! outcome (no route matched). `HandlerError` is what a route handler
//! returns; fixture failures convert into it so `?` works inside handlers.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpMethod;

/// A route pattern that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("route pattern is empty")]
    Empty,

    #[error("route pattern `{pattern}` has an empty segment at position {position}")]
    EmptySegment { pattern: String, position: usize },

    #[error("route pattern `{pattern}` has an invalid parameter name `{name}`")]
    InvalidParameterName { pattern: String, name: String },

    #[error("route pattern `{pattern}` binds parameter `{name}` more than once")]
    DuplicateParameter { pattern: String, name: String },

    #[error("route pattern `{pattern}` contains reserved character `{character}`")]
    ReservedCharacter { pattern: String, character: char },
}

/// Errors from registering into or looking up a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No registered route accepts this method and path.
    #[error("no route matched {method} {path}")]
    NoRouteMatched { method: HttpMethod, path: String },

    /// Registration attempted after the table was sealed for serving.
    #[error("route table is sealed; cannot register {method} {pattern}")]
    Sealed { method: HttpMethod, pattern: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Errors from resolving and loading a fixture body.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Neither an explicit nor a default resource context was available.
    #[error("no resource context for fixture `{name}`: pass one explicitly or set a default")]
    NoResourceContext { name: String },

    #[error("fixture name `{name}` must be a relative path without `..`")]
    InvalidName { name: String },

    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("environment variable {var} is not set")]
    MissingEnv { var: &'static str },
}

/// A route handler failed to produce a response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("failed to encode response body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError::Failed(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError::Failed(message.to_string())
    }
}
