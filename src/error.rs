use crate::store::StoreError;
use crate::workflow::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Crate-level error taxonomy, shaped for mapping onto an HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum LomisError {
    NotFound(String),
    Validation {
        message: String,
        allowed: Vec<String>,
    },
    Authorization(String),
    Conflict(String),
    Dependency(String),
    Configuration(String),
    Internal(String),
}

impl fmt::Display for LomisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LomisError::NotFound(msg) => write!(f, "Not found: {msg}"),
            LomisError::Validation { message, .. } => write!(f, "Validation error: {message}"),
            LomisError::Authorization(msg) => write!(f, "Authorization error: {msg}"),
            LomisError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            LomisError::Dependency(msg) => write!(f, "Dependency error: {msg}"),
            LomisError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            LomisError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for LomisError {}

impl LomisError {
    /// HTTP status a boundary layer should respond with
    pub fn http_status(&self) -> u16 {
        match self {
            LomisError::NotFound(_) => 404,
            LomisError::Validation { .. } => 400,
            LomisError::Authorization(_) => 403,
            LomisError::Conflict(_) => 409,
            LomisError::Dependency(_) => 502,
            LomisError::Configuration(_) | LomisError::Internal(_) => 500,
        }
    }

    /// Structured body for the boundary response
    pub fn to_response(&self) -> ErrorResponse {
        let specific_errors = match self {
            LomisError::Validation { allowed, .. } if !allowed.is_empty() => allowed.clone(),
            other => vec![other.to_string()],
        };
        ErrorResponse {
            status: self.http_status(),
            specific_errors,
        }
    }
}

/// Wire shape of an error response: `{ status, specific_errors }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub specific_errors: Vec<String>,
}

impl From<WorkflowError> for LomisError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::TaskNotFound { .. } | WorkflowError::EntityNotFound { .. } => {
                LomisError::NotFound(err.to_string())
            }
            WorkflowError::IllegalStatus { ref allowed, .. } => LomisError::Validation {
                message: err.to_string(),
                allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
            },
            WorkflowError::NotPermitted { .. } => {
                LomisError::Authorization("not enough permissions".to_string())
            }
            WorkflowError::AlreadyClosed { .. } => LomisError::Conflict(err.to_string()),
            WorkflowError::Permission(inner) => LomisError::Dependency(inner.to_string()),
            // A targeted write on a missing row is the caller's referenced
            // entity being gone, not a backend outage
            WorkflowError::Store(StoreError::Missing(what)) => LomisError::NotFound(what),
            WorkflowError::Store(inner) => LomisError::Dependency(inner.to_string()),
            WorkflowError::Internal(msg) => LomisError::Internal(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, LomisError>;
