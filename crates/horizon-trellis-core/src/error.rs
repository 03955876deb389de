//! Error types for Horizon Trellis.

use std::fmt;

use crate::object::ObjectError;

/// The main error type for Horizon Trellis core operations.
#[derive(Debug)]
pub enum TrellisError {
    /// A widget class was registered twice with the same toolkit.
    ClassAlreadyRegistered(&'static str),
    /// Object-related error.
    Object(ObjectError),
    /// Thread pool error.
    ThreadPool(ThreadPoolError),
}

impl fmt::Display for TrellisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassAlreadyRegistered(name) => {
                write!(f, "Widget class '{name}' is already registered")
            }
            Self::Object(err) => write!(f, "Object error: {err}"),
            Self::ThreadPool(err) => write!(f, "Thread pool error: {err}"),
        }
    }
}

impl std::error::Error for TrellisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Object(err) => Some(err),
            Self::ThreadPool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ObjectError> for TrellisError {
    fn from(err: ObjectError) -> Self {
        Self::Object(err)
    }
}

impl From<ThreadPoolError> for TrellisError {
    fn from(err: ThreadPoolError) -> Self {
        Self::ThreadPool(err)
    }
}

/// Thread pool errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadPoolError {
    /// The underlying rayon pool could not be built.
    CreationFailed(String),
}

impl fmt::Display for ThreadPoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreationFailed(msg) => write!(f, "Failed to create thread pool: {msg}"),
        }
    }
}

impl std::error::Error for ThreadPoolError {}

/// A specialized Result type for Horizon Trellis core operations.
pub type Result<T> = std::result::Result<T, TrellisError>;
