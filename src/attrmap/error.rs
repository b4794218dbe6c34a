use crate::kind::AttrKind;
use crate::map::Strategy;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttrError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid value {value} for attribute '{attribute}'")]
    InvalidValue { attribute: String, value: String },

    #[error("Cannot parse '{text}' as {kind} for attribute '{attribute}'")]
    Parse {
        attribute: String,
        kind: AttrKind,
        text: String,
    },

    #[error("{operation} is not supported by the {strategy} attribute map")]
    UnsupportedMutation {
        strategy: Strategy,
        operation: &'static str,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("An attribute named '{0}' is already registered")]
    DuplicateName(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute '{attribute}' holds {expected} values, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: AttrKind,
        actual: AttrKind,
    },

    #[error("Values of type {0} cannot be persisted")]
    NotPersistable(&'static str),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AttrError {
    pub(crate) fn unsupported(strategy: Strategy, operation: &'static str) -> Self {
        AttrError::UnsupportedMutation {
            strategy,
            operation,
        }
    }

    /// True for the error raised by every mutator of a read-only map.
    pub fn is_unsupported_mutation(&self) -> bool {
        matches!(self, AttrError::UnsupportedMutation { .. })
    }
}

pub type Result<T> = std::result::Result<T, AttrError>;
