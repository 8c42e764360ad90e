//! Error handling for the Hack VM translator
//!
//! Every error is fatal to the translation run: a half-emitted template
//! would desynchronize the instruction counter from the emitted text and
//! silently corrupt every later jump target, so translation stops at the
//! first error and the driver surfaces it with its source position.

use crate::command::Segment;
use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main error type covering all phases of a translation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("{location}: unknown operation '{name}'")]
    UnknownOperation {
        location: SourceLocation,
        name: String,
    },

    #[error("{location}: unknown segment '{name}'")]
    UnknownSegment {
        location: SourceLocation,
        name: String,
    },

    #[error("{location}: '{operation}' is missing its {what} argument")]
    MissingArgument {
        location: SourceLocation,
        operation: String,
        what: &'static str,
    },

    #[error("{location}: index '{token}' is not a non-negative integer")]
    InvalidIndex {
        location: SourceLocation,
        token: String,
    },

    #[error("index {index} is out of range for the {segment} segment (max {max})")]
    IndexOutOfRange {
        segment: Segment,
        index: u16,
        max: u16,
    },

    #[error("cannot {operation} the {segment} segment")]
    InvalidOperation {
        segment: Segment,
        operation: &'static str,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::Io {
            message: err.to_string(),
        }
    }
}
