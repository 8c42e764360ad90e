//! Hack VM Translator - Common Types and Errors
//!
//! Shared vocabulary of the translator pipeline: the parsed command model,
//! source locations for error reporting, and the error taxonomy.

pub mod command;
pub mod error;
pub mod source_loc;

pub use command::{BinaryAluOp, Command, CompareOp, Segment, UnaryAluOp};
pub use error::TranslateError;
pub use source_loc::SourceLocation;
