//! VM command parser
//!
//! Tokenizes VM source into `Command`s: strips `//` comments, skips blank
//! lines, splits the rest on whitespace, and maps the first token to a
//! command kind. Tokens beyond what an operation consumes are ignored.
//! Every parsed command carries the source location it came from, so a
//! later codegen failure can still be pinned to a line.

use log::trace;
use serde::{Deserialize, Serialize};
use vmt_common::{
    BinaryAluOp, Command, CompareOp, Segment, SourceLocation, TranslateError, UnaryAluOp,
};

/// A parsed command together with the location of the line it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedCommand {
    pub command: Command,
    pub location: SourceLocation,
}

/// Parse a whole VM source file into located commands.
///
/// Stops at the first malformed line; partial results are never returned.
pub fn parse_source(filename: &str, source: &str) -> Result<Vec<SourcedCommand>, TranslateError> {
    let mut commands = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let location = SourceLocation::new(filename, i as u32 + 1);
        if let Some(command) = parse_line(raw, &location)? {
            trace!("{}: {}", location, command);
            commands.push(SourcedCommand { command, location });
        }
    }

    Ok(commands)
}

fn parse_line(raw: &str, location: &SourceLocation) -> Result<Option<Command>, TranslateError> {
    let line = match raw.find("//") {
        Some(pos) => &raw[..pos],
        None => raw,
    };

    let mut tokens = line.split_whitespace();
    let operation = match tokens.next() {
        Some(op) => op,
        None => return Ok(None),
    };

    let command = match operation {
        "add" => Command::Binary(BinaryAluOp::Add),
        "sub" => Command::Binary(BinaryAluOp::Sub),
        "and" => Command::Binary(BinaryAluOp::And),
        "or" => Command::Binary(BinaryAluOp::Or),
        "neg" => Command::Unary(UnaryAluOp::Neg),
        "not" => Command::Unary(UnaryAluOp::Not),
        "eq" => Command::Compare(CompareOp::Eq),
        "gt" => Command::Compare(CompareOp::Gt),
        "lt" => Command::Compare(CompareOp::Lt),
        "push" | "pop" => {
            let (segment, index) = parse_memory_args(operation, &mut tokens, location)?;
            if operation == "push" {
                Command::Push { segment, index }
            } else {
                Command::Pop { segment, index }
            }
        }
        _ => {
            return Err(TranslateError::UnknownOperation {
                location: location.clone(),
                name: operation.to_string(),
            })
        }
    };

    Ok(Some(command))
}

fn parse_memory_args<'a>(
    operation: &str,
    tokens: &mut impl Iterator<Item = &'a str>,
    location: &SourceLocation,
) -> Result<(Segment, u16), TranslateError> {
    let segment_token = tokens.next().ok_or_else(|| TranslateError::MissingArgument {
        location: location.clone(),
        operation: operation.to_string(),
        what: "segment",
    })?;
    let segment =
        Segment::from_name(segment_token).ok_or_else(|| TranslateError::UnknownSegment {
            location: location.clone(),
            name: segment_token.to_string(),
        })?;

    let index_token = tokens.next().ok_or_else(|| TranslateError::MissingArgument {
        location: location.clone(),
        operation: operation.to_string(),
        what: "index",
    })?;
    let index = parse_index(index_token, location)?;

    Ok((segment, index))
}

fn parse_index(token: &str, location: &SourceLocation) -> Result<u16, TranslateError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TranslateError::InvalidIndex {
            location: location.clone(),
            token: token.to_string(),
        });
    }
    token.parse::<u16>().map_err(|_| TranslateError::InvalidIndex {
        location: location.clone(),
        token: token.to_string(),
    })
}
