//! Parsed VM command model
//!
//! One `Command` per meaningful input line, produced by the frontend and
//! consumed exactly once by the code generator. `Display` renders the
//! source-level spelling, which the code generator reuses for the comment
//! line above each emitted template.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named memory region of the VM. Each segment has one of three
/// addressing modes: indirect through a base register (Local, Argument,
/// This, That), immediate (Constant), or a fixed window of cells (Static,
/// Temp, Pointer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Constant,
    Static,
    Temp,
    Pointer,
}

impl Segment {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "constant" => Some(Segment::Constant),
            "static" => Some(Segment::Static),
            "temp" => Some(Segment::Temp),
            "pointer" => Some(Segment::Pointer),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Constant => "constant",
            Segment::Static => "static",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Two-operand ALU commands: pop two values, push one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryAluOp {
    Add,
    Sub,
    And,
    Or,
}

impl BinaryAluOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryAluOp::Add => "add",
            BinaryAluOp::Sub => "sub",
            BinaryAluOp::And => "and",
            BinaryAluOp::Or => "or",
        }
    }
}

/// One-operand ALU commands: rewrite the top of the stack in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryAluOp {
    Neg,
    Not,
}

impl UnaryAluOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryAluOp::Neg => "neg",
            UnaryAluOp::Not => "not",
        }
    }
}

/// Comparison commands: pop two values, push all-ones for true or
/// all-zeros for false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn name(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
        }
    }
}

/// One VM command. `End` is the program-termination command synthesized at
/// the end of a translation run; it has no source-level spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Binary(BinaryAluOp),
    Unary(UnaryAluOp),
    Compare(CompareOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    End,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Binary(op) => write!(f, "{}", op.name()),
            Command::Unary(op) => write!(f, "{}", op.name()),
            Command::Compare(op) => write!(f, "{}", op.name()),
            Command::Push { segment, index } => write!(f, "push {} {}", segment, index),
            Command::Pop { segment, index } => write!(f, "pop {} {}", segment, index),
            Command::End => write!(f, "end"),
        }
    }
}
