//! Hack instruction model
//!
//! The Hack machine executes two instruction forms. An A-instruction
//! (`@value`) loads a 15-bit literal or a symbolic address into the A
//! register. A C-instruction (`dest=comp;jump`) computes a function of D, A,
//! and M (the memory cell addressed by A), stores it into any combination of
//! destinations, and optionally jumps to the address held in A.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Destination field of a C-instruction: which registers receive the
/// computed value. M writes through the A register to memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dest {
    None,
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Dest {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "M" => Some(Dest::M),
            "D" => Some(Dest::D),
            "MD" => Some(Dest::MD),
            "A" => Some(Dest::A),
            "AM" => Some(Dest::AM),
            "AD" => Some(Dest::AD),
            "AMD" => Some(Dest::AMD),
            _ => None,
        }
    }

    /// True if the destination includes the A register.
    pub fn writes_a(&self) -> bool {
        matches!(self, Dest::A | Dest::AM | Dest::AD | Dest::AMD)
    }

    /// True if the destination includes the D register.
    pub fn writes_d(&self) -> bool {
        matches!(self, Dest::D | Dest::MD | Dest::AD | Dest::AMD)
    }

    /// True if the destination includes the memory cell addressed by A.
    pub fn writes_m(&self) -> bool {
        matches!(self, Dest::M | Dest::MD | Dest::AM | Dest::AMD)
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dest::None => Ok(()),
            Dest::M => write!(f, "M"),
            Dest::D => write!(f, "D"),
            Dest::MD => write!(f, "MD"),
            Dest::A => write!(f, "A"),
            Dest::AM => write!(f, "AM"),
            Dest::AD => write!(f, "AD"),
            Dest::AMD => write!(f, "AMD"),
        }
    }
}

/// Computation field of a C-instruction. The full Hack ALU table: constants,
/// register passthroughs, unary negation/complement, increment/decrement,
/// two-operand add/subtract, and bitwise and/or, each in an A-operand and an
/// M-operand form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comp {
    Zero,
    One,
    NegOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    NegD,
    NegA,
    NegM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

impl Comp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "0" => Some(Comp::Zero),
            "1" => Some(Comp::One),
            "-1" => Some(Comp::NegOne),
            "D" => Some(Comp::D),
            "A" => Some(Comp::A),
            "M" => Some(Comp::M),
            "!D" => Some(Comp::NotD),
            "!A" => Some(Comp::NotA),
            "!M" => Some(Comp::NotM),
            "-D" => Some(Comp::NegD),
            "-A" => Some(Comp::NegA),
            "-M" => Some(Comp::NegM),
            "D+1" => Some(Comp::DPlusOne),
            "A+1" => Some(Comp::APlusOne),
            "M+1" => Some(Comp::MPlusOne),
            "D-1" => Some(Comp::DMinusOne),
            "A-1" => Some(Comp::AMinusOne),
            "M-1" => Some(Comp::MMinusOne),
            "D+A" => Some(Comp::DPlusA),
            "D+M" => Some(Comp::DPlusM),
            "D-A" => Some(Comp::DMinusA),
            "D-M" => Some(Comp::DMinusM),
            "A-D" => Some(Comp::AMinusD),
            "M-D" => Some(Comp::MMinusD),
            "D&A" => Some(Comp::DAndA),
            "D&M" => Some(Comp::DAndM),
            "D|A" => Some(Comp::DOrA),
            "D|M" => Some(Comp::DOrM),
            _ => None,
        }
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::NegOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::M => "M",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NotM => "!M",
            Comp::NegD => "-D",
            Comp::NegA => "-A",
            Comp::NegM => "-M",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::MPlusOne => "M+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::DMinusM => "D-M",
            Comp::AMinusD => "A-D",
            Comp::MMinusD => "M-D",
            Comp::DAndA => "D&A",
            Comp::DAndM => "D&M",
            Comp::DOrA => "D|A",
            Comp::DOrM => "D|M",
        };
        write!(f, "{}", text)
    }
}

/// Jump field of a C-instruction: the predicate on the computed value that,
/// when satisfied, loads the program counter from the A register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jump {
    None,
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Jump {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "JGT" => Some(Jump::JGT),
            "JEQ" => Some(Jump::JEQ),
            "JGE" => Some(Jump::JGE),
            "JLT" => Some(Jump::JLT),
            "JNE" => Some(Jump::JNE),
            "JLE" => Some(Jump::JLE),
            "JMP" => Some(Jump::JMP),
            _ => None,
        }
    }

    /// Evaluate the predicate against a computed value.
    pub fn taken(&self, value: i16) -> bool {
        match self {
            Jump::None => false,
            Jump::JGT => value > 0,
            Jump::JEQ => value == 0,
            Jump::JGE => value >= 0,
            Jump::JLT => value < 0,
            Jump::JNE => value != 0,
            Jump::JLE => value <= 0,
            Jump::JMP => true,
        }
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Jump::None => "",
            Jump::JGT => "JGT",
            Jump::JEQ => "JEQ",
            Jump::JGE => "JGE",
            Jump::JLT => "JLT",
            Jump::JNE => "JNE",
            Jump::JLE => "JLE",
            Jump::JMP => "JMP",
        };
        write!(f, "{}", text)
    }
}

/// One line of Hack assembly output.
///
/// `A` and `ASymbol` are the two spellings of the A-instruction; `C` is the
/// compute instruction; `Comment` is a source-command annotation that
/// occupies a line but is not an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsmInst {
    A(u16),
    ASymbol(String),
    C(Dest, Comp, Jump),
    Comment(String),
}

impl AsmInst {
    /// A compute-and-store C-instruction with no jump.
    pub fn c(dest: Dest, comp: Comp) -> Self {
        AsmInst::C(dest, comp, Jump::None)
    }

    /// A jump C-instruction with no destination.
    pub fn jump(comp: Comp, jump: Jump) -> Self {
        AsmInst::C(Dest::None, comp, jump)
    }

    /// True for lines that occupy an instruction address in the target
    /// program. Comments do not.
    pub fn is_real(&self) -> bool {
        !matches!(self, AsmInst::Comment(_))
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::A(addr) => write!(f, "@{}", addr),
            AsmInst::ASymbol(symbol) => write!(f, "@{}", symbol),
            AsmInst::C(dest, comp, jump) => {
                if *dest != Dest::None {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if *jump != Jump::None {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            AsmInst::Comment(text) => write!(f, "// {}", text),
        }
    }
}
