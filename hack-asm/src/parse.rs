//! Assembly text parsing
//!
//! Parses Hack assembly text back into the instruction model, keeping
//! symbolic A-instructions symbolic. Symbol resolution is the loader's job;
//! this layer only validates syntax.

use crate::inst::{AsmInst, Comp, Dest, Jump};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// The maximum literal an A-instruction can encode (15 bits).
pub const MAX_A_LITERAL: u32 = 0x7FFF;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AsmError {
    #[error("line {line}: '@{text}' is neither a 15-bit literal nor a valid symbol")]
    BadAddress { line: usize, text: String },

    #[error("line {line}: unknown computation '{text}'")]
    BadComp { line: usize, text: String },

    #[error("line {line}: unknown destination '{text}'")]
    BadDest { line: usize, text: String },

    #[error("line {line}: unknown jump '{text}'")]
    BadJump { line: usize, text: String },

    #[error("line {line}: malformed label '({text})'")]
    BadLabel { line: usize, text: String },
}

/// One meaningful line of an assembly file: a label declaration or an
/// instruction. Blank and comment-only lines are dropped during parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Label(String),
    Inst(AsmInst),
}

fn symbol_re() -> &'static Regex {
    static SYMBOL_RE: OnceLock<Regex> = OnceLock::new();
    SYMBOL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_.$:][A-Za-z0-9_.$:]*$").expect("valid symbol regex")
    })
}

/// True if `text` is a well-formed assembly symbol: letters, digits,
/// underscore, dot, dollar, colon, not starting with a digit.
pub fn is_symbol(text: &str) -> bool {
    symbol_re().is_match(text)
}

/// Parse a whole assembly source into labels and instructions.
///
/// Comments (`//` to end of line) and blank lines are skipped; `(SYM)`
/// lines become labels; everything else must be an A- or C-instruction.
pub fn parse_source(source: &str) -> Result<Vec<ParsedLine>, AsmError> {
    let mut parsed = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line_number = i + 1;
        let line = match raw.find("//") {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        parsed.push(parse_line(line, line_number)?);
    }

    Ok(parsed)
}

fn parse_line(line: &str, line_number: usize) -> Result<ParsedLine, AsmError> {
    if let Some(rest) = line.strip_prefix('(') {
        let name = rest.strip_suffix(')').unwrap_or(rest);
        if !rest.ends_with(')') || !is_symbol(name) {
            return Err(AsmError::BadLabel {
                line: line_number,
                text: name.to_string(),
            });
        }
        return Ok(ParsedLine::Label(name.to_string()));
    }

    if let Some(value) = line.strip_prefix('@') {
        return parse_a_instruction(value, line_number).map(ParsedLine::Inst);
    }

    parse_c_instruction(line, line_number).map(ParsedLine::Inst)
}

fn parse_a_instruction(value: &str, line_number: usize) -> Result<AsmInst, AsmError> {
    if value.bytes().all(|b| b.is_ascii_digit()) && !value.is_empty() {
        return match value.parse::<u32>() {
            Ok(addr) if addr <= MAX_A_LITERAL => Ok(AsmInst::A(addr as u16)),
            _ => Err(AsmError::BadAddress {
                line: line_number,
                text: value.to_string(),
            }),
        };
    }

    if is_symbol(value) {
        Ok(AsmInst::ASymbol(value.to_string()))
    } else {
        Err(AsmError::BadAddress {
            line: line_number,
            text: value.to_string(),
        })
    }
}

fn parse_c_instruction(line: &str, line_number: usize) -> Result<AsmInst, AsmError> {
    let (dest, rest) = match line.split_once('=') {
        Some((dest_text, rest)) => {
            let dest = Dest::from_name(dest_text.trim()).ok_or_else(|| AsmError::BadDest {
                line: line_number,
                text: dest_text.trim().to_string(),
            })?;
            (dest, rest)
        }
        None => (Dest::None, line),
    };

    let (comp_text, jump) = match rest.split_once(';') {
        Some((comp_text, jump_text)) => {
            let jump = Jump::from_name(jump_text.trim()).ok_or_else(|| AsmError::BadJump {
                line: line_number,
                text: jump_text.trim().to_string(),
            })?;
            (comp_text, jump)
        }
        None => (rest, Jump::None),
    };

    let comp = Comp::from_name(comp_text.trim()).ok_or_else(|| AsmError::BadComp {
        line: line_number,
        text: comp_text.trim().to_string(),
    })?;

    Ok(AsmInst::C(dest, comp, jump))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_a_instructions() {
        let lines = parse_source("@21\n@SP\n@Main.3\n").unwrap();
        assert_eq!(
            lines,
            vec![
                ParsedLine::Inst(AsmInst::A(21)),
                ParsedLine::Inst(AsmInst::ASymbol("SP".to_string())),
                ParsedLine::Inst(AsmInst::ASymbol("Main.3".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_c_instructions() {
        let lines = parse_source("M=M-1\nD=M\nD;JGT\n0;JMP\nAM=M-1\n").unwrap();
        assert_eq!(
            lines,
            vec![
                ParsedLine::Inst(AsmInst::c(Dest::M, Comp::MMinusOne)),
                ParsedLine::Inst(AsmInst::c(Dest::D, Comp::M)),
                ParsedLine::Inst(AsmInst::jump(Comp::D, Jump::JGT)),
                ParsedLine::Inst(AsmInst::jump(Comp::Zero, Jump::JMP)),
                ParsedLine::Inst(AsmInst::C(Dest::AM, Comp::MMinusOne, Jump::None)),
            ]
        );
    }

    #[test]
    fn test_skips_comments_and_blanks() {
        let source = "// push constant 7\n\n@7\n   \nD=A  // inline\n";
        let lines = parse_source(source).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_parse_label() {
        let lines = parse_source("(LOOP)\n@LOOP\n0;JMP\n").unwrap();
        assert_eq!(lines[0], ParsedLine::Label("LOOP".to_string()));
    }

    #[test]
    fn test_round_trips_rendered_instructions() {
        let insts = vec![
            AsmInst::A(256),
            AsmInst::ASymbol("SP".to_string()),
            AsmInst::c(Dest::M, Comp::DPlusM),
            AsmInst::jump(Comp::D, Jump::JEQ),
        ];
        let text: String = insts.iter().map(|i| format!("{}\n", i)).collect();
        let parsed = parse_source(&text).unwrap();
        let back: Vec<AsmInst> = parsed
            .into_iter()
            .map(|line| match line {
                ParsedLine::Inst(inst) => inst,
                ParsedLine::Label(_) => panic!("unexpected label"),
            })
            .collect();
        assert_eq!(back, insts);
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert_eq!(
            parse_source("@32768\n"),
            Err(AsmError::BadAddress {
                line: 1,
                text: "32768".to_string()
            })
        );
        assert_eq!(
            parse_source("@7abc\n"),
            Err(AsmError::BadAddress {
                line: 1,
                text: "7abc".to_string()
            })
        );
        assert_eq!(
            parse_source("M=Q\n"),
            Err(AsmError::BadComp {
                line: 1,
                text: "Q".to_string()
            })
        );
        assert_eq!(
            parse_source("X=D\n"),
            Err(AsmError::BadDest {
                line: 1,
                text: "X".to_string()
            })
        );
        assert_eq!(
            parse_source("D;JUMP\n"),
            Err(AsmError::BadJump {
                line: 1,
                text: "JUMP".to_string()
            })
        );
    }

    #[test]
    fn test_symbol_syntax() {
        assert!(is_symbol("SP"));
        assert!(is_symbol("Main.3"));
        assert!(is_symbol("_tmp$0:x"));
        assert!(!is_symbol("3abc"));
        assert!(!is_symbol(""));
        assert!(!is_symbol("a b"));
    }
}
