//! Program loading and symbol resolution
//!
//! Two passes over parsed assembly text: the first assigns instruction
//! addresses to label declarations, the second resolves every symbolic
//! A-instruction against the predefined register-file symbols, the label
//! table, and finally a variable table that allocates fresh cells from the
//! static window upward. Comments are dropped; the loaded program contains
//! only executable instructions.

use crate::constants::{ARG, LCL, SP, STATIC_BASE, STATIC_END, THAT, THIS};
use hack_asm::{parse_source, AsmError, AsmInst, ParsedLine};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] AsmError),

    #[error("label '{0}' declared twice")]
    DuplicateLabel(String),

    #[error("variable '{symbol}' does not fit the static window (16..=255)")]
    OutOfVariableSpace { symbol: String },
}

/// A loaded program: executable instructions only, every address literal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub instructions: Vec<AsmInst>,
}

fn predefined_symbols() -> HashMap<String, u16> {
    let mut symbols = HashMap::new();
    symbols.insert("SP".to_string(), SP);
    symbols.insert("LCL".to_string(), LCL);
    symbols.insert("ARG".to_string(), ARG);
    symbols.insert("THIS".to_string(), THIS);
    symbols.insert("THAT".to_string(), THAT);
    for i in 0..16u16 {
        symbols.insert(format!("R{}", i), i);
    }
    symbols
}

/// Parse and resolve an assembly source into an executable program.
pub fn load(source: &str) -> Result<Program, LoadError> {
    let lines = parse_source(source)?;

    // First pass: label addresses.
    let mut symbols = predefined_symbols();
    let mut addr = 0u16;
    for line in &lines {
        match line {
            ParsedLine::Label(name) => {
                if symbols.insert(name.clone(), addr).is_some() {
                    return Err(LoadError::DuplicateLabel(name.clone()));
                }
            }
            ParsedLine::Inst(inst) => {
                if inst.is_real() {
                    addr += 1;
                }
            }
        }
    }

    // Second pass: resolve symbols, allocating variables from the static
    // window as they first appear.
    let mut next_variable = STATIC_BASE;
    let mut instructions = Vec::new();
    for line in lines {
        let inst = match line {
            ParsedLine::Label(_) => continue,
            ParsedLine::Inst(inst) => inst,
        };
        match inst {
            AsmInst::ASymbol(symbol) => {
                let addr = match symbols.get(&symbol) {
                    Some(addr) => *addr,
                    None => {
                        if next_variable > STATIC_END {
                            return Err(LoadError::OutOfVariableSpace { symbol });
                        }
                        let addr = next_variable;
                        next_variable += 1;
                        debug!("allocated variable {} at {}", symbol, addr);
                        symbols.insert(symbol, addr);
                        addr
                    }
                };
                instructions.push(AsmInst::A(addr));
            }
            AsmInst::Comment(_) => {}
            other => instructions.push(other),
        }
    }

    Ok(Program { instructions })
}
