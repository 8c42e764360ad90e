//! Hack VM Translator - Code Generation Backend
//!
//! Turns parsed VM commands into Hack assembly. The pipeline per command:
//!
//! - the segment resolver maps a segment reference to an addressing recipe
//!   and enforces its bounds
//! - the lowering templates expand the command into a fixed sequence of
//!   instructions that preserves the stack discipline
//! - the program counter is threaded through each lowering call so
//!   comparison and termination templates can encode literal jump targets
//! - the emitter renders the result as text
//!
//! Commands are translated strictly in input order; the counter has exactly
//! one writer, the translation loop itself.

pub mod counter;
pub mod emit;
pub mod lower;
pub mod segment;

pub use counter::ProgramCounter;
pub use emit::emit_instructions;
pub use lower::lower_command;

use hack_asm::AsmInst;
use log::{debug, info};
use vmt_common::{Command, TranslateError};

/// Options for code generation.
pub struct CodegenOptions {
    /// Interleave a `// <command>` comment line above each template.
    /// Comments never count toward the program counter.
    pub emit_comments: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
        }
    }
}

/// Translates a command stream, threading the program counter between
/// commands. One instance per translation run.
pub struct CodeGenerator {
    namespace: String,
    pc: ProgramCounter,
    options: CodegenOptions,
}

impl CodeGenerator {
    /// A generator scoping static variables to `namespace` (conventionally
    /// the input file stem).
    pub fn new(namespace: &str) -> Self {
        Self::with_options(namespace, CodegenOptions::default())
    }

    pub fn with_options(namespace: &str, options: CodegenOptions) -> Self {
        Self {
            namespace: namespace.to_string(),
            pc: ProgramCounter::new(),
            options,
        }
    }

    /// Counter state after everything translated so far.
    pub fn counter(&self) -> ProgramCounter {
        self.pc
    }

    /// Translate one command. On error nothing is emitted and the counter
    /// is unchanged, so a caller that stops at the first error never holds
    /// a desynchronized counter.
    pub fn translate(&mut self, command: &Command) -> Result<Vec<AsmInst>, TranslateError> {
        let (mut insts, next) = lower::lower_command(command, &self.namespace, self.pc)?;
        if !self.options.emit_comments {
            insts.retain(AsmInst::is_real);
        }
        self.pc = next;
        debug!("translated '{}', counter at {}", command, self.pc.emitted());
        Ok(insts)
    }

    /// Emit the program-termination template (a self-spinning jump) so the
    /// generated program cannot fall through past its last command.
    pub fn finish(&mut self) -> Result<Vec<AsmInst>, TranslateError> {
        self.translate(&Command::End)
    }
}

/// Translate a whole command sequence to assembly text, appending the
/// termination template.
pub fn translate_program(
    namespace: &str,
    commands: &[Command],
) -> Result<String, TranslateError> {
    let mut generator = CodeGenerator::new(namespace);
    let mut insts = Vec::new();
    for command in commands {
        insts.extend(generator.translate(command)?);
    }
    insts.extend(generator.finish()?);

    info!(
        "translated {} commands into {} instructions",
        commands.len(),
        generator.counter().emitted()
    );
    Ok(emit_instructions(&insts))
}
