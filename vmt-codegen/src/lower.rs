//! Per-command lowering templates
//!
//! Each VM command lowers to a fixed template of Hack instructions that
//! preserves the stack discipline: SP always points one past the live top
//! of the stack, and each command's net stack effect is -1 (binary ALU and
//! comparison), 0 (unary), or +1 (push).
//!
//! Comparison and termination templates branch to literal numeric
//! addresses computed from the program counter, so every template's real
//! instruction count is fixed and the counter advances by exactly that
//! count per command.

use hack_asm::{AsmInst, Comp, Dest, Jump};
use log::trace;
use vmt_common::{BinaryAluOp, Command, CompareOp, Segment, TranslateError, UnaryAluOp};

use crate::counter::ProgramCounter;
use crate::segment::{self, Access};

/// Offset from the pre-template counter value to the set-true block of a
/// comparison template.
const COMPARE_TRUE_OFFSET: i64 = 14;
/// Offset from the pre-template counter value to the first instruction
/// after a comparison template.
const COMPARE_END_OFFSET: i64 = 17;

/// Lower one command at the given counter position.
///
/// Returns the emitted lines (one leading comment plus the instruction
/// template) and the counter advanced past them. On error nothing is
/// emitted and the counter the caller holds is still valid.
pub fn lower_command(
    command: &Command,
    namespace: &str,
    pc: ProgramCounter,
) -> Result<(Vec<AsmInst>, ProgramCounter), TranslateError> {
    let body = match command {
        Command::Binary(op) => lower_binary(*op),
        Command::Unary(op) => lower_unary(*op),
        Command::Compare(op) => lower_compare(*op, pc),
        Command::Push { segment, index } => lower_push(*segment, *index, namespace)?,
        Command::Pop { segment, index } => lower_pop(*segment, *index, namespace)?,
        Command::End => lower_end(pc),
    };

    let mut insts = Vec::with_capacity(body.len() + 1);
    insts.push(AsmInst::Comment(command.to_string()));
    insts.extend(body);

    let emitted = insts.iter().filter(|inst| inst.is_real()).count() as u32;
    trace!("{} -> {} instructions at {}", command, emitted, pc.next_addr());
    Ok((insts, pc.advanced(emitted)))
}

/// Pop into D, leaving A pointing at the popped cell.
fn pop_into_d() -> Vec<AsmInst> {
    vec![
        AsmInst::ASymbol("SP".to_string()),
        AsmInst::c(Dest::M, Comp::MMinusOne),
        AsmInst::c(Dest::A, Comp::M),
        AsmInst::c(Dest::D, Comp::M),
    ]
}

/// Push D onto the stack.
fn push_from_d() -> Vec<AsmInst> {
    vec![
        AsmInst::ASymbol("SP".to_string()),
        AsmInst::c(Dest::M, Comp::MPlusOne),
        AsmInst::c(Dest::A, Comp::MMinusOne),
        AsmInst::c(Dest::M, Comp::D),
    ]
}

fn lower_binary(op: BinaryAluOp) -> Vec<AsmInst> {
    let combine = match op {
        BinaryAluOp::Add => Comp::DPlusM,
        BinaryAluOp::Sub => Comp::MMinusD,
        BinaryAluOp::And => Comp::DAndM,
        BinaryAluOp::Or => Comp::DOrM,
    };
    let mut insts = pop_into_d();
    insts.push(AsmInst::c(Dest::A, Comp::AMinusOne));
    insts.push(AsmInst::c(Dest::M, combine));
    insts
}

fn lower_unary(op: UnaryAluOp) -> Vec<AsmInst> {
    let rewrite = match op {
        UnaryAluOp::Neg => Comp::NegM,
        UnaryAluOp::Not => Comp::NotM,
    };
    vec![
        AsmInst::ASymbol("SP".to_string()),
        AsmInst::c(Dest::A, Comp::MMinusOne),
        AsmInst::c(Dest::M, rewrite),
    ]
}

/// Pop two, compare, push all-ones (true) or all-zeros (false).
///
/// The set-true block and the address past the template are encoded as
/// literal addresses read off the counter before emission; the template is
/// 16 real instructions long, matching the two offsets.
fn lower_compare(op: CompareOp, pc: ProgramCounter) -> Vec<AsmInst> {
    let last = pc.last_addr();
    let true_addr = (last + COMPARE_TRUE_OFFSET) as u16;
    let end_addr = (last + COMPARE_END_OFFSET) as u16;
    let predicate = match op {
        CompareOp::Eq => Jump::JEQ,
        CompareOp::Gt => Jump::JGT,
        CompareOp::Lt => Jump::JLT,
    };

    let mut insts = pop_into_d();
    insts.extend([
        AsmInst::c(Dest::A, Comp::AMinusOne),
        AsmInst::c(Dest::D, Comp::MMinusD),
        AsmInst::A(true_addr),
        AsmInst::jump(Comp::D, predicate),
        AsmInst::ASymbol("SP".to_string()),
        AsmInst::c(Dest::A, Comp::MMinusOne),
        AsmInst::c(Dest::M, Comp::Zero),
        AsmInst::A(end_addr),
        AsmInst::jump(Comp::Zero, Jump::JMP),
        AsmInst::ASymbol("SP".to_string()),
        AsmInst::c(Dest::A, Comp::MMinusOne),
        AsmInst::c(Dest::M, Comp::NegOne),
    ]);
    debug_assert_eq!(insts.len() as i64, COMPARE_END_OFFSET - 1);
    insts
}

fn lower_push(
    segment: Segment,
    index: u16,
    namespace: &str,
) -> Result<Vec<AsmInst>, TranslateError> {
    let mut insts = match segment::resolve(segment, index)? {
        Access::Immediate => vec![AsmInst::A(index), AsmInst::c(Dest::D, Comp::A)],
        Access::BaseRelative { symbol } => vec![
            AsmInst::A(index),
            AsmInst::c(Dest::D, Comp::A),
            AsmInst::ASymbol(symbol.to_string()),
            AsmInst::c(Dest::A, Comp::M),
            AsmInst::c(Dest::A, Comp::DPlusA),
            AsmInst::c(Dest::D, Comp::M),
        ],
        Access::Fixed { addr } => vec![AsmInst::A(addr), AsmInst::c(Dest::D, Comp::M)],
        Access::Static => vec![
            AsmInst::ASymbol(static_symbol(namespace, index)),
            AsmInst::c(Dest::D, Comp::M),
        ],
    };
    insts.extend(push_from_d());
    Ok(insts)
}

fn lower_pop(
    segment: Segment,
    index: u16,
    namespace: &str,
) -> Result<Vec<AsmInst>, TranslateError> {
    segment::ensure_writable(segment)?;

    let insts = match segment::resolve(segment, index)? {
        Access::BaseRelative { symbol } => {
            // No scratch register is free, so fold the index into the base
            // register, pop through it, then restore the base.
            let mut insts = vec![
                AsmInst::A(index),
                AsmInst::c(Dest::D, Comp::A),
                AsmInst::ASymbol(symbol.to_string()),
                AsmInst::c(Dest::M, Comp::DPlusM),
            ];
            insts.extend(pop_into_d());
            insts.extend([
                AsmInst::ASymbol(symbol.to_string()),
                AsmInst::c(Dest::A, Comp::M),
                AsmInst::c(Dest::M, Comp::D),
                AsmInst::A(index),
                AsmInst::c(Dest::D, Comp::A),
                AsmInst::ASymbol(symbol.to_string()),
                AsmInst::c(Dest::M, Comp::MMinusD),
            ]);
            insts
        }
        Access::Fixed { addr } => {
            let mut insts = pop_into_d();
            insts.push(AsmInst::A(addr));
            insts.push(AsmInst::c(Dest::M, Comp::D));
            insts
        }
        Access::Static => {
            let mut insts = pop_into_d();
            insts.push(AsmInst::ASymbol(static_symbol(namespace, index)));
            insts.push(AsmInst::c(Dest::M, Comp::D));
            insts
        }
        // ensure_writable rejected the constant segment above
        Access::Immediate => unreachable!("pop into constant rejected before resolution"),
    };
    Ok(insts)
}

/// Terminate the program with a self-spinning jump so execution never
/// falls through past the translated command sequence.
fn lower_end(pc: ProgramCounter) -> Vec<AsmInst> {
    let target = pc.next_addr() as u16;
    vec![AsmInst::A(target), AsmInst::jump(Comp::Zero, Jump::JMP)]
}

fn static_symbol(namespace: &str, index: u16) -> String {
    format!("{}.{}", namespace, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lower(command: Command, pc: ProgramCounter) -> (Vec<AsmInst>, ProgramCounter) {
        lower_command(&command, "Test", pc).unwrap()
    }

    fn real_count(insts: &[AsmInst]) -> u32 {
        insts.iter().filter(|inst| inst.is_real()).count() as u32
    }

    #[test]
    fn test_template_instruction_counts() {
        let cases = [
            (Command::Binary(BinaryAluOp::Add), 6),
            (Command::Binary(BinaryAluOp::Sub), 6),
            (Command::Binary(BinaryAluOp::And), 6),
            (Command::Binary(BinaryAluOp::Or), 6),
            (Command::Unary(UnaryAluOp::Neg), 3),
            (Command::Unary(UnaryAluOp::Not), 3),
            (Command::Compare(CompareOp::Eq), 16),
            (Command::Compare(CompareOp::Gt), 16),
            (Command::Compare(CompareOp::Lt), 16),
            (
                Command::Push {
                    segment: Segment::Constant,
                    index: 7,
                },
                6,
            ),
            (
                Command::Push {
                    segment: Segment::Local,
                    index: 2,
                },
                10,
            ),
            (
                Command::Push {
                    segment: Segment::Static,
                    index: 3,
                },
                6,
            ),
            (
                Command::Push {
                    segment: Segment::Temp,
                    index: 4,
                },
                6,
            ),
            (
                Command::Push {
                    segment: Segment::Pointer,
                    index: 1,
                },
                6,
            ),
            (
                Command::Pop {
                    segment: Segment::Argument,
                    index: 1,
                },
                15,
            ),
            (
                Command::Pop {
                    segment: Segment::Static,
                    index: 0,
                },
                6,
            ),
            (
                Command::Pop {
                    segment: Segment::Temp,
                    index: 0,
                },
                6,
            ),
            (
                Command::Pop {
                    segment: Segment::Pointer,
                    index: 0,
                },
                6,
            ),
            (Command::End, 2),
        ];

        for (command, expected) in cases {
            let pc = ProgramCounter::new().advanced(40);
            let (insts, after) = lower(command, pc);
            assert_eq!(real_count(&insts), expected, "count for {}", command);
            assert_eq!(after.emitted(), 40 + expected, "advance for {}", command);
        }
    }

    #[test]
    fn test_counter_ignores_comments() {
        let (insts, after) = lower(Command::Binary(BinaryAluOp::Add), ProgramCounter::new());
        assert_eq!(insts.len() as u32, after.emitted() + 1);
        assert!(matches!(insts[0], AsmInst::Comment(_)));
    }

    #[test]
    fn test_push_constant_template() {
        let (insts, _) = lower(
            Command::Push {
                segment: Segment::Constant,
                index: 7,
            },
            ProgramCounter::new(),
        );
        let lines: Vec<String> = insts.iter().map(|inst| inst.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "// push constant 7",
                "@7",
                "D=A",
                "@SP",
                "M=M+1",
                "A=M-1",
                "M=D",
            ]
        );
    }

    #[test]
    fn test_push_base_relative_template() {
        let (insts, _) = lower(
            Command::Push {
                segment: Segment::Local,
                index: 3,
            },
            ProgramCounter::new(),
        );
        let lines: Vec<String> = insts.iter().map(|inst| inst.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "// push local 3",
                "@3",
                "D=A",
                "@LCL",
                "A=M",
                "A=D+A",
                "D=M",
                "@SP",
                "M=M+1",
                "A=M-1",
                "M=D",
            ]
        );
    }

    #[test]
    fn test_pop_base_relative_restores_base() {
        let (insts, _) = lower(
            Command::Pop {
                segment: Segment::That,
                index: 5,
            },
            ProgramCounter::new(),
        );
        let lines: Vec<String> = insts.iter().map(|inst| inst.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "// pop that 5",
                "@5",
                "D=A",
                "@THAT",
                "M=D+M",
                "@SP",
                "M=M-1",
                "A=M",
                "D=M",
                "@THAT",
                "A=M",
                "M=D",
                "@5",
                "D=A",
                "@THAT",
                "M=M-D",
            ]
        );
    }

    #[test]
    fn test_static_templates_use_namespace() {
        let command = Command::Push {
            segment: Segment::Static,
            index: 4,
        };
        let (insts, _) = lower_command(&command, "Sys", ProgramCounter::new()).unwrap();
        assert_eq!(insts[1], AsmInst::ASymbol("Sys.4".to_string()));

        let command = Command::Pop {
            segment: Segment::Static,
            index: 9,
        };
        let (insts, _) = lower_command(&command, "Sys", ProgramCounter::new()).unwrap();
        assert!(insts.contains(&AsmInst::ASymbol("Sys.9".to_string())));
    }

    #[test]
    fn test_compare_targets_at_run_start() {
        // With nothing emitted, last address is -1: the set-true block
        // lands at 13 and the fall-through at 16.
        let (insts, _) = lower(Command::Compare(CompareOp::Gt), ProgramCounter::new());
        assert_eq!(insts[7], AsmInst::A(13));
        assert_eq!(insts[8], AsmInst::jump(Comp::D, Jump::JGT));
        assert_eq!(insts[12], AsmInst::A(16));
        assert_eq!(insts[13], AsmInst::jump(Comp::Zero, Jump::JMP));
    }

    #[test]
    fn test_compare_targets_track_counter() {
        let pc = ProgramCounter::new().advanced(22);
        let (insts, after) = lower(Command::Compare(CompareOp::Eq), pc);
        assert_eq!(insts[7], AsmInst::A(21 + 14));
        assert_eq!(insts[12], AsmInst::A(21 + 17));
        assert_eq!(after.emitted(), 38);
    }

    #[test]
    fn test_end_spins_on_itself() {
        let pc = ProgramCounter::new().advanced(100);
        let (insts, after) = lower(Command::End, pc);
        let lines: Vec<String> = insts.iter().map(|inst| inst.to_string()).collect();
        assert_eq!(lines, vec!["// end", "@100", "0;JMP"]);
        assert_eq!(after.emitted(), 102);
    }

    #[test]
    fn test_pop_constant_is_rejected() {
        let command = Command::Pop {
            segment: Segment::Constant,
            index: 0,
        };
        assert_eq!(
            lower_command(&command, "Test", ProgramCounter::new()),
            Err(TranslateError::InvalidOperation {
                segment: Segment::Constant,
                operation: "pop into",
            })
        );
    }

    #[test]
    fn test_out_of_range_emits_nothing() {
        let command = Command::Push {
            segment: Segment::Static,
            index: 241,
        };
        let result = lower_command(&command, "Test", ProgramCounter::new().advanced(6));
        assert_eq!(
            result,
            Err(TranslateError::IndexOutOfRange {
                segment: Segment::Static,
                index: 241,
                max: 240,
            })
        );
    }
}
