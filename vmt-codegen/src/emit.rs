//! Assembly text emission
//!
//! A pure formatting layer: renders lowered instructions one per line via
//! their `Display` impls. All addressing and counting decisions are made
//! before instructions reach this point.

use hack_asm::AsmInst;

/// Render instructions as assembly text, one per line.
pub fn emit_instructions(insts: &[AsmInst]) -> String {
    let mut out = String::new();
    for inst in insts {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hack_asm::{Comp, Dest};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emits_one_line_per_instruction() {
        let insts = vec![
            AsmInst::Comment("push constant 2".to_string()),
            AsmInst::A(2),
            AsmInst::c(Dest::D, Comp::A),
        ];
        assert_eq!(emit_instructions(&insts), "// push constant 2\n@2\nD=A\n");
    }

    #[test]
    fn test_empty_sequence_emits_nothing() {
        assert_eq!(emit_instructions(&[]), "");
    }
}
