//! Instruction lowering ahead of SQL assembly.

use quarry_core::Instruction;

use super::spacing::join_fragments;

/// Rewrite `EmitEval` into a `?` fragment plus `AddParam`, then merge
/// adjacent static fragments.
pub fn lower(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut out: Vec<Instruction> = Vec::with_capacity(instructions.len());
    for inst in instructions {
        match inst {
            Instruction::EmitStatic { value } => push_static(&mut out, value),
            Instruction::EmitEval { expr } => {
                push_static(&mut out, "?");
                out.push(Instruction::AddParam { expr: *expr });
            }
            other => out.push(other.clone()),
        }
    }
    out
}

fn push_static(out: &mut Vec<Instruction>, text: &str) {
    if let Some(Instruction::EmitStatic { value }) = out.last_mut() {
        join_fragments(value, text);
    } else {
        out.push(Instruction::EmitStatic {
            value: text.to_string(),
        });
    }
}
