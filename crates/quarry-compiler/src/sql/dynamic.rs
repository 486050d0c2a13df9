//! Dynamic path: flat instruction stream to a nested statement tree.
//!
//! Blocks are rebuilt with an explicit control stack. Each open `If` or
//! `LoopStart` pushes a frame that owns the body under construction; the
//! matching `End`/`LoopEnd` pops it and appends the finished block to the
//! enclosing body.

use std::mem;

use indexmap::IndexMap;
use quarry_core::{ExprRef, Instruction, RemovalLiteral};
use quarry_ir::{
    Branch, FallbackLiteral, FallbackProbe, GenStatement, QueryBody, ResolvedAccess,
    SeparatorGuard,
};

use super::compiler::SqlCompiler;
use super::spacing::{normalize_fragment, pad_boundary_token};
use crate::resolve::AccessMode;
use crate::{Error, Result};

const BOUNDARY_FLAG: &str = "boundary_needed";
const FALLBACK_GUARD: &str = "fallback_triggered";
const DEFAULT_FALLBACK: &str = "1 = 1";

enum Arm {
    Cond {
        cond_var: String,
        access: ResolvedAccess,
    },
    Else,
}

enum Frame {
    If {
        index: usize,
        branches: Vec<Branch>,
        arm: Arm,
        body: Vec<GenStatement>,
    },
    Loop {
        index: usize,
        collection_var: String,
        access: ResolvedAccess,
        item_var: String,
        is_last_var: Option<String>,
        body: Vec<GenStatement>,
    },
}

impl Frame {
    fn body_mut(&mut self) -> &mut Vec<GenStatement> {
        match self {
            Frame::If { body, .. } | Frame::Loop { body, .. } => body,
        }
    }
}

#[derive(Default)]
struct Blocks {
    root: Vec<GenStatement>,
    /// Innermost frame is at the end.
    frames: Vec<Frame>,
}

impl Blocks {
    fn push(&mut self, stmt: GenStatement) {
        match self.frames.last_mut() {
            Some(frame) => frame.body_mut().push(stmt),
            None => self.root.push(stmt),
        }
    }

    fn in_loop(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::Loop { .. }))
    }

    fn innermost_is_last(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Loop { is_last_var, .. } => Some(is_last_var.as_deref()),
            Frame::If { .. } => None,
        })?
    }
}

fn unbalanced(inst: &Instruction, index: usize) -> Error {
    Error::UnbalancedBlock {
        opcode: inst.opcode(),
        index,
    }
}

/// Any separator or boundary handling requires per-iteration `is_last`.
fn tracks_boundaries(instructions: &[Instruction]) -> bool {
    instructions.iter().any(|inst| {
        matches!(
            inst,
            Instruction::EmitUnlessBoundary { .. }
                | Instruction::Boundary
                | Instruction::LoopStart { .. }
        )
    })
}

/// The `boundary_needed` flag only exists for separators outside loops.
fn needs_boundary_flag(instructions: &[Instruction]) -> bool {
    let mut depth = 0usize;
    for inst in instructions {
        match inst {
            Instruction::LoopStart { .. } => depth += 1,
            Instruction::LoopEnd => depth = depth.saturating_sub(1),
            Instruction::EmitUnlessBoundary { .. } | Instruction::Boundary if depth == 0 => {
                return true;
            }
            _ => {}
        }
    }
    false
}

/// A separator outside loops is dropped at compile time when nothing can
/// follow it inside the current clause.
fn separator_suppressed(next: Option<&Instruction>) -> bool {
    match next {
        None | Some(Instruction::End | Instruction::Boundary) => true,
        Some(Instruction::EmitStatic { value }) => value.trim_start().starts_with(')'),
        Some(_) => false,
    }
}

impl SqlCompiler<'_> {
    pub(super) fn compile_dynamic(
        &mut self,
        instructions: &[Instruction],
    ) -> Result<(QueryBody, Option<String>)> {
        let tracks_boundaries = tracks_boundaries(instructions);
        let boundary_flag = needs_boundary_flag(instructions).then(|| BOUNDARY_FLAG.to_string());
        let fallback_guard = instructions
            .iter()
            .any(|inst| matches!(inst, Instruction::FallbackCondition { .. }))
            .then(|| FALLBACK_GUARD.to_string());

        let mut blocks = Blocks::default();
        for var in boundary_flag.iter().chain(&fallback_guard) {
            blocks.push(GenStatement::DeclareFlag { var: var.clone() });
        }

        for (index, inst) in instructions.iter().enumerate() {
            let next = instructions.get(index + 1);
            match inst {
                Instruction::EmitStatic { value } => {
                    blocks.push(GenStatement::AppendFragment(normalize_fragment(value)));
                    if let Some(flag) = &boundary_flag
                        && !blocks.in_loop()
                        && !matches!(next, Some(Instruction::EmitUnlessBoundary { .. }))
                    {
                        blocks.push(GenStatement::SetFlag {
                            var: flag.clone(),
                            value: true,
                        });
                    }
                }
                Instruction::EmitEval { expr } | Instruction::AddParam { expr } => {
                    let arg = self.value_argument(*expr)?;
                    blocks.push(GenStatement::AppendArg(arg));
                }
                Instruction::AddSystemParam { field } => {
                    blocks.push(GenStatement::AppendArg(quarry_ir::Argument::System {
                        field: field.clone(),
                    }));
                }
                Instruction::If { expr } => {
                    let access = self.resolve(*expr, AccessMode::Value)?;
                    let cond_var = self.fresh_label("cond");
                    blocks.frames.push(Frame::If {
                        index,
                        branches: Vec::new(),
                        arm: Arm::Cond { cond_var, access },
                        body: Vec::new(),
                    });
                }
                Instruction::ElseIf { expr } => {
                    let access = self.resolve(*expr, AccessMode::Value)?;
                    let cond_var = self.fresh_label("cond");
                    self.next_arm(&mut blocks, Arm::Cond { cond_var, access }, inst, index)?;
                }
                Instruction::Else => {
                    self.next_arm(&mut blocks, Arm::Else, inst, index)?;
                }
                Instruction::End => {
                    let Some(Frame::If {
                        mut branches,
                        arm,
                        body,
                        ..
                    }) = blocks.frames.pop()
                    else {
                        return Err(unbalanced(inst, index));
                    };
                    let otherwise = match arm {
                        Arm::Cond { cond_var, access } => {
                            branches.push(Branch {
                                cond_var,
                                access,
                                body,
                            });
                            None
                        }
                        Arm::Else => Some(body),
                    };
                    blocks.push(GenStatement::If {
                        branches,
                        otherwise,
                    });
                }
                Instruction::LoopStart { collection, item } => {
                    let access = self.resolve(*collection, AccessMode::Iterable)?;
                    let collection_var = self.fresh_label("collection");
                    let item_var = self.scope.bind_loop_item(item);
                    let is_last_var = tracks_boundaries.then(|| format!("{item_var}_is_last"));
                    blocks.frames.push(Frame::Loop {
                        index,
                        collection_var,
                        access,
                        item_var,
                        is_last_var,
                        body: Vec::new(),
                    });
                }
                Instruction::LoopEnd => {
                    let Some(Frame::Loop {
                        collection_var,
                        access,
                        item_var,
                        is_last_var,
                        body,
                        ..
                    }) = blocks.frames.pop()
                    else {
                        return Err(unbalanced(inst, index));
                    };
                    self.scope.pop();
                    blocks.push(GenStatement::Loop {
                        collection_var,
                        access,
                        item_var,
                        is_last_var,
                        body,
                    });
                }
                Instruction::Boundary => {
                    if let Some(flag) = &boundary_flag {
                        blocks.push(GenStatement::SetFlag {
                            var: flag.clone(),
                            value: false,
                        });
                    }
                }
                Instruction::EmitUnlessBoundary { token } => {
                    let token = pad_boundary_token(token);
                    if blocks.in_loop() {
                        if let Some(last) = blocks.innermost_is_last() {
                            let guard = SeparatorGuard::NotLast(last.to_string());
                            blocks.push(GenStatement::AppendSeparator { token, guard });
                        }
                    } else if !separator_suppressed(next)
                        && let Some(flag) = &boundary_flag
                    {
                        let guard = SeparatorGuard::BoundaryNeeded(flag.clone());
                        blocks.push(GenStatement::AppendSeparator { token, guard });
                    }
                }
                Instruction::EmitSystemFor { .. } => {}
                Instruction::FallbackCondition { value, combos } => {
                    let stmt = self.fallback(value, combos, fallback_guard.as_deref())?;
                    blocks.push(stmt);
                }
            }
        }

        if let Some(frame) = blocks.frames.last() {
            let (index, opcode) = match frame {
                Frame::If { index, .. } => (*index, "IF"),
                Frame::Loop { index, .. } => (*index, "LOOP_START"),
            };
            return Err(Error::UnbalancedBlock { opcode, index });
        }

        Ok((
            QueryBody::Dynamic {
                statements: blocks.root,
            },
            fallback_guard,
        ))
    }

    /// Close the current arm of the innermost `If` and open `arm`.
    fn next_arm(
        &mut self,
        blocks: &mut Blocks,
        next: Arm,
        inst: &Instruction,
        index: usize,
    ) -> Result<()> {
        let Some(Frame::If {
            branches,
            arm,
            body,
            ..
        }) = blocks.frames.last_mut()
        else {
            return Err(unbalanced(inst, index));
        };
        if matches!(arm, Arm::Else) {
            return Err(unbalanced(inst, index));
        }
        if let Arm::Cond { cond_var, access } = mem::replace(arm, next) {
            branches.push(Branch {
                cond_var,
                access,
                body: mem::take(body),
            });
        }
        Ok(())
    }

    fn fallback(
        &mut self,
        text: &str,
        combos: &[Vec<RemovalLiteral>],
        guard: Option<&str>,
    ) -> Result<GenStatement> {
        let label = self.fresh_label("fallback");
        let mut probe_vars: IndexMap<ExprRef, String> = IndexMap::new();
        let mut probes = Vec::new();
        for literal in combos.iter().flatten() {
            if probe_vars.contains_key(&literal.expr) {
                continue;
            }
            let var = format!("{label}_probe{}", probe_vars.len());
            let access = self.resolve(literal.expr, AccessMode::Value)?;
            probes.push(FallbackProbe {
                var: var.clone(),
                expr: literal.expr,
                access,
            });
            probe_vars.insert(literal.expr, var);
        }

        let combos = combos
            .iter()
            .map(|combo| {
                combo
                    .iter()
                    .map(|literal| FallbackLiteral {
                        probe: probe_vars[&literal.expr].clone(),
                        when: literal.when,
                    })
                    .collect()
            })
            .collect();

        let text = if text.trim().is_empty() {
            DEFAULT_FALLBACK
        } else {
            text
        };

        Ok(GenStatement::Fallback {
            active_var: format!("{label}_active"),
            probes,
            combos,
            text: normalize_fragment(text),
            guard_var: guard.map(str::to_string),
        })
    }
}
