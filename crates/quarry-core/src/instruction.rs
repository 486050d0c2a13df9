//! SQL assembly instructions.
//!
//! The stream is flat: `If`/`LoopStart` open blocks that the matching
//! `End`/`LoopEnd` close. Expressions are referenced by position in the
//! unit's [`ExpressionCatalog`](crate::ExpressionCatalog).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index into the expression catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprRef(pub u32);

impl ExprRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// One literal of a fallback removal combination: the combination holds
/// when `expr` evaluates to `when`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalLiteral {
    pub expr: ExprRef,
    pub when: bool,
}

/// A single SQL assembly instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction {
    /// Literal SQL text. May contain `?` placeholders.
    EmitStatic { value: String },
    /// Expression rendered as a bound placeholder.
    EmitEval { expr: ExprRef },
    /// Bind the value of an expression as the next argument.
    AddParam { expr: ExprRef },
    /// Bind a system-provided field (e.g. `updated_at`) as the next argument.
    AddSystemParam { field: String },
    If { expr: ExprRef },
    ElseIf { expr: ExprRef },
    Else,
    End,
    LoopStart { collection: ExprRef, item: String },
    LoopEnd,
    /// Marks the end of a delimited clause list.
    Boundary,
    /// Separator emitted only between clauses that were actually emitted.
    EmitUnlessBoundary { token: String },
    /// Placeholder for a system clause (row locking).
    EmitSystemFor { marker: String },
    /// Safety-net predicate for a WHERE clause whose conditions may all vanish.
    FallbackCondition {
        #[serde(default)]
        value: String,
        #[serde(default)]
        combos: Vec<Vec<RemovalLiteral>>,
    },
}

impl Instruction {
    /// Whether this instruction requires run-time SQL assembly.
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            Instruction::If { .. }
                | Instruction::ElseIf { .. }
                | Instruction::Else
                | Instruction::End
                | Instruction::LoopStart { .. }
                | Instruction::LoopEnd
                | Instruction::Boundary
                | Instruction::EmitUnlessBoundary { .. }
                | Instruction::FallbackCondition { .. }
        )
    }

    /// Short opcode name, as used in dumps and error messages.
    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::EmitStatic { .. } => "EMIT_STATIC",
            Instruction::EmitEval { .. } => "EMIT_EVAL",
            Instruction::AddParam { .. } => "ADD_PARAM",
            Instruction::AddSystemParam { .. } => "ADD_SYSTEM_PARAM",
            Instruction::If { .. } => "IF",
            Instruction::ElseIf { .. } => "ELSE_IF",
            Instruction::Else => "ELSE",
            Instruction::End => "END",
            Instruction::LoopStart { .. } => "LOOP_START",
            Instruction::LoopEnd => "LOOP_END",
            Instruction::Boundary => "BOUNDARY",
            Instruction::EmitUnlessBoundary { .. } => "EMIT_UNLESS_BOUNDARY",
            Instruction::EmitSystemFor { .. } => "EMIT_SYSTEM_FOR",
            Instruction::FallbackCondition { .. } => "FALLBACK_CONDITION",
        }
    }
}
