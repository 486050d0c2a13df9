//! Compiled SQL assembly.

use quarry_core::{Dialect, ExprRef};

use crate::access::ResolvedAccess;

/// One bound argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    /// Value of a template expression. NULL when the access is invalid.
    Value { expr: ExprRef, access: ResolvedAccess },
    /// Value supplied by the caller's system context.
    System { field: String },
}

impl Argument {
    pub fn system_field(&self) -> Option<&str> {
        match self {
            Argument::Value { .. } => None,
            Argument::System { field } => Some(field),
        }
    }
}

/// Condition under which a separator is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeparatorGuard {
    /// Inside a loop: the current element is not the last one.
    NotLast(String),
    /// Outside loops: a clause was emitted since the last boundary.
    BoundaryNeeded(String),
}

/// One `if`/`else if` arm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub cond_var: String,
    pub access: ResolvedAccess,
    pub body: Vec<GenStatement>,
}

/// Truthiness probe of a fallback block, evaluated once per distinct expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackProbe {
    pub var: String,
    pub expr: ExprRef,
    pub access: ResolvedAccess,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackLiteral {
    /// Probe variable.
    pub probe: String,
    pub when: bool,
}

/// Statement of the run-time SQL builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenStatement {
    /// Boolean flag, initially false.
    DeclareFlag { var: String },
    SetFlag { var: String, value: bool },
    /// SQL text with `?` placeholders, joined with smart spacing.
    AppendFragment(String),
    /// Separator written verbatim.
    AppendSeparator {
        token: String,
        guard: SeparatorGuard,
    },
    AppendArg(Argument),
    If {
        branches: Vec<Branch>,
        otherwise: Option<Vec<GenStatement>>,
    },
    Loop {
        collection_var: String,
        access: ResolvedAccess,
        item_var: String,
        is_last_var: Option<String>,
        body: Vec<GenStatement>,
    },
    /// Active when no combination is given or any combination holds.
    Fallback {
        active_var: String,
        probes: Vec<FallbackProbe>,
        combos: Vec<Vec<FallbackLiteral>>,
        text: String,
        guard_var: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryBody {
    /// Final SQL text, placeholders already in dialect form.
    Static {
        text: String,
        arguments: Vec<Argument>,
    },
    Dynamic { statements: Vec<GenStatement> },
}

/// Template parameter and the variable it is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamBinding {
    pub name: String,
    pub var: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledQuery {
    pub function_name: String,
    pub dialect: Dialect,
    pub bindings: Vec<ParamBinding>,
    pub body: QueryBody,
    /// The statement carries a row-lock marker; the clause is produced at
    /// run time by the dialect helper.
    pub needs_row_lock_clause: bool,
    /// Flag set when the WHERE fallback was emitted.
    pub fallback_guard: Option<String>,
}

impl CompiledQuery {
    pub fn is_static(&self) -> bool {
        matches!(self.body, QueryBody::Static { .. })
    }

    /// All arguments in instruction order (for dynamic queries: the order in
    /// which they appear in the statement tree).
    pub fn arguments(&self) -> Vec<&Argument> {
        let mut out = Vec::new();
        match &self.body {
            QueryBody::Static { arguments, .. } => out.extend(arguments),
            QueryBody::Dynamic { statements } => collect_arguments(statements, &mut out),
        }
        out
    }

    /// System field per argument position, `None` for value arguments.
    pub fn argument_system_fields(&self) -> Vec<Option<&str>> {
        self.arguments()
            .into_iter()
            .map(Argument::system_field)
            .collect()
    }

    pub fn has_system_arguments(&self) -> bool {
        self.arguments()
            .iter()
            .any(|arg| matches!(arg, Argument::System { .. }))
    }
}

fn collect_arguments<'a>(statements: &'a [GenStatement], out: &mut Vec<&'a Argument>) {
    for stmt in statements {
        match stmt {
            GenStatement::AppendArg(arg) => out.push(arg),
            GenStatement::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    collect_arguments(&branch.body, out);
                }
                if let Some(body) = otherwise {
                    collect_arguments(body, out);
                }
            }
            GenStatement::Loop { body, .. } => collect_arguments(body, out),
            _ => {}
        }
    }
}
