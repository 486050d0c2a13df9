//! Expression path resolution.
//!
//! Turns `root.step.step...` into a straight-line access program over one
//! temporary. Safe steps are guarded and clear a shared validity flag on
//! failure; once the flag exists every later step runs only while it holds.

use quarry_core::Expression;
use quarry_ir::{AccessStmt, ResolvedAccess};

use crate::Result;
use crate::scope::Scope;

/// What the resolved value is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Value,
    /// The value is iterated by a loop.
    Iterable,
}

/// Resolver with a temp counter shared by every access of a unit.
#[derive(Debug, Default)]
pub struct Resolver {
    next_temp: u32,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.next_temp = 0;
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    pub fn resolve(
        &mut self,
        expr: &Expression,
        scope: &Scope,
        mode: AccessMode,
    ) -> Result<ResolvedAccess> {
        let root_var = scope.lookup(expr.root())?;
        let steps = expr.steps();
        tracing::trace!(%expr, ?mode, root_var, "resolve expression");

        if steps.is_empty() {
            return Ok(ResolvedAccess::direct(root_var));
        }

        let temp = self.fresh("tmp");
        let mut setup = vec![AccessStmt::Alias {
            var: temp.clone(),
            source: root_var.to_string(),
        }];

        let validity_var = if steps.iter().any(|s| s.is_safe()) {
            let ok = self.fresh("ok");
            setup.push(AccessStmt::InitValid { var: ok.clone() });
            Some(ok)
        } else {
            None
        };

        for step in steps {
            setup.push(AccessStmt::Apply {
                var: temp.clone(),
                step: step.clone(),
                valid: validity_var.clone(),
            });
        }

        Ok(ResolvedAccess {
            result_var: temp,
            setup,
            validity_var,
        })
    }
}
