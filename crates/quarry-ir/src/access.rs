//! Resolved expression access.
//!
//! A path like `user?.address.city` resolves to a short straight-line
//! program over temporaries:
//!
//! ```text
//! tmp0 = user
//! ok1 = true
//! if ok1 { if tmp0 != null { tmp0 = tmp0.address } else { ok1 = false } }
//! if ok1 { tmp0 = tmp0.city }
//! ```
//!
//! The program is target-neutral: the Rust emitter prints it and the
//! interpreter executes it.

use quarry_core::Step;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessStmt {
    /// Introduce `var` as an alias of the bound variable `source`.
    Alias { var: String, source: String },
    /// Declare the validity flag, initially true.
    InitValid { var: String },
    /// Apply one step to `var` in place. With `valid` set, the step only
    /// runs while the flag is still true; a safe step whose guard fails
    /// clears the flag instead.
    Apply {
        var: String,
        step: Step,
        valid: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAccess {
    /// Variable holding the final value.
    pub result_var: String,
    pub setup: Vec<AccessStmt>,
    /// Flag that is false when a safe step short-circuited.
    pub validity_var: Option<String>,
}

impl ResolvedAccess {
    /// Access that reads a bound variable directly.
    pub fn direct(var: impl Into<String>) -> Self {
        Self {
            result_var: var.into(),
            setup: Vec::new(),
            validity_var: None,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.setup.is_empty()
    }
}
