//! Core emitter struct and main emit logic.

use std::collections::BTreeSet;

use crate::Result;
use crate::generator::CompiledUnit;

use super::EmitConfig;

/// Rust emitter for one compiled unit.
pub struct Emitter<'a> {
    pub(super) unit: &'a CompiledUnit,
    pub(super) config: EmitConfig,

    /// Names already used (for collision avoidance)
    pub(super) used_names: BTreeSet<String>,
    /// Current indentation level
    pub(super) indent: usize,
    /// Output buffer
    pub(super) output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(unit: &'a CompiledUnit, config: EmitConfig) -> Self {
        Self {
            unit,
            config,
            used_names: BTreeSet::new(),
            indent: 0,
            output: String::new(),
        }
    }

    /// Emit structs and functions for the unit.
    pub fn emit(mut self) -> Result<String> {
        tracing::debug!(function = %self.unit.function_name, "emit rust");
        let names = self.assign_names();

        if !self.config.header.is_empty() {
            let header = self.config.header.clone();
            self.line(&header);
            self.blank();
        }

        self.emit_params_struct(&names)?;
        self.emit_system_struct(&names)?;
        self.emit_result_structs(&names)?;
        self.emit_query_fn(&names);
        self.emit_scan_fn(&names);
        if self.config.iterator {
            self.emit_iter_fn(&names)?;
        }

        // Ensure exactly one trailing newline
        self.output.truncate(self.output.trim_end().len());
        self.output.push('\n');
        Ok(self.output)
    }

    /// `pub ` when exporting.
    pub(super) fn vis(&self) -> &'static str {
        if self.config.export { "pub " } else { "" }
    }

    pub(super) fn rt(&self) -> &str {
        &self.config.runtime
    }

    pub(super) fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub(super) fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Write `head {`, run `body` one level deeper, then write `}`.
    pub(super) fn block(&mut self, head: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("{head} {{"));
        self.indent += 1;
        body(self);
        self.indent -= 1;
        self.line("}");
    }
}
