//! Rust emitter for compiled units.

mod config;
mod emitter;
mod naming;
mod query;
mod render;
mod scan;
mod types;

#[cfg(test)]
mod scan_tests;

pub use config::EmitConfig;
pub use emitter::Emitter;
pub use types::{TypeContext, UnsupportedTypeError, rust_type};

use crate::Result;
use crate::generator::CompiledUnit;

/// Emit Rust source for a compiled unit.
pub fn emit(unit: &CompiledUnit) -> Result<String> {
    Emitter::new(unit, EmitConfig::default()).emit()
}

/// Emit Rust source for a compiled unit with custom config.
pub fn emit_with_config(unit: &CompiledUnit, config: EmitConfig) -> Result<String> {
    Emitter::new(unit, config).emit()
}
