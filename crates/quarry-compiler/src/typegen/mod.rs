//! Source generation from compiled units.
//!
//! Currently supports Rust: parameter and result structs, a query builder
//! function and a row scanner, all calling into the `quarry-vm` runtime.
//!
//! # Example
//!
//! ```ignore
//! use quarry_compiler::{Generator, typegen::rust};
//!
//! let compiled = Generator::new().compile_unit(&unit)?;
//! let source = rust::emit(&compiled)?;
//! ```

pub mod rust;
