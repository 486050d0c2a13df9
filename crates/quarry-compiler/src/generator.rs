//! Per-unit orchestration: configuration, SQL assembly and result shape.

use indexmap::IndexMap;
use quarry_core::{Affinity, Dialect, ImplicitParameter, Parameter, QueryUnit, ResponseColumn};
use quarry_ir::{CompiledQuery, Hierarchy, ScanStatement};

use crate::Result;
use crate::hierarchy::{build_nodes, compile_scan};
use crate::scope::Scope;
use crate::sql::SqlCompiler;

/// How result rows are turned into values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultShape {
    /// No result set (affinity `none`, or no response columns).
    None,
    /// One value per row.
    Rows { columns: Vec<ResponseColumn> },
    /// Rows folded into nested objects.
    Hierarchical {
        hierarchy: Hierarchy,
        scan: Vec<ScanStatement>,
    },
}

/// Everything the emitter and the interpreter need for one unit.
#[derive(Clone, Debug)]
pub struct CompiledUnit {
    pub function_name: String,
    pub query: CompiledQuery,
    pub affinity: Affinity,
    pub parameters: IndexMap<String, Parameter>,
    pub implicit: IndexMap<String, ImplicitParameter>,
    pub result: ResultShape,
}

impl CompiledUnit {
    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        match &self.result {
            ResultShape::Hierarchical { hierarchy, .. } => Some(hierarchy),
            _ => None,
        }
    }
}

/// Compiles units one after another.
///
/// State derived from a unit lives only until the next unit starts, so a
/// single generator can be reused across a whole batch.
#[derive(Debug, Default)]
pub struct Generator {
    dialect: Option<Dialect>,
    hierarchy: Option<Hierarchy>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `dialect` for every unit, ignoring the units' own setting.
    pub fn with_dialect(dialect: Option<Dialect>) -> Self {
        Self {
            dialect,
            hierarchy: None,
        }
    }

    /// Hierarchy of the most recently compiled unit, if it had one.
    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    pub fn compile_unit(&mut self, unit: &QueryUnit) -> Result<CompiledUnit> {
        self.hierarchy = None;

        let dialect = match self.dialect {
            Some(dialect) => Some(dialect),
            None => Dialect::parse_optional(unit.dialect.as_deref())?,
        };
        let affinity = match unit.response_affinity.as_deref().map(str::trim) {
            None | Some("") => Affinity::default(),
            Some(name) => name.parse()?,
        };
        tracing::debug!(function = %unit.function_name, ?dialect, %affinity, "compile unit");

        let scope = Scope::with_parameters(unit.parameters.keys().map(String::as_str));
        let query = SqlCompiler::builder(&unit.expressions, scope)
            .dialect(dialect)
            .function_name(&unit.function_name)
            .build()
            .compile(&unit.instructions)?;

        let result = self.result_shape(&unit.responses, affinity)?;

        Ok(CompiledUnit {
            function_name: unit.function_name.clone(),
            query,
            affinity,
            parameters: unit.parameters.clone(),
            implicit: unit.implicit_parameters.clone(),
            result,
        })
    }

    fn result_shape(&mut self, columns: &[ResponseColumn], affinity: Affinity) -> Result<ResultShape> {
        if affinity == Affinity::None || columns.is_empty() {
            return Ok(ResultShape::None);
        }
        if !columns.iter().any(ResponseColumn::is_nested) {
            return Ok(ResultShape::Rows {
                columns: columns.to_vec(),
            });
        }

        let hierarchy = build_nodes(columns)?;
        let scan = compile_scan(&hierarchy, affinity)?;
        self.hierarchy = Some(hierarchy.clone());
        Ok(ResultShape::Hierarchical { hierarchy, scan })
    }
}
