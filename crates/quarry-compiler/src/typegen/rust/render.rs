//! Parameter and result struct rendering.

use quarry_core::ResponseColumn;
use quarry_ir::HierarchyNode;

use super::Emitter;
use super::naming::{ItemNames, field};
use super::types::{TypeContext, optional, rust_type};
use crate::{Result, ResultShape};

/// One field of a generated struct.
struct FieldDecl {
    name: String,
    rename: Option<String>,
    ty: String,
}

impl FieldDecl {
    fn new(source: &str, ty: String) -> Self {
        let (name, rename) = field(source);
        Self {
            name,
            rename: rename.map(str::to_string),
            ty,
        }
    }
}

impl Emitter<'_> {
    pub(super) fn emit_params_struct(&mut self, names: &ItemNames) -> Result<()> {
        let Some(name) = &names.params else {
            return Ok(());
        };
        let unit = self.unit;
        let mut fields = Vec::new();
        for (param, decl) in &unit.parameters {
            let ty = rust_type(&decl.ty, TypeContext::Parameter(param.clone()), self.rt())?;
            let ty = if decl.optional { optional(ty) } else { ty };
            fields.push(FieldDecl::new(param, ty));
        }
        self.emit_struct(name, "Debug, Clone, serde::Serialize", &fields);
        Ok(())
    }

    pub(super) fn emit_system_struct(&mut self, names: &ItemNames) -> Result<()> {
        let Some(name) = &names.system else {
            return Ok(());
        };
        let unit = self.unit;
        let mut fields = Vec::new();
        for (param, decl) in &unit.implicit {
            let context = TypeContext::ImplicitParameter(param.clone());
            fields.push(FieldDecl::new(param, rust_type(&decl.ty, context, self.rt())?));
        }
        self.emit_struct(name, "Debug, Clone, serde::Serialize", &fields);
        Ok(())
    }

    pub(super) fn emit_result_structs(&mut self, names: &ItemNames) -> Result<()> {
        let Some(result) = &names.result else {
            return Ok(());
        };
        let unit = self.unit;
        let derives = "Debug, Clone, PartialEq, serde::Deserialize";
        match &unit.result {
            ResultShape::None => {}
            ResultShape::Rows { columns } => {
                let fields = self.column_fields(columns.iter(), false)?;
                self.emit_struct(result, derives, &fields);
            }
            ResultShape::Hierarchical { hierarchy, .. } => {
                let mut fields = self.column_fields(hierarchy.root.fields.iter(), false)?;
                fields.extend(self.child_fields(hierarchy.children_of(&[]), names));
                self.emit_struct(result, derives, &fields);

                for node in hierarchy.nodes() {
                    let mut fields = self.column_fields(node.columns(), true)?;
                    fields.extend(self.child_fields(hierarchy.children_of(&node.path), names));
                    self.emit_struct(names.node(&node.key()), derives, &fields);
                }
            }
        }
        Ok(())
    }

    fn column_fields<'c>(
        &self,
        columns: impl Iterator<Item = &'c ResponseColumn>,
        leaf: bool,
    ) -> Result<Vec<FieldDecl>> {
        let mut fields = Vec::new();
        for column in columns {
            let context = TypeContext::Column(column.name.clone());
            let ty = rust_type(&column.ty, context, self.rt())?;
            let ty = if column.nullable { optional(ty) } else { ty };
            let source = if leaf { column.leaf() } else { &column.name };
            fields.push(FieldDecl::new(source, ty));
        }
        Ok(fields)
    }

    fn child_fields<'h>(
        &self,
        children: impl Iterator<Item = &'h HierarchyNode>,
        names: &ItemNames,
    ) -> Vec<FieldDecl> {
        children
            .map(|child| FieldDecl::new(child.slot(), format!("Vec<{}>", names.node(&child.key()))))
            .collect()
    }

    fn emit_struct(&mut self, name: &str, derives: &str, fields: &[FieldDecl]) {
        let vis = self.vis();
        self.line(&format!("#[derive({derives})]"));
        if fields.is_empty() {
            self.line(&format!("{vis}struct {name} {{}}"));
            self.blank();
            return;
        }
        self.block(&format!("{vis}struct {name}"), |e| {
            for f in fields {
                if let Some(rename) = &f.rename {
                    e.line(&format!("#[serde(rename = {rename:?})]"));
                }
                e.line(&format!("{vis}{}: {},", f.name, f.ty));
            }
        });
        self.blank();
    }
}
