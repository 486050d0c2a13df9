//! Names of generated items.

use quarry_core::utils::{is_identifier, to_pascal_case, to_rust_ident};

use super::Emitter;

/// Names assigned before emission.
#[derive(Clone, Debug)]
pub(super) struct ItemNames {
    pub params: Option<String>,
    pub system: Option<String>,
    pub result: Option<String>,
    /// Struct name per hierarchy node key, in hierarchy order.
    pub nodes: Vec<(String, String)>,
    /// snake_case function stem.
    pub function: String,
}

impl ItemNames {
    pub fn node(&self, key: &str) -> &str {
        self.nodes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, name)| name.as_str())
            .unwrap_or_default()
    }
}

impl Emitter<'_> {
    pub(super) fn assign_names(&mut self) -> ItemNames {
        let unit = self.unit;
        let base = to_pascal_case(&unit.function_name);

        let params = (!unit.parameters.is_empty()).then(|| self.unique_name(&format!("{base}Params")));
        let system = (!unit.implicit.is_empty()).then(|| self.unique_name(&format!("{base}System")));
        let result = (unit.result != crate::ResultShape::None)
            .then(|| self.unique_name(&format!("{base}Result")));

        let nodes = match unit.hierarchy() {
            Some(hierarchy) => hierarchy
                .nodes()
                .map(|node| {
                    let name = self.unique_name(&format!("{base}_{}", node.path.join("_")));
                    (node.key(), name)
                })
                .collect(),
            None => Vec::new(),
        };

        ItemNames {
            params,
            system,
            result,
            nodes,
            function: to_rust_ident(&unit.function_name),
        }
    }

    pub(super) fn unique_name(&mut self, base: &str) -> String {
        let base = to_pascal_case(base);
        if self.used_names.insert(base.clone()) {
            return base;
        }

        let mut counter = 2;
        loop {
            let name = format!("{}{}", base, counter);
            if self.used_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }
}

/// Local variable name for a compiler-assigned variable. Names that are
/// already identifiers (raw ones included) are kept.
pub(super) fn var(name: &str) -> String {
    if name.starts_with("r#") || is_identifier(name) {
        name.to_string()
    } else {
        to_rust_ident(name)
    }
}

/// Field declaration name plus an optional serde rename.
pub(super) fn field(name: &str) -> (String, Option<&str>) {
    let ident = to_rust_ident(name);
    let bare = ident.strip_prefix("r#").unwrap_or(&ident);
    let rename = (bare != name).then_some(name);
    (ident, rename)
}
