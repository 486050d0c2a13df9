use indexmap::IndexMap;
use quarry_core::{PATH_SEPARATOR, ResponseColumn};
use quarry_ir::{Hierarchy, HierarchyNode, RootGroup};

use super::HierarchyError;

/// Group path-encoded columns into a node tree.
///
/// A nested column belongs to the node named by its path; it keys that node
/// when its key level is one more than the node depth. Every ancestor of a
/// node must itself be a node with key fields.
pub fn build_nodes(columns: &[ResponseColumn]) -> Result<Hierarchy, HierarchyError> {
    if columns.is_empty() {
        return Err(HierarchyError::NoResponseColumns);
    }

    let mut flat = Vec::new();
    let mut groups: IndexMap<Vec<String>, Vec<&ResponseColumn>> = IndexMap::new();
    for column in columns {
        if column.is_nested() {
            let path = column.path().into_iter().map(str::to_string).collect();
            groups.entry(path).or_default().push(column);
        } else {
            flat.push(column.clone());
        }
    }

    let root = RootGroup {
        key_fields: root_key(&flat)?,
        fields: flat,
    };

    let mut nodes = Vec::with_capacity(groups.len());
    for (path, columns) in &groups {
        for len in 1..path.len() {
            if !groups.contains_key(&path[..len]) {
                return Err(HierarchyError::NoKeyFields {
                    node: path[..len].join(PATH_SEPARATOR),
                    level: len + 1,
                });
            }
        }

        let depth = path.len();
        let (key_fields, data_fields): (Vec<ResponseColumn>, Vec<ResponseColumn>) = columns
            .iter()
            .map(|c| (*c).clone())
            .partition(|c| c.key_level as usize == depth + 1);
        if key_fields.is_empty() {
            return Err(HierarchyError::NoKeyFields {
                node: path.join(PATH_SEPARATOR),
                level: depth + 1,
            });
        }

        nodes.push(HierarchyNode {
            path: path.clone(),
            parent_path: path[..depth - 1].to_vec(),
            key_fields,
            data_fields,
        });
    }

    let hierarchy = Hierarchy::new(root, nodes);
    tracing::debug!(
        nodes = hierarchy.len(),
        root_key = ?hierarchy.root.key_fields.first().map(|c| &c.name),
        "built result hierarchy"
    );
    Ok(hierarchy)
}

/// The annotated level-1 column, else the first `id`/`*_id` column.
fn root_key(flat: &[ResponseColumn]) -> Result<Vec<ResponseColumn>, HierarchyError> {
    let annotated: Vec<&ResponseColumn> = flat.iter().filter(|c| c.key_level == 1).collect();
    match annotated.as_slice() {
        [key] => return Ok(vec![(*key).clone()]),
        [] => {}
        many => {
            return Err(HierarchyError::MultipleRootKeys { count: many.len() });
        }
    }

    flat.iter()
        .find(|c| is_id_name(&c.name))
        .map(|c| vec![c.clone()])
        .ok_or(HierarchyError::NoParentPrimaryKey)
}

fn is_id_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "id" || lower.ends_with("_id")
}
