use quarry_core::{Affinity, ResponseColumn};
use quarry_ir::{
    Attach, FieldCopy, Hierarchy, HierarchyNode, KeyColumn, NodeScan, ScanStatement,
};

use super::HierarchyError;

/// Variable holding the current row's root key; the chain key of depth 0.
pub const ROOT_KEY_VAR: &str = "root_key";

fn chain_var(node: &HierarchyNode) -> String {
    format!("chain_{}", node.key())
}

fn key_columns(columns: &[ResponseColumn]) -> Vec<KeyColumn> {
    columns
        .iter()
        .map(|c| KeyColumn {
            column: c.name.clone(),
            nullable: c.nullable,
        })
        .collect()
}

fn child_slots(hierarchy: &Hierarchy, path: &[String]) -> Vec<String> {
    hierarchy
        .children_of(path)
        .map(|n| n.slot().to_string())
        .collect()
}

/// Compile the single-pass row folding program.
///
/// Nodes are visited in depth order so that a parent's chain key is always
/// computed before its children's. `One` affinity collects exactly one root;
/// anything else collects every root.
pub fn compile_scan(
    hierarchy: &Hierarchy,
    affinity: Affinity,
) -> Result<Vec<ScanStatement>, HierarchyError> {
    if hierarchy.is_empty() {
        return Err(HierarchyError::NoGroups);
    }

    let root = &hierarchy.root;
    let mut body = vec![
        ScanStatement::RootKey {
            var: ROOT_KEY_VAR.to_string(),
            columns: key_columns(&root.key_fields),
        },
        ScanStatement::GetOrCreateRoot {
            key_var: ROOT_KEY_VAR.to_string(),
            fields: root
                .fields
                .iter()
                .map(|c| FieldCopy {
                    column: c.name.clone(),
                    field: c.name.clone(),
                })
                .collect(),
            child_slots: child_slots(hierarchy, &[]),
        },
    ];

    for node in hierarchy.nodes() {
        let (parent_chain, attach) = match hierarchy.parent_of(node) {
            Some(parent) => (
                chain_var(parent),
                Attach::Ancestor { path: parent.key() },
            ),
            None => (ROOT_KEY_VAR.to_string(), Attach::Root),
        };
        body.push(ScanStatement::Node(NodeScan {
            path: node.key(),
            slot: node.slot().to_string(),
            depth: node.depth(),
            parent_chain,
            chain_var: chain_var(node),
            key_columns: key_columns(&node.key_fields),
            fields: node
                .columns()
                .map(|c| FieldCopy {
                    column: c.name.clone(),
                    field: c.leaf().to_string(),
                })
                .collect(),
            child_slots: child_slots(hierarchy, &node.path),
            attach,
        }));
    }

    let collect = match affinity {
        Affinity::One => ScanStatement::CollectOne,
        Affinity::Many | Affinity::None => ScanStatement::CollectMany,
    };
    tracing::debug!(nodes = hierarchy.len(), ?affinity, "compiled scan program");
    Ok(vec![ScanStatement::ForEachRow(body), collect])
}
