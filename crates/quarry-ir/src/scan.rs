//! Row folding program for hierarchical results.
//!
//! The program runs once over all rows. Root objects are deduplicated by
//! their composite key, nested objects by a chain key that prefixes the
//! local key with every ancestor's key, so equal child keys under different
//! parents stay distinct.

/// Column that contributes to a composite key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyColumn {
    pub column: String,
    pub nullable: bool,
}

/// Copy of a row column into an object field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldCopy {
    pub column: String,
    pub field: String,
}

/// Where a newly created node is appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attach {
    /// Into the current root object.
    Root,
    /// Into the ancestor at `path`, found by the parent chain key.
    Ancestor { path: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeScan {
    /// Arena key (`lists__cards`).
    pub path: String,
    /// Field name in the parent object.
    pub slot: String,
    pub depth: usize,
    /// Chain key variable of the parent (the root key at depth 1).
    pub parent_chain: String,
    /// Variable receiving this node's chain key, unset when skipped.
    pub chain_var: String,
    pub key_columns: Vec<KeyColumn>,
    pub fields: Vec<FieldCopy>,
    pub child_slots: Vec<String>,
    pub attach: Attach,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanStatement {
    ForEachRow(Vec<ScanStatement>),
    /// Composite root key; nullable columns render as `nil` when null.
    RootKey { var: String, columns: Vec<KeyColumn> },
    GetOrCreateRoot {
        key_var: String,
        fields: Vec<FieldCopy>,
        child_slots: Vec<String>,
    },
    Node(NodeScan),
    /// Every root object, in first-seen order.
    CollectMany,
    /// Exactly one root object.
    CollectOne,
}
