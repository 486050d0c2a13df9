//! Response column metadata.

use serde::Deserialize;

/// Separator encoding the nesting path in a flat column name
/// (`lists__cards__title`).
pub const PATH_SEPARATOR: &str = "__";

/// One column of a query's result set.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResponseColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub nullable: bool,
    /// 0 when the column is not a key; N when it keys the node at depth N.
    #[serde(default, rename = "hierarchy_key_level")]
    pub key_level: u32,
}

impl ResponseColumn {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
            key_level: 0,
        }
    }

    pub fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    pub fn key_level(mut self, level: u32) -> Self {
        self.key_level = level;
        self
    }

    /// Path segments leading to the leaf (`["lists", "cards"]` for
    /// `lists__cards__title`). Empty for flat columns.
    pub fn path(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = self.name.split(PATH_SEPARATOR).collect();
        parts.pop();
        parts
    }

    /// Last segment of the name.
    pub fn leaf(&self) -> &str {
        self.name
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    pub fn is_nested(&self) -> bool {
        self.name.contains(PATH_SEPARATOR)
    }
}
