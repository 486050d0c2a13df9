//! Value helpers shared by the interpreter and generated code.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use super::error::RuntimeError;
use super::value::{NULL, Value, from_value};

/// One result row, keyed by column name.
pub type Row = IndexMap<String, Value>;

/// SQL-template truthiness: null, `false`, zero, `""` and empty containers
/// are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Iterator yielding `(item, is_last)`.
#[derive(Clone, Debug)]
pub struct IterWithLast<'a> {
    items: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for IterWithLast<'a> {
    type Item = (&'a Value, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        Some((item, self.items.len() == 0))
    }
}

/// Iterate a loop collection with lookahead.
///
/// Arrays yield their elements, null yields nothing, and any other value is
/// a one-element sequence.
pub fn iter_with_last(value: &Value) -> IterWithLast<'_> {
    let items: &[Value] = match value {
        Value::Null => &[],
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };
    IterWithLast {
        items: items.iter(),
    }
}

/// Unguarded member access. Missing fields read as null.
pub fn member<'a>(value: &'a Value, property: &str) -> Result<&'a Value, RuntimeError> {
    match value {
        Value::Object(_) => Ok(value.get(property).unwrap_or(&NULL)),
        other => Err(RuntimeError::MemberAccess {
            property: property.to_string(),
            found: other.kind(),
        }),
    }
}

/// Unguarded index access.
pub fn index(value: &Value, position: usize) -> Result<&Value, RuntimeError> {
    match value {
        Value::Array(items) => items.get(position).ok_or(RuntimeError::IndexOutOfRange {
            index: position,
            len: items.len(),
        }),
        other => Err(RuntimeError::NotIndexable {
            index: position,
            found: other.kind(),
        }),
    }
}

/// Guarded member access: `None` unless `value` is an object.
pub fn safe_member<'a>(value: &'a Value, property: &str) -> Option<&'a Value> {
    match value {
        Value::Object(_) => Some(value.get(property).unwrap_or(&NULL)),
        _ => None,
    }
}

/// Guarded index access: `None` unless `position` is within an array.
pub fn safe_index(value: &Value, position: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(position),
        _ => None,
    }
}

pub fn column<'a>(row: &'a Row, name: &str) -> Result<&'a Value, RuntimeError> {
    row.get(name)
        .ok_or_else(|| RuntimeError::MissingColumn(name.to_string()))
}

/// Deserialize a flat row into a result struct.
pub fn from_row<T: DeserializeOwned>(row: &Row) -> Result<T, RuntimeError> {
    from_value(Value::Object(
        row.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    ))
}
