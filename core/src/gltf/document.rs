//! Typed access to the glTF JSON tree.
//!
//! Every lookup distinguishes a field that is absent (`Ok(None)` from the
//! `opt_*` accessors, [`GltfError::MissingField`] from the required ones)
//! from a field that is present with the wrong JSON type
//! ([`GltfError::WrongType`]).

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::GltfError;

type Result<T> = std::result::Result<T, GltfError>;

/// Top-level glTF arrays addressed by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Accessors,
    BufferViews,
    Buffers,
    Materials,
    Meshes,
    Nodes,
    Scenes,
    Skins,
}

impl Table {
    /// Key of the array in the document root.
    pub fn key(self) -> &'static str {
        match self {
            Self::Accessors => "accessors",
            Self::BufferViews => "bufferViews",
            Self::Buffers => "buffers",
            Self::Materials => "materials",
            Self::Meshes => "meshes",
            Self::Nodes => "nodes",
            Self::Scenes => "scenes",
            Self::Skins => "skins",
        }
    }

    /// Singular name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Accessors => "accessor",
            Self::BufferViews => "buffer view",
            Self::Buffers => "buffer",
            Self::Materials => "material",
            Self::Meshes => "mesh",
            Self::Nodes => "node",
            Self::Scenes => "scene",
            Self::Skins => "skin",
        }
    }
}

/// The parsed document root. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    /// Wrap a parsed JSON value; the root must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(GltfError::NotAnObject),
        }
    }

    /// Parse a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    /// The root object.
    pub fn root(&self) -> Entry<'_> {
        Entry::new(&self.root, "document".to_string())
    }

    /// Number of entries in `table`; an absent table is empty.
    pub fn len(&self, table: Table) -> Result<usize> {
        Ok(self.table(table)?.map_or(0, Vec::len))
    }

    /// Entry `index` of `table`.
    pub fn entry(&self, table: Table, index: usize) -> Result<Entry<'_>> {
        let items = self.table(table)?.map(Vec::as_slice).unwrap_or(&[]);
        let value = items.get(index).ok_or(GltfError::IndexOutOfRange {
            kind: table.label(),
            index,
            count: items.len(),
        })?;
        Entry::from_value(value, format!("{} {index}", table.label()))
    }

    fn table(&self, table: Table) -> Result<Option<&Vec<Value>>> {
        self.root().opt_array(table.key())
    }
}

/// One JSON object in the document, tagged with the entity it describes so
/// failures name it.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    map: &'a Map<String, Value>,
    context: String,
}

impl<'a> Entry<'a> {
    fn new(map: &'a Map<String, Value>, context: String) -> Self {
        Self { map, context }
    }

    /// Interpret `value` as an object describing `context`.
    pub fn from_value(value: &'a Value, context: String) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::new(map, context)),
            _ => Err(GltfError::WrongType {
                context,
                field: "(entry)",
                expected: "an object",
            }),
        }
    }

    /// Entity description, e.g. `accessor 3`.
    pub fn context(&self) -> &str {
        &self.context
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> GltfError {
        GltfError::WrongType {
            context: self.context.clone(),
            field,
            expected,
        }
    }

    fn missing(&self, field: &'static str) -> GltfError {
        GltfError::MissingField {
            context: self.context.clone(),
            field,
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    pub fn opt_str(&self, field: &'static str) -> Result<Option<&'a str>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.wrong_type(field, "a string")),
        }
    }

    pub fn str(&self, field: &'static str) -> Result<&'a str> {
        self.opt_str(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_bool(&self, field: &'static str) -> Result<Option<bool>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.wrong_type(field, "a boolean")),
        }
    }

    pub fn opt_i64(&self, field: &'static str) -> Result<Option<i64>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "an integer")),
        }
    }

    pub fn i64(&self, field: &'static str) -> Result<i64> {
        self.opt_i64(field)?.ok_or_else(|| self.missing(field))
    }

    /// A non-negative integer index or count.
    pub fn opt_usize(&self, field: &'static str) -> Result<Option<usize>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => as_index(v)
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "a non-negative integer")),
        }
    }

    pub fn usize(&self, field: &'static str) -> Result<usize> {
        self.opt_usize(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_f32(&self, field: &'static str) -> Result<Option<f32>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(|f| Some(f as f32))
                .ok_or_else(|| self.wrong_type(field, "a number")),
        }
    }

    pub fn opt_array(&self, field: &'static str) -> Result<Option<&'a Vec<Value>>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(self.wrong_type(field, "an array")),
        }
    }

    /// A fixed-length array of numbers.
    pub fn opt_f32_array<const N: usize>(&self, field: &'static str) -> Result<Option<[f32; N]>> {
        let Some(items) = self.opt_array(field)? else {
            return Ok(None);
        };
        if items.len() != N {
            return Err(GltfError::WrongLength {
                context: self.context.clone(),
                field,
                expected: N,
                actual: items.len(),
            });
        }
        let mut out = [0.0f32; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item
                .as_f64()
                .ok_or_else(|| self.wrong_type(field, "an array of numbers"))?
                as f32;
        }
        Ok(Some(out))
    }

    /// An array of non-negative integer indices.
    pub fn opt_index_array(&self, field: &'static str) -> Result<Option<Vec<usize>>> {
        let Some(items) = self.opt_array(field)? else {
            return Ok(None);
        };
        items
            .iter()
            .map(|item| {
                as_index(item)
                    .ok_or_else(|| self.wrong_type(field, "an array of non-negative integers"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn opt_object(&self, field: &'static str) -> Result<Option<Entry<'a>>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Object(map)) => {
                Ok(Some(Self::new(map, format!("{} {field}", self.context))))
            }
            Some(_) => Err(self.wrong_type(field, "an object")),
        }
    }

    /// An object whose members are all non-negative integers, keyed by
    /// member name.
    pub fn opt_index_map(&self, field: &'static str) -> Result<Option<HashMap<&'a str, usize>>> {
        let members = match self.get(field) {
            None => return Ok(None),
            Some(Value::Object(members)) => members,
            Some(_) => return Err(self.wrong_type(field, "an object")),
        };
        members
            .iter()
            .map(|(key, value)| {
                as_index(value)
                    .map(|index| (key.as_str(), index))
                    .ok_or_else(|| self.wrong_type(field, "a map of non-negative integers"))
            })
            .collect::<Result<HashMap<_, _>>>()
            .map(Some)
    }

    /// An array of objects; element `i` is described as `<context> <label> i`.
    pub fn objects(&self, field: &'static str, label: &str) -> Result<Vec<Entry<'a>>> {
        let items = self.opt_array(field)?.ok_or_else(|| self.missing(field))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Entry::from_value(item, format!("{} {label} {i}", self.context)))
            .collect()
    }
}

fn as_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|v| usize::try_from(v).ok())
}
