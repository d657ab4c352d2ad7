//! The flat, index-addressed encoding of a syntax tree.
//!
//! A tree is stored as a `Vec<FlatRecord>` where the position of a record is its identity.
//! Parents reference their children by position, so the whole tree survives a trip through
//! JSON without any pointer structure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value stored in an attribute record instead of a nested node.
///
/// The set of variants is closed so that the JSON encoding is total:
///     - `None`, `Bool`, `Int` and `Str` map to their JSON counterparts
///     - `Float` is only ever built from finite numbers
///     - `Opaque` holds the source text of a literal JSON cannot represent (e.g. `1e999`
///     or an integer wider than 64 bit) and is written as a string
///
/// Reading JSON back never produces `Opaque`; such values come back as `Str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Opaque(String),
}

impl Scalar {
    /// Build a float scalar, falling back to the literal text for non-finite values.
    pub fn float(value: f64, text: &str) -> Self {
        if value.is_finite() {
            Scalar::Float(value)
        } else {
            Scalar::Opaque(text.to_string())
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::None => write!(f, "None"),
            Scalar::Bool(true) => write!(f, "True"),
            Scalar::Bool(false) => write!(f, "False"),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Str(s) | Scalar::Opaque(s) => write!(f, "{}", s),
        }
    }
}

/// The three kinds of records. Leaves only exist after leaf decoupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Node,
    Attr,
    Leaf,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Node => "node",
            RecordKind::Attr => "attr",
            RecordKind::Leaf => "leaf",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the flat encoding.
///     - `Node`: a syntax node; `children` lists one attr record per declared field
///     - `Attr`: a field of a node; `children` points to node records, `value` holds scalars
///     - `Leaf`: a scalar promoted to its own record during leaf decoupling
///
/// Empty `children`/`value` lists are omitted from the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlatRecord {
    Node {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<usize>,
    },
    Attr {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<usize>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        value: Vec<Scalar>,
    },
    Leaf {
        name: Scalar,
    },
}

impl FlatRecord {
    pub fn node(name: &str) -> Self {
        FlatRecord::Node {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn attr(name: &str) -> Self {
        FlatRecord::Attr {
            name: name.to_string(),
            children: Vec::new(),
            value: Vec::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            FlatRecord::Node { .. } => RecordKind::Node,
            FlatRecord::Attr { .. } => RecordKind::Attr,
            FlatRecord::Leaf { .. } => RecordKind::Leaf,
        }
    }

    pub fn children(&self) -> &[usize] {
        match self {
            FlatRecord::Node { children, .. } | FlatRecord::Attr { children, .. } => children,
            FlatRecord::Leaf { .. } => &[],
        }
    }

    pub fn value(&self) -> &[Scalar] {
        match self {
            FlatRecord::Attr { value, .. } => value,
            _ => &[],
        }
    }

    /// The `name` of the record rendered as text, used for graph labels.
    pub fn label(&self) -> String {
        match self {
            FlatRecord::Node { name, .. } | FlatRecord::Attr { name, .. } => name.clone(),
            FlatRecord::Leaf { name } => name.to_string(),
        }
    }
}

impl fmt::Display for FlatRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => Err(fmt::Error),
        }
    }
}
