//! Declared fields of every node type, read from the grammar's node type table.
//!
//! tree-sitter grammars publish a `node-types.json` describing, for each named node type,
//! its named fields and whether it has further unnamed children. This module turns that
//! table into a fixed field list per node type, which is what gives every flattened node
//! the same attribute records regardless of which fields are filled in.
//!
//! Node types created by an alias (e.g. `as_pattern_target`) have no entry of their own and
//! are only mentioned as the type of some field. They are kept in a separate set so that the
//! Python view can tell them apart from node types the grammar does not know at all.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::FlattenError;

/// Name of the pseudo field collecting named children that are not stored in a named field.
pub const CHILDREN_FIELD: &str = "children";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    /// Whether the field may hold more than one item.
    pub multiple: bool,
}

/// Field list of one node type: named fields sorted by name, then the children pseudo field.
#[derive(Debug, Clone, Default)]
pub struct NodeSchema {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Default)]
pub struct Schema {
    types: HashMap<String, NodeSchema>,
    aliases: HashSet<String>,
}

#[derive(Deserialize)]
struct NodeTypeEntry {
    #[serde(rename = "type")]
    kind: String,
    named: bool,
    #[serde(default)]
    fields: BTreeMap<String, ChildInfo>,
    #[serde(default)]
    children: Option<ChildInfo>,
    #[serde(default)]
    subtypes: Option<Vec<TypeRef>>,
}

#[derive(Deserialize)]
struct ChildInfo {
    multiple: bool,
    #[serde(default)]
    types: Vec<TypeRef>,
}

#[derive(Deserialize)]
struct TypeRef {
    #[serde(rename = "type")]
    kind: String,
    named: bool,
}

impl TypeRef {
    fn named_kind(&self) -> Option<&str> {
        self.named.then_some(self.kind.as_str())
    }
}

impl Schema {
    /// Build a schema from the contents of a `node-types.json` file.
    pub fn from_node_types(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<NodeTypeEntry> = serde_json::from_str(json)?;
        let mut types = HashMap::new();
        let mut supertypes = HashSet::new();
        let mut referenced = HashSet::new();
        for entry in entries {
            if !entry.named {
                continue;
            }
            // Supertypes never show up in a concrete tree.
            if let Some(subtypes) = &entry.subtypes {
                referenced.extend(subtypes.iter().filter_map(TypeRef::named_kind).map(String::from));
                supertypes.insert(entry.kind);
                continue;
            }
            for info in entry.fields.values().chain(entry.children.iter()) {
                referenced.extend(info.types.iter().filter_map(TypeRef::named_kind).map(String::from));
            }
            let mut fields: Vec<FieldSpec> = entry
                .fields
                .into_iter()
                .map(|(name, info)| FieldSpec {
                    name,
                    multiple: info.multiple,
                })
                .collect();
            if let Some(info) = entry.children {
                fields.push(FieldSpec {
                    name: CHILDREN_FIELD.to_string(),
                    multiple: info.multiple,
                });
            }
            types.insert(entry.kind, NodeSchema { fields });
        }
        let aliases: HashSet<String> = referenced
            .into_iter()
            .filter(|kind| !types.contains_key(kind) && !supertypes.contains(kind))
            .collect();
        log::debug!(
            "loaded field lists for {} node types and {} aliases",
            types.len(),
            aliases.len()
        );
        Ok(Self { types, aliases })
    }

    pub fn get(&self, kind: &str) -> Option<&NodeSchema> {
        self.types.get(kind)
    }

    /// Whether `kind` only exists as the alias of another node type.
    pub fn is_alias(&self, kind: &str) -> bool {
        self.aliases.contains(kind)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.types.len()
    }
}

static PYTHON: OnceCell<Schema> = OnceCell::new();

/// The schema of the Python grammar. Parsed on first use.
pub fn python() -> Result<&'static Schema, FlattenError> {
    PYTHON.get_or_try_init(|| {
        Schema::from_node_types(tree_sitter_python::NODE_TYPES).map_err(FlattenError::Schema)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_TYPES: &str = r#"[
        {"type": "expression", "named": true, "subtypes": [{"type": "identifier", "named": true}]},
        {"type": "call", "named": true, "fields": {
            "function": {"multiple": false, "required": true, "types": [{"type": "expression", "named": true}]},
            "arguments": {"multiple": false, "required": true, "types": [{"type": "argument_list", "named": true}]}
        }},
        {"type": "as_pattern", "named": true, "fields": {
            "alias": {"multiple": false, "required": false, "types": [{"type": "as_pattern_target", "named": true}]}
        }},
        {"type": "block", "named": true, "fields": {},
         "children": {"multiple": true, "required": false, "types": []}},
        {"type": "pass_statement", "named": true, "fields": {}},
        {"type": "identifier", "named": true},
        {"type": "+", "named": false}
    ]"#;

    #[test]
    fn test_field_lists() {
        let schema = Schema::from_node_types(NODE_TYPES).unwrap();
        assert_eq!(schema.len(), 5);
        let call: Vec<&str> = schema
            .get("call")
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(call, vec!["arguments", "function"]);
        assert_eq!(
            schema.get("block").unwrap().fields,
            vec![FieldSpec { name: CHILDREN_FIELD.to_string(), multiple: true }]
        );
        assert!(schema.get("pass_statement").unwrap().fields.is_empty());
        assert!(schema.get("expression").is_none());
        assert!(schema.get("+").is_none());
    }

    #[test]
    fn test_aliases() {
        let schema = Schema::from_node_types(NODE_TYPES).unwrap();
        assert!(schema.get("as_pattern_target").is_none());
        assert!(schema.is_alias("as_pattern_target"));
        assert!(schema.is_alias("argument_list"));
        // supertypes and declared types are not aliases
        assert!(!schema.is_alias("expression"));
        assert!(!schema.is_alias("identifier"));
        assert!(!schema.is_alias("call"));
    }

    #[test]
    fn test_python_schema() {
        let schema = python().unwrap();
        let function: Vec<&str> = schema
            .get("function_definition")
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert!(function.contains(&"name"));
        assert!(function.contains(&"body"));
        assert!(schema.get("module").is_some());
        assert!(schema.is_alias("as_pattern_target"));
        assert!(!schema.is_alias("no_such_statement"));
    }
}
