//! Python syntax nodes as seen by the flattener.
//!
//! `PyNode` wraps a tree-sitter node and exposes it through `SyntaxNode`:
//!     - the type name is the tree-sitter node kind
//!     - the fields are the ones the grammar declares for that kind (see `schema`); aliased
//!     kinds without a declaration get the fields present in the tree
//!     - tokens like identifiers and literals become scalars (see `token`)
//!     - anonymous tokens stored in a field, e.g. the operator of `a + b`, become their text
//!     - comments and unnamed punctuation outside of fields are dropped

use std::collections::HashMap;

use tree_sitter::Node;

use super::schema::{Schema, CHILDREN_FIELD};
use super::syntax::{Field, FieldValue, SyntaxNode};
use super::token;
use crate::error::FlattenError;
use crate::record::Scalar;

#[derive(Clone, Copy)]
pub struct PyNode<'t> {
    node: Node<'t>,
    source: &'t [u8],
    schema: &'t Schema,
}

impl<'t> PyNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str, schema: &'t Schema) -> Self {
        Self {
            node,
            source: source.as_bytes(),
            schema,
        }
    }

    fn text(&self, node: Node<'t>) -> String {
        String::from_utf8_lossy(&self.source[node.byte_range()]).into_owned()
    }

    fn classify(&self, child: Node<'t>) -> FieldValue<Self> {
        if !child.is_named() {
            return FieldValue::Scalar(Scalar::Str(child.kind().to_string()));
        }
        match token::token_class(child.kind()) {
            Some(class) => FieldValue::Scalar(token::to_scalar(class, &self.text(child))),
            None => FieldValue::Node(Self { node: child, ..*self }),
        }
    }

    /// Items of every field present in the tree, keyed by field name.
    fn collect_items(&self) -> HashMap<&'static str, Vec<FieldValue<Self>>> {
        let mut items: HashMap<&'static str, Vec<FieldValue<Self>>> = HashMap::new();
        let mut cursor = self.node.walk();
        if !cursor.goto_first_child() {
            return items;
        }
        loop {
            let child = cursor.node();
            if !child.is_extra() {
                match cursor.field_name() {
                    Some(name) => items.entry(name).or_default().push(self.classify(child)),
                    None if child.is_named() => items
                        .entry(CHILDREN_FIELD)
                        .or_default()
                        .push(self.classify(child)),
                    None => {}
                }
            }
            if !cursor.goto_next_sibling() {
                return items;
            }
        }
    }

    /// Fields of a node whose kind only exists as an alias: the present named fields sorted by
    /// name, then the children pseudo field.
    fn observed_fields(mut items: HashMap<&'static str, Vec<FieldValue<Self>>>) -> Vec<Field<Self>> {
        let children = items.remove(CHILDREN_FIELD);
        let mut named: Vec<(&'static str, Vec<FieldValue<Self>>)> = items.into_iter().collect();
        named.sort_by_key(|(name, _)| *name);
        named
            .into_iter()
            .chain(children.map(|items| (CHILDREN_FIELD, items)))
            .map(|(name, mut present)| {
                let value = if present.len() == 1 {
                    present.remove(0)
                } else {
                    FieldValue::List(present)
                };
                Field::new(name, value)
            })
            .collect()
    }
}

impl<'t> SyntaxNode for PyNode<'t> {
    fn type_name(&self) -> &str {
        self.node.kind()
    }

    fn fields(&self) -> Result<Vec<Field<Self>>, FlattenError> {
        let kind = self.node.kind();
        let mut items = self.collect_items();
        let spec = match self.schema.get(kind) {
            Some(spec) => spec,
            None if self.schema.is_alias(kind) => return Ok(Self::observed_fields(items)),
            None => {
                return Err(FlattenError::UnknownNodeType {
                    node: kind.to_string(),
                })
            }
        };

        let mut fields = Vec::with_capacity(spec.fields.len());
        for field in &spec.fields {
            let mut present = items.remove(field.name.as_str()).unwrap_or_default();
            let value = if field.multiple || present.len() > 1 {
                FieldValue::List(present)
            } else {
                // An absent optional field holds `None`, like in Python's own `ast` module.
                present.pop().unwrap_or(FieldValue::Scalar(Scalar::None))
            };
            fields.push(Field::new(&field.name, value));
        }

        match items.keys().min() {
            Some(field) => Err(FlattenError::UndeclaredField {
                node: kind.to_string(),
                field: field.to_string(),
            }),
            None => Ok(fields),
        }
    }
}
