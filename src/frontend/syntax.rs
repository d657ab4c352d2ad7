//! The view of a syntax tree the flattener works with.
//!
//! Every node has a type name and a fixed, ordered list of declared fields. Each field holds
//! a nested node, a scalar, or a (possibly nested, possibly mixed) list of those.

use crate::error::FlattenError;
use crate::record::Scalar;

/// A syntax tree node with statically declared fields.
pub trait SyntaxNode: Sized {
    /// Name of the node's type, e.g. `function_definition`.
    fn type_name(&self) -> &str;

    /// All declared fields of the node in declaration order, including empty ones.
    fn fields(&self) -> Result<Vec<Field<Self>>, FlattenError>;
}

/// A named field of a node together with its content.
#[derive(Debug, Clone)]
pub struct Field<N> {
    pub name: String,
    pub value: FieldValue<N>,
}

impl<N> Field<N> {
    pub fn new(name: &str, value: FieldValue<N>) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldValue<N> {
    Scalar(Scalar),
    Node(N),
    List(Vec<FieldValue<N>>),
}
