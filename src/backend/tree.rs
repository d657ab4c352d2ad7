//! The vertex/edge view of a record sequence.

use crate::error::ReconstructError;
use crate::record::{FlatRecord, RecordKind};

use super::decouple::validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub kind: RecordKind,
    pub name: String,
}

/// One vertex per record and one directed edge per child reference, in record order.
/// Vertex 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct AstGraph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<(usize, usize)>,
}

impl AstGraph {
    pub fn from_records(records: &[FlatRecord]) -> Result<Self, ReconstructError> {
        validate(records)?;
        let vertices = records
            .iter()
            .map(|record| Vertex {
                kind: record.kind(),
                name: record.label(),
            })
            .collect();
        let edges = records
            .iter()
            .enumerate()
            .flat_map(|(i, record)| record.children().iter().map(move |&j| (i, j)))
            .collect();
        let graph = Self { vertices, edges };
        log::info!("{}", graph.summary());
        Ok(graph)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// One line describing the size of the graph.
    pub fn summary(&self) -> String {
        format!(
            "AST graph: {} vertices ({} nodes, {} attrs, {} leaves), {} edges",
            self.vertex_count(),
            self.count(RecordKind::Node),
            self.count(RecordKind::Attr),
            self.count(RecordKind::Leaf),
            self.edge_count()
        )
    }

    fn count(&self, kind: RecordKind) -> usize {
        self.vertices.iter().filter(|v| v.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::decouple::decouple_leaves;
    use crate::frontend::flatten::{flatten, tests::function_def};

    #[test]
    fn test_graph_from_decoupled_records() {
        let records = flatten(&&function_def()).unwrap();
        let graph = AstGraph::from_records(&decouple_leaves(&records).unwrap()).unwrap();
        assert_eq!(graph.vertex_count(), 17);
        // a tree: every vertex but the root has exactly one incoming edge
        assert_eq!(graph.edge_count(), 16);
        assert_eq!(graph.edges[0], (0, 1));
        assert!(graph.edges.contains(&(1, 13)));
        assert_eq!(
            graph.vertices[13],
            Vertex {
                kind: RecordKind::Leaf,
                name: "func".to_string()
            }
        );
        assert_eq!(graph.vertices[16].name, "None");
        assert_eq!(
            graph.summary(),
            "AST graph: 17 vertices (5 nodes, 8 attrs, 4 leaves), 16 edges"
        );
    }
}
