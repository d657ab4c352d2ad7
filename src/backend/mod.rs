//! This module contains everything needed to turn flat records back into a tree graph.
//!
//! The backend features three stages:
//! 1. Leaf decoupling: every scalar stored in a `value` list gets a leaf record of its own,
//! referenced from the owning record's `children` (`decouple`).
//! 2. Building a vertex/edge graph with one vertex per record and one edge per child
//! reference (`tree`).
//! 3. Handing that graph to Graphviz for layout and rendering (`visualize`).

pub mod decouple;
pub mod tree;
pub mod visualize;

use std::path::Path;

use crate::document;
use crate::error::Result;

use self::{
    decouple::decouple_leaves,
    tree::AstGraph,
    visualize::{layout::Layout, RenderOptions, Visualizer},
};

/// Load a saved document, decouple its leaves and render the tree to `outfile`.
///
/// `entry` selects one of several appended documents, the last one by default. With
/// `with_layout` the vertex coordinates computed by Graphviz are returned as well.
pub fn visualize_saved(
    json_path: &Path,
    entry: Option<usize>,
    outfile: &Path,
    options: &RenderOptions,
    with_layout: bool,
) -> Result<(AstGraph, Option<Layout>)> {
    let records = document::read_ast(json_path, entry)?;
    let graph = AstGraph::from_records(&decouple_leaves(&records)?)?;
    let mut vis = Visualizer::new("ast", options);
    vis.visualize_ast(&graph);
    vis.render(outfile, options.format)?;
    let layout = if with_layout { Some(vis.layout()?) } else { None };
    Ok((graph, layout))
}
