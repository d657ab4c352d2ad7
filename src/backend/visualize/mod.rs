use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::{fmt, fs};

use clap::ValueEnum;

use self::graph::{Edge, Graph, Node};
use self::layout::Layout;
use crate::backend::tree::AstGraph;
use crate::error::RenderError;
use crate::record::RecordKind;

pub mod graph;
pub mod layout;

/// Output written by `Visualizer::render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// DOT source only, no Graphviz needed.
    Dot,
    #[default]
    Svg,
    Pdf,
    Png,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OutputFormat::Dot => "dot",
                OutputFormat::Svg => "svg",
                OutputFormat::Pdf => "pdf",
                OutputFormat::Png => "png",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub title: String,
    /// The Graphviz layout program to run.
    pub dot_program: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Svg,
            title: "AST Tree".to_string(),
            dot_program: "dot".to_string(),
        }
    }
}

pub struct Visualizer {
    /// Graph that will be filled.
    pub graph: Graph,
    dot_program: String,
}

impl Visualizer {
    const NODE_NAME_PREFIX: &'static str = "n";
    const LEAF_COLOR: &'static str = "#3f9f6f";

    pub fn new(graph_name: &str, options: &RenderOptions) -> Self {
        let mut graph = Graph::new(graph_name, true);
        // Keep children in record order so siblings are drawn left to right.
        graph.set_attribute("ordering", "out");
        graph.set_attribute("rankdir", "TB");
        graph.set_attribute("label", &options.title);
        graph.set_attribute("labelloc", "t");
        Self {
            graph,
            dot_program: options.dot_program.clone(),
        }
    }

    fn node_name(index: usize) -> String {
        format!("{}{}", Visualizer::NODE_NAME_PREFIX, index)
    }

    pub fn visualize_ast(&mut self, ast: &AstGraph) {
        for (index, vertex) in ast.vertices.iter().enumerate() {
            let node = Node::new(&Self::node_name(index), Some(&vertex.name))
                .with_attribute("tooltip", vertex.kind.as_str());
            let node = match vertex.kind {
                RecordKind::Node => node.with_attribute("shape", "box"),
                RecordKind::Attr => node
                    .with_attribute("shape", "ellipse")
                    .with_attribute("color", "grey50"),
                RecordKind::Leaf => node
                    .with_attribute("shape", "plaintext")
                    .with_attribute("fontcolor", Self::LEAF_COLOR),
            };
            self.graph.add_node(node);
        }
        for &(from, to) in ast.edges.iter() {
            let edge = Edge::new(
                &Self::node_name(from),
                &Self::node_name(to),
                self.graph.is_directed,
            );
            let edge = match ast.vertices[to].kind {
                RecordKind::Leaf => edge.with_style("dashed"),
                _ => edge,
            };
            self.graph.add_edge(edge);
        }
    }

    pub fn to_dot(&self) -> String {
        self.graph.to_string()
    }

    pub fn write_to_dot(&self, outfile: &Path) -> Result<(), RenderError> {
        fs::write(outfile, self.to_dot())?;
        log::info!("wrote DOT graph to {}", outfile.display());
        Ok(())
    }

    /// Write the graph to `outfile` in the given format.
    pub fn render(&self, outfile: &Path, format: OutputFormat) -> Result<(), RenderError> {
        if format == OutputFormat::Dot {
            return self.write_to_dot(outfile);
        }
        let format_arg = format!("-T{}", format);
        let output_arg = format!("-o{}", outfile.display());
        self.run_dot(&[format_arg.as_str(), output_arg.as_str()])?;
        log::info!("rendered {} to {}", format, outfile.display());
        Ok(())
    }

    /// Let Graphviz lay out the tree and return the coordinates of every vertex.
    pub fn layout(&self) -> Result<Layout, RenderError> {
        let plain = self.run_dot(&["-Tplain"])?;
        Layout::from_plain(
            &String::from_utf8_lossy(&plain),
            Self::NODE_NAME_PREFIX,
            self.graph.node_count(),
        )
    }

    /// Pipe the DOT source through the layout program and return its standard output.
    fn run_dot(&self, args: &[&str]) -> Result<Vec<u8>, RenderError> {
        let mut dot = Command::new(&self.dot_program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.dot_program.clone(),
                source,
            })?;

        if let Some(mut stdin) = dot.stdin.take() {
            stdin.write_all(self.to_dot().as_bytes())?;
        }
        let output = dot.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Graphviz {
                program: self.dot_program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}
