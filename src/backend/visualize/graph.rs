//! Structs and functions concerned with generating graphs in the Graphviz DOT language.

use std::fmt::{self, Display};

pub struct Graph {
    name: String,
    pub is_directed: bool,
    /// Graph level attributes, e.g. `ordering=out`.
    attributes: Vec<(String, String)>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(name: &str, is_directed: bool) -> Self {
        Graph {
            name: name.to_string(),
            is_directed,
            attributes: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.push((key.to_string(), value.to_string()));
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn as_dot<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "{}", self)
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let graph_type = if self.is_directed {
            "digraph"
        } else {
            "graph"
        };
        writeln!(f, "{} {} {{", graph_type, &self.name)?;
        for (key, value) in self.attributes.iter() {
            writeln!(f, "\t{}=\"{}\";", key, escape(value))?;
        }
        for node in self.nodes.iter() {
            writeln!(f, "\t{}", node)?;
        }
        for edge in self.edges.iter() {
            writeln!(f, "\t{}", edge)?;
        }
        write!(f, "}}")
    }
}

/// Escape a string for use inside a quoted DOT attribute.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => (),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub struct Node {
    id: String,
    label: Option<String>,
    attributes: Vec<(&'static str, String)>,
}

impl Node {
    pub fn new(id: &str, label: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.map(|x| x.to_string()),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &'static str, value: &str) -> Self {
        self.attributes.push((key, value.to_string()));
        self
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut attributes: Vec<String> = Vec::new();
        if let Some(ref l) = self.label {
            attributes.push(format!("label=\"{}\"", escape(l)));
        }
        for (key, value) in self.attributes.iter() {
            attributes.push(format!("{}=\"{}\"", key, escape(value)));
        }
        if attributes.is_empty() {
            write!(f, "{};", self.id)
        } else {
            write!(f, "{} [ {} ];", self.id, attributes.join(", "))
        }
    }
}

/// Add new nodes to a given graph by passing a node name and an optional label.
#[cfg(test)]
macro_rules! add_nodes {
    ($graph:ident, $($id:literal : $label:literal),+) => {
        $(
            $graph.add_node(Node::new($id, Some($label)));
        )+
    };
    ($graph:ident, $($id:literal),+) => {
        $($graph.add_node(Node::new($id, None));)+
    }
}

/// Add new edges to a given graph by passing the names of the two nodes.
#[cfg(test)]
macro_rules! add_edges {
    ($graph:ident, $($from:literal -> $to:literal),+) => {
        $($graph.add_edge(Edge::new($from, $to, $graph.is_directed));)+
    }
}

pub struct Edge {
    from: String,
    to: String,
    is_directed: bool,
    style: Option<&'static str>,
}

impl Edge {
    pub fn new(from: &str, to: &str, is_directed: bool) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            is_directed,
            style: None,
        }
    }

    /// Draw the edge with a DOT line style such as `dashed`.
    pub fn with_style(mut self, style: &'static str) -> Self {
        self.style = Some(style);
        self
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = if self.is_directed { "->" } else { "--" };
        match self.style {
            Some(style) => write!(f, "{} {} {} [ style=\"{}\" ];", self.from, op, self.to, style),
            None => write!(f, "{} {} {};", self.from, op, self.to),
        }
    }
}
