use std::{io, path::PathBuf};

use thiserror::Error;

use crate::frontend::{parser::Mode, utils::Position};
use crate::record::RecordKind;

/// Errors raised while turning source text into a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error at {pos}: {msg}")]
    SyntaxError { pos: Position, msg: String },
    #[error("Source does not fit parse mode '{mode}': {msg}")]
    ModeError { mode: Mode, msg: String },
    #[error("Unable to load the Python grammar: {0}")]
    Language(String),
    #[error("The parser returned no syntax tree")]
    NoTree,
}

/// Errors raised while flattening a syntax tree into records.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("Field '{field}' is not declared for node type '{node}'")]
    UndeclaredField { node: String, field: String },
    #[error("Node type '{node}' is unknown to the grammar")]
    UnknownNodeType { node: String },
    #[error("Nesting deeper than {limit} nodes at node type '{node}'")]
    DepthLimitExceeded { limit: usize, node: String },
    #[error("Node type table is unreadable: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Structural problems in a record sequence handed to the reconstructor.
#[derive(Debug, Error, PartialEq)]
pub enum ReconstructError {
    #[error("Record sequence is empty")]
    Empty,
    #[error("Record 0 must be a node record, found a {found} record")]
    RootNotNode { found: RecordKind },
    #[error("Record {record} references child {child}, but there are only {len} records")]
    ChildOutOfBounds { record: usize, child: usize, len: usize },
    #[error("Record {record} references child {child} which does not come after it")]
    ChildBeforeParent { record: usize, child: usize },
    #[error("Record {record} is a leaf record; leaves have already been decoupled")]
    AlreadyDecoupled { record: usize },
}

/// Problems with persisted AST documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported document version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("Document must carry exactly one of 'file' or 'code'")]
    Origin,
    #[error("No AST document found in {}", .path.display())]
    NoDocument { path: PathBuf },
    #[error("Document entry {entry} requested, but the file holds {count}")]
    EntryOutOfRange { entry: usize, count: usize },
}

/// Errors raised while laying out or rendering a graph with Graphviz.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unable to run '{program}'. Graphviz is probably not installed: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' failed with {status}: {stderr}")]
    Graphviz {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("Unreadable layout output: {0}")]
    Layout(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum AstGraphError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Flatten(#[from] FlattenError),
    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AstGraphError>;
