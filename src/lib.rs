//! Flatten Python syntax trees into a list of index-addressed records and turn such lists
//! back into renderable tree graphs.
//!
//! - `frontend`: parsing and flattening
//! - `document`: reading and writing the JSON documents holding flattened trees
//! - `backend`: leaf decoupling, graph reconstruction and Graphviz rendering

pub mod backend;
pub mod document;
pub mod error;
pub mod frontend;
pub mod json_format;
pub mod record;

pub use document::{AstDocument, SaveOptions};
pub use error::{AstGraphError, Result};
pub use frontend::{flatten::FlattenOptions, parser::Mode};
pub use record::{FlatRecord, RecordKind, Scalar};
