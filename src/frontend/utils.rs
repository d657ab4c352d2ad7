//! Various different utility structs and function used throughout the frontend.

use std::fmt::{Display, Formatter, Result};

use tree_sitter::Node;

/// Position of a syntax node in the source code. Lines and columns start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({:?}, {:?}-{:?})", self.line, self.start_column, self.end_column)
    }
}

impl Position {
    pub fn new(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            line,
            start_column,
            end_column,
        }
    }

    /// Position of a node. For nodes spanning several lines the end column belongs to the last line.
    pub fn of(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self::new(
            start.row as u32 + 1,
            start.column as u32 + 1,
            end.column as u32 + 1,
        )
    }
}

/// Cut `text` down to at most `max` characters for use in messages.
pub fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max || line.len() < text.trim_end().len() {
        format!("{}...", line.chars().take(max).collect::<String>())
    } else {
        line.to_string()
    }
}
