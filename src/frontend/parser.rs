//! Parsing Python source with tree-sitter.
//!
//! The parser itself is external; this module only wires it up, turns error nodes into a
//! `ParseError` and picks the root node according to the requested `Mode`.

use std::fmt;

use clap::ValueEnum;
use tree_sitter::{Language, Node, Tree};

use super::utils::{preview, Position};
use crate::error::ParseError;

/// What the source is expected to contain.
///     - `Exec`: a whole module, the module node is the root
///     - `Eval`: one expression, the expression node is the root; a bare tuple like `a, b`
///     has no node of its own and is rooted at its `expression_statement`
///     - `Single`: one statement, the statement node is the root; several simple statements
///     on one line (`x = 1; y = 2`) are rooted at the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    #[default]
    Exec,
    Eval,
    Single,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Mode::Exec => "exec",
                Mode::Eval => "eval",
                Mode::Single => "single",
            }
        )
    }
}

/// Expression statements that `eval` refuses.
const STATEMENT_LIKE: [&str; 2] = ["assignment", "augmented_assignment"];

/// A parsed syntax tree together with the source it was parsed from.
#[derive(Debug)]
pub struct SourceTree {
    source: String,
    tree: Tree,
}

impl SourceTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Select the root node for the given mode.
    pub fn root(&self, mode: Mode) -> Result<Node<'_>, ParseError> {
        let module = self.tree.root_node();
        let root = match mode {
            Mode::Exec => module,
            Mode::Single => single_statement(module, mode)?,
            Mode::Eval => {
                let statement = single_statement(module, mode)?;
                if statement.kind() != "expression_statement" {
                    return Err(mode_error(
                        mode,
                        format!("expected an expression, found '{}'", statement.kind()),
                    ));
                }
                let exprs = named_children(statement);
                if let Some(expr) = exprs.iter().find(|e| STATEMENT_LIKE.contains(&e.kind())) {
                    return Err(mode_error(
                        mode,
                        format!("expected an expression, found '{}'", expr.kind()),
                    ));
                }
                match exprs.as_slice() {
                    // `a,` is a tuple as well, only a lone expression is its own root
                    [expr] if !has_punctuation(statement) => *expr,
                    _ => statement,
                }
            }
        };
        log::debug!("mode {} selected root node '{}'", mode, root.kind());
        Ok(root)
    }
}

/// Thin wrapper around a tree-sitter parser configured for Python.
pub struct Parser {
    inner: tree_sitter::Parser,
}

impl Parser {
    pub fn new() -> Result<Self, ParseError> {
        let mut inner = tree_sitter::Parser::new();
        let language: Language = tree_sitter_python::LANGUAGE.into();
        inner
            .set_language(&language)
            .map_err(|err| ParseError::Language(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse the given source. Any error or missing node in the tree is reported as syntax error.
    pub fn parse(&mut self, source: &str) -> Result<SourceTree, ParseError> {
        let tree = self.inner.parse(source, None).ok_or(ParseError::NoTree)?;
        if let Some(bad) = first_error(tree.root_node()) {
            let msg = if bad.is_missing() {
                format!("missing '{}'", bad.kind())
            } else {
                let text = &source[bad.byte_range()];
                format!("unexpected '{}'", preview(text, 40))
            };
            return Err(ParseError::SyntaxError {
                pos: Position::of(&bad),
                msg,
            });
        }
        Ok(SourceTree {
            source: source.to_string(),
            tree,
        })
    }
}

fn mode_error(mode: Mode, msg: String) -> ParseError {
    ParseError::ModeError { mode, msg }
}

/// Named children of a node, without comments and other extras.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children
}

/// The only statement of `module`, or the module itself when its statements form a single
/// line of simple statements separated by `;`.
fn single_statement(module: Node<'_>, mode: Mode) -> Result<Node<'_>, ParseError> {
    let statements = named_children(module);
    match statements.as_slice() {
        [statement] => Ok(*statement),
        [] => Err(mode_error(mode, "expected a statement, found none".to_string())),
        [_, ..] if mode == Mode::Single && one_line(&statements) => Ok(module),
        _ => Err(mode_error(
            mode,
            format!("expected exactly one statement, found {}", statements.len()),
        )),
    }
}

fn has_punctuation(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| !child.is_named());
    found
}

/// Whether every statement starts on the row the previous one ends on.
fn one_line(statements: &[Node<'_>]) -> bool {
    statements
        .windows(2)
        .all(|pair| pair[1].start_position().row == pair[0].end_position().row)
}

/// The first error or missing node in pre-order, only descending into subtrees that contain one.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
