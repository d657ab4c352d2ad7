//! The frontend module contains everything that is concerned with turning Python source code
//! into the flat record encoding.
//!
//! # Parser
//! Parsing is done by tree-sitter with the Python grammar. The `parser` module only sets it
//! up, reports syntax errors and selects the root node according to the parse `Mode`.
//!
//! # Syntax nodes
//! The flattener does not look at tree-sitter directly. It works on anything implementing
//! `syntax::SyntaxNode`, i.e. a node with a type name and a fixed list of declared fields.
//! `ast::PyNode` provides that view for Python, with the field lists taken from the grammar's
//! node type table (`schema`) and token nodes turned into scalars (`token`).
//!
//! # Flattener
//! `flatten::Flattener` walks the tree depth-first and emits one node record per node and one
//! attr record per field.
//! ### Example
//! ```text
//! let records = frontend::flatten_source("def func(a, b): pass", &FlattenOptions::with_mode(Mode::Single))?;
//! ```

pub mod ast;
pub mod flatten;
pub mod parser;
pub mod schema;
pub mod syntax;
pub mod token;
pub mod utils;

use crate::error::Result;
use crate::record::FlatRecord;

use self::{ast::PyNode, flatten::{FlattenOptions, Flattener}, parser::Parser};

/// Parse Python source and flatten the root selected by `options.mode`.
pub fn flatten_source(source: &str, options: &FlattenOptions) -> Result<Vec<FlatRecord>> {
    let tree = Parser::new()?.parse(source)?;
    let root = tree.root(options.mode)?;
    let schema = schema::python()?;
    let records = Flattener::new(options).flatten(&PyNode::new(root, tree.source(), schema))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Mode;
    use crate::record::{RecordKind, Scalar};
    use rstest::rstest;

    fn values(records: &[FlatRecord]) -> Vec<Scalar> {
        records.iter().flat_map(|r| r.value().to_vec()).collect()
    }

    #[test]
    fn test_function_definition() {
        let records = flatten_source(
            "def func(a, b):\n    pass\n",
            &FlattenOptions::with_mode(Mode::Single),
        )
        .unwrap();
        assert_eq!(records[0].kind(), RecordKind::Node);
        assert_eq!(records[0].label(), "function_definition");
        let name = records[0]
            .children()
            .iter()
            .map(|&i| &records[i])
            .find(|r| r.label() == "name")
            .unwrap();
        assert_eq!(name.value(), &[Scalar::from("func")]);
        assert!(name.children().is_empty());
    }

    #[test]
    fn test_parameters_become_values() {
        let records = flatten_source(
            "def func(a, b):\n    pass\n",
            &FlattenOptions::with_mode(Mode::Single),
        )
        .unwrap();
        let parameters = records
            .iter()
            .position(|r| r.kind() == RecordKind::Node && r.label() == "parameters")
            .unwrap();
        let values: Vec<&Scalar> = records[parameters]
            .children()
            .iter()
            .flat_map(|&i| records[i].value())
            .collect();
        assert_eq!(values, vec![&Scalar::from("a"), &Scalar::from("b")]);
    }

    #[test]
    fn test_module_root() {
        let records = flatten_source("import os\nx = 1\n", &FlattenOptions::default()).unwrap();
        assert_eq!(records[0].label(), "module");
        let body = &records[records[0].children()[0]];
        assert_eq!(body.label(), "children");
        assert_eq!(body.children().len(), 2);
    }

    #[test]
    fn test_literals() {
        let records = flatten_source("f(1, 2.5, None, True, 'x')", &FlattenOptions::with_mode(Mode::Eval)).unwrap();
        let values = values(&records);
        for expected in [
            Scalar::from("f"),
            Scalar::Int(1),
            Scalar::Float(2.5),
            Scalar::None,
            Scalar::Bool(true),
            Scalar::from("x"),
        ] {
            assert!(values.contains(&expected), "missing {:?} in {:?}", expected, values);
        }
    }

    #[rstest]
    #[case("with open(p) as f:\n    pass\n", "f")]
    #[case("async def g():\n    async with lock as held:\n        pass\n", "held")]
    #[case("try:\n    pass\nexcept ValueError as e:\n    pass\n", "e")]
    #[case("try:\n    pass\nexcept* OSError as group:\n    pass\n", "group")]
    #[case("match x:\n    case [a] as b:\n        pass\n", "b")]
    fn test_as_targets(#[case] source: &str, #[case] name: &str) {
        let records = flatten_source(source, &FlattenOptions::default()).unwrap();
        assert_eq!(records[0].label(), "module");
        assert!(values(&records).contains(&Scalar::from(name)), "{:?}", records);
    }

    #[test]
    fn test_parameter_separators() {
        let records = flatten_source(
            "def f(a, /, *, c): pass",
            &FlattenOptions::with_mode(Mode::Single),
        )
        .unwrap();
        let parameters = records
            .iter()
            .position(|r| r.kind() == RecordKind::Node && r.label() == "parameters")
            .unwrap();
        let values: Vec<&Scalar> = records[parameters]
            .children()
            .iter()
            .flat_map(|&i| records[i].value())
            .collect();
        assert_eq!(
            values,
            vec![
                &Scalar::from("a"),
                &Scalar::from("/"),
                &Scalar::from("*"),
                &Scalar::from("c")
            ]
        );
        assert!(!records.iter().any(|r| r.label().ends_with("_separator")));
    }

    #[test]
    fn test_relaxed_modes() {
        let records = flatten_source("a, b", &FlattenOptions::with_mode(Mode::Eval)).unwrap();
        assert_eq!(records[0].label(), "expression_statement");
        assert_eq!(values(&records), vec![Scalar::from("a"), Scalar::from("b")]);

        let records =
            flatten_source("x = 1; y = 2\n", &FlattenOptions::with_mode(Mode::Single)).unwrap();
        assert_eq!(records[0].label(), "module");
        assert_eq!(records[records[0].children()[0]].children().len(), 2);
    }

    #[test]
    fn test_syntax_error_propagates() {
        let err = flatten_source("def (:", &FlattenOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AstGraphError::Parse(crate::error::ParseError::SyntaxError { .. })
        ));
    }
}
