//! Flattening of a syntax tree into an index-addressed record list.
//!
//! Every node becomes a node record and every declared field of a node becomes an attr
//! record. A record's index is reserved before anything below it is visited, so all child
//! indices of a record are greater than its own and the root always sits at index 0.
//!
//! For the node `a + 1` the output is
//! ```text
//! 0: {"type":"node","name":"binary_operator","children":[1,2,3]}
//! 1: {"type":"attr","name":"left","value":["a"]}
//! 2: {"type":"attr","name":"operator","value":["+"]}
//! 3: {"type":"attr","name":"right","value":[1]}
//! ```

use super::parser::Mode;
use super::syntax::{Field, FieldValue, SyntaxNode};
use crate::error::FlattenError;
use crate::record::{FlatRecord, Scalar};

/// Settings for turning source code into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    pub mode: Mode,
    /// Maximum number of nested nodes. Guards the recursion against hostile input.
    pub max_depth: usize,
}

impl FlattenOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 1000;

    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Exec,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Collects the records of one flatten pass.
pub struct Flattener {
    records: Vec<FlatRecord>,
    max_depth: usize,
    depth: usize,
}

impl Flattener {
    pub fn new(options: &FlattenOptions) -> Self {
        Self {
            records: Vec::new(),
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Flatten the tree below `root`. The root ends up at index 0.
    pub fn flatten<N: SyntaxNode>(mut self, root: &N) -> Result<Vec<FlatRecord>, FlattenError> {
        self.emit_node(root)?;
        log::debug!(
            "flattened '{}' into {} records",
            root.type_name(),
            self.records.len()
        );
        Ok(self.records)
    }

    /// Append a record and return its index.
    fn reserve(&mut self, record: FlatRecord) -> usize {
        let pos = self.records.len();
        self.records.push(record);
        pos
    }

    fn emit_node<N: SyntaxNode>(&mut self, node: &N) -> Result<usize, FlattenError> {
        if self.depth >= self.max_depth {
            return Err(FlattenError::DepthLimitExceeded {
                limit: self.max_depth,
                node: node.type_name().to_string(),
            });
        }
        self.depth += 1;

        let pos = self.reserve(FlatRecord::node(node.type_name()));
        let mut attrs = Vec::new();
        for field in node.fields()? {
            attrs.push(self.emit_attr(field)?);
        }
        if let FlatRecord::Node { children, .. } = &mut self.records[pos] {
            *children = attrs;
        }

        self.depth -= 1;
        Ok(pos)
    }

    fn emit_attr<N: SyntaxNode>(&mut self, field: Field<N>) -> Result<usize, FlattenError> {
        let pos = self.reserve(FlatRecord::attr(&field.name));
        let mut nodes = Vec::new();
        let mut scalars = Vec::new();
        self.emit_items(field.value, &mut nodes, &mut scalars)?;
        if let FlatRecord::Attr {
            children, value, ..
        } = &mut self.records[pos]
        {
            *children = nodes;
            *value = scalars;
        }
        Ok(pos)
    }

    /// Sort the content of a field into node indices and scalars. Nested lists are flattened.
    fn emit_items<N: SyntaxNode>(
        &mut self,
        items: FieldValue<N>,
        nodes: &mut Vec<usize>,
        scalars: &mut Vec<Scalar>,
    ) -> Result<(), FlattenError> {
        match items {
            FieldValue::Scalar(s) => scalars.push(s),
            FieldValue::Node(node) => nodes.push(self.emit_node(&node)?),
            FieldValue::List(list) => {
                for item in list {
                    self.emit_items(item, nodes, scalars)?;
                }
            }
        }
        Ok(())
    }
}

/// Flatten `root` with default options.
pub fn flatten<N: SyntaxNode>(root: &N) -> Result<Vec<FlatRecord>, FlattenError> {
    Flattener::new(&FlattenOptions::default()).flatten(root)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::RecordKind;
    use proptest::prelude::*;

    /// Hand-built tree used to test the flattener without a parser.
    #[derive(Debug, Clone)]
    pub struct TestNode {
        pub name: &'static str,
        pub fields: Vec<(&'static str, TestValue)>,
    }

    #[derive(Debug, Clone)]
    pub enum TestValue {
        S(Scalar),
        N(TestNode),
        L(Vec<TestValue>),
    }

    impl TestNode {
        pub fn new(name: &'static str, fields: Vec<(&'static str, TestValue)>) -> Self {
            Self { name, fields }
        }
    }

    fn convert(value: &TestValue) -> FieldValue<&TestNode> {
        match value {
            TestValue::S(s) => FieldValue::Scalar(s.clone()),
            TestValue::N(n) => FieldValue::Node(n),
            TestValue::L(items) => FieldValue::List(items.iter().map(convert).collect()),
        }
    }

    impl<'a> SyntaxNode for &'a TestNode {
        fn type_name(&self) -> &str {
            self.name
        }

        fn fields(&self) -> Result<Vec<Field<Self>>, FlattenError> {
            let node: &'a TestNode = *self;
            Ok(node
                .fields
                .iter()
                .map(|(name, value)| Field::new(name, convert(value)))
                .collect())
        }
    }

    fn s(text: &str) -> TestValue {
        TestValue::S(Scalar::from(text))
    }

    /// `def func(a, b): pass` in the shape of Python's own `ast` module.
    pub fn function_def() -> TestNode {
        let arg = |name| TestValue::N(TestNode::new("arg", vec![("arg", s(name))]));
        TestNode::new(
            "FunctionDef",
            vec![
                ("name", s("func")),
                (
                    "args",
                    TestValue::N(TestNode::new(
                        "arguments",
                        vec![("args", TestValue::L(vec![arg("a"), arg("b")]))],
                    )),
                ),
                (
                    "body",
                    TestValue::L(vec![TestValue::N(TestNode::new("Pass", vec![]))]),
                ),
                ("decorator_list", TestValue::L(vec![])),
                ("returns", TestValue::S(Scalar::None)),
            ],
        )
    }

    #[test]
    fn test_function_def() {
        let records = flatten(&&function_def()).unwrap();
        let attr = |name: &str, children: Vec<usize>, value: Vec<Scalar>| FlatRecord::Attr {
            name: name.to_string(),
            children,
            value,
        };
        let node = |name: &str, children: Vec<usize>| FlatRecord::Node {
            name: name.to_string(),
            children,
        };
        assert_eq!(
            records,
            vec![
                node("FunctionDef", vec![1, 2, 9, 11, 12]),
                attr("name", vec![], vec![Scalar::from("func")]),
                attr("args", vec![3], vec![]),
                node("arguments", vec![4]),
                attr("args", vec![5, 7], vec![]),
                node("arg", vec![6]),
                attr("arg", vec![], vec![Scalar::from("a")]),
                node("arg", vec![8]),
                attr("arg", vec![], vec![Scalar::from("b")]),
                attr("body", vec![10], vec![]),
                node("Pass", vec![]),
                attr("decorator_list", vec![], vec![]),
                attr("returns", vec![], vec![Scalar::None]),
            ]
        );
    }

    #[test]
    fn test_mixed_list() {
        let node = TestNode::new(
            "Compare",
            vec![(
                "items",
                TestValue::L(vec![
                    s("x"),
                    TestValue::N(TestNode::new("Name", vec![])),
                    TestValue::L(vec![TestValue::S(Scalar::Int(2))]),
                ]),
            )],
        );
        let records = flatten(&&node).unwrap();
        assert_eq!(
            records[1],
            FlatRecord::Attr {
                name: "items".into(),
                children: vec![2],
                value: vec![Scalar::from("x"), Scalar::Int(2)],
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut node = TestNode::new("Leaf", vec![]);
        for _ in 0..5 {
            node = TestNode::new("Wrap", vec![("inner", TestValue::N(node))]);
        }
        let options = FlattenOptions {
            max_depth: 3,
            ..FlattenOptions::default()
        };
        let err = Flattener::new(&options).flatten(&&node).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::DepthLimitExceeded { limit: 3, ref node } if node == "Wrap"
        ));
        let options = FlattenOptions {
            max_depth: 6,
            ..FlattenOptions::default()
        };
        assert_eq!(Flattener::new(&options).flatten(&&node).unwrap().len(), 11);
    }

    #[test]
    fn test_default_options() {
        let options = FlattenOptions::default();
        assert_eq!(options.max_depth, 1000);
        assert_eq!(options.mode, Mode::Exec);
        assert_eq!(FlattenOptions::with_mode(Mode::Eval).max_depth, 1000);
    }

    const NAMES: [&str; 4] = ["Module", "Call", "Name", "BinOp"];
    const FIELDS: [&str; 4] = ["body", "func", "args", "value"];

    fn arb_scalar() -> impl Strategy<Value = Scalar> {
        prop_oneof![
            Just(Scalar::None),
            any::<bool>().prop_map(Scalar::Bool),
            any::<i64>().prop_map(Scalar::Int),
            "[a-z]{1,8}".prop_map(Scalar::Str),
        ]
    }

    fn arb_node(value: impl Strategy<Value = TestValue>) -> impl Strategy<Value = TestNode> {
        (
            prop::sample::select(NAMES.to_vec()),
            prop::collection::vec(value, 0..4),
        )
            .prop_map(|(name, values)| {
                let fields = values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (FIELDS[i % FIELDS.len()], v))
                    .collect();
                TestNode::new(name, fields)
            })
    }

    fn arb_value() -> impl Strategy<Value = TestValue> {
        let leaf = arb_scalar().prop_map(TestValue::S);
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(TestValue::L),
                arb_node(inner).prop_map(TestValue::N),
            ]
        })
    }

    pub fn arb_tree() -> impl Strategy<Value = TestNode> {
        arb_node(arb_value())
    }

    proptest! {
        #[test]
        fn prop_children_come_after_parent(tree in arb_tree()) {
            let records = flatten(&&tree).unwrap();
            for (i, record) in records.iter().enumerate() {
                for &child in record.children() {
                    prop_assert!(child > i);
                    prop_assert!(child < records.len());
                }
            }
        }

        #[test]
        fn prop_single_root_at_zero(tree in arb_tree()) {
            let records = flatten(&&tree).unwrap();
            prop_assert_eq!(records[0].kind(), RecordKind::Node);
            let mut referenced = vec![false; records.len()];
            for record in &records {
                for &child in record.children() {
                    prop_assert!(!referenced[child]);
                    referenced[child] = true;
                }
            }
            let roots: Vec<usize> = (0..records.len()).filter(|&i| !referenced[i]).collect();
            prop_assert_eq!(roots, vec![0]);
        }

        #[test]
        fn prop_no_empty_containers(tree in arb_tree()) {
            let records = flatten(&&tree).unwrap();
            let json = serde_json::to_value(&records).unwrap();
            for record in json.as_array().unwrap() {
                for key in ["children", "value"] {
                    if let Some(list) = record.get(key) {
                        prop_assert!(!list.as_array().unwrap().is_empty());
                    }
                }
            }
        }

        #[test]
        fn prop_deterministic(tree in arb_tree()) {
            prop_assert_eq!(flatten(&&tree).unwrap(), flatten(&&tree).unwrap());
        }
    }
}
