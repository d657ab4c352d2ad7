//! Leaf decoupling: turning scalar values into explicit leaf records.
//!
//! In the flat encoding a field holding scalars stores them in its `value` list. For drawing
//! the tree every scalar needs a vertex of its own, so `decouple_leaves` appends one leaf
//! record per scalar and references it from the owning record's `children`. Afterwards
//! `children` alone describes the whole tree.
//!
//! The input is never modified. A sequence that already contains leaves is rejected, which
//! keeps a second pass from expanding the same values twice.

use crate::error::ReconstructError;
use crate::record::{FlatRecord, RecordKind};

/// Check the structure of a record sequence before it is turned into a graph.
pub fn validate(records: &[FlatRecord]) -> Result<(), ReconstructError> {
    match records.first() {
        None => return Err(ReconstructError::Empty),
        Some(root) if root.kind() != RecordKind::Node => {
            return Err(ReconstructError::RootNotNode { found: root.kind() })
        }
        _ => (),
    }
    for (record, entry) in records.iter().enumerate() {
        for &child in entry.children() {
            if child >= records.len() {
                return Err(ReconstructError::ChildOutOfBounds {
                    record,
                    child,
                    len: records.len(),
                });
            }
            if child <= record {
                return Err(ReconstructError::ChildBeforeParent { record, child });
            }
        }
    }
    Ok(())
}

/// Return a copy of `records` with one leaf record appended per scalar.
///
/// Leaves are appended in record order and, within a record, in `value` order. The `value`
/// lists themselves are kept.
pub fn decouple_leaves(records: &[FlatRecord]) -> Result<Vec<FlatRecord>, ReconstructError> {
    if let Some(record) = records.iter().position(|r| r.kind() == RecordKind::Leaf) {
        return Err(ReconstructError::AlreadyDecoupled { record });
    }
    validate(records)?;

    let mut expanded = records.to_vec();
    let mut leaves = Vec::new();
    let mut next = records.len();
    for record in expanded.iter_mut() {
        if let FlatRecord::Attr {
            children, value, ..
        } = record
        {
            for scalar in value.iter() {
                leaves.push(FlatRecord::Leaf {
                    name: scalar.clone(),
                });
                children.push(next);
                next += 1;
            }
        }
    }
    log::debug!(
        "decoupled {} leaves from {} records",
        leaves.len(),
        records.len()
    );
    expanded.extend(leaves);
    Ok(expanded)
}
