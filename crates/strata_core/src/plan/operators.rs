//! # Relational operators
//! Each operator references its inputs by [`Key`], so one operator can be the
//! input of many others. The order of inputs is significant (for example the
//! left and right of a [`Join`]) and is the order returned by
//! [`Operator::children`].
//!
//! Operators are received already validated and typed. Scalar logic is held
//! as opaque [`Scalar`]s.

use smallvec::{smallvec, SmallVec};

use super::{Key, Scalar};
use crate::value::{ElementShape, Row, Value};

/// Read a table from the schema at `schema` (a path of sub-schema names from
/// the root the plan is compiled against).
pub struct Scan {
    pub schema: Vec<String>,
    pub table: String,
    /// `INV`: the table found must have a compatible shape
    pub shape: ElementShape,
}

/// Read the table produced by applying a table function to literal arguments.
pub struct Call {
    pub schema: Vec<String>,
    pub function: String,
    pub args: Vec<Value>,
    pub shape: ElementShape,
}

/// Literal rows.
pub struct Values {
    pub rows: Vec<Row>,
    pub shape: ElementShape,
}

/// Keep rows for which the predicate is `true`.
pub struct Filter {
    pub input: Key<Operator>,
    pub predicate: Scalar,
}

/// Compute a new row from each input row.
pub struct Project {
    pub input: Key<Operator>,
    /// `INV`: one per field of `shape`
    pub exprs: Vec<Scalar>,
    pub shape: ElementShape,
}

pub enum JoinKind {
    Cross,
    /// Evaluated over the concatenated row.
    Predicate(Scalar),
    /// Keys are compared pairwise, a null key never matches.
    /// `INV`: `left.len() == right.len()`
    Equi {
        left: Vec<Scalar>,
        right: Vec<Scalar>,
    },
}

/// An inner join. Output rows are the left fields followed by the right.
pub struct Join {
    pub left: Key<Operator>,
    pub right: Key<Operator>,
    pub kind: JoinKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Count,
    Sum,
    Min,
    Max,
}

pub struct AggCall {
    pub kind: AggKind,
    /// `None` only for `count(*)`
    pub arg: Option<Scalar>,
}

/// Group rows by keys, producing the key fields followed by one field per
/// call. Without keys there is exactly one output row, even for no input.
pub struct Aggregate {
    pub input: Key<Operator>,
    pub group_by: Vec<Scalar>,
    pub calls: Vec<AggCall>,
    /// `INV`: `group_by.len() + calls.len()` fields
    pub shape: ElementShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A stable sort, by keys in order of priority.
pub struct Sort {
    pub input: Key<Operator>,
    pub keys: Vec<(Scalar, SortOrder)>,
}

pub struct Take {
    pub input: Key<Operator>,
    pub n: usize,
}

/// Concatenate all inputs in order, keeping duplicates.
/// `INV`: at least one input
pub struct Union {
    pub inputs: Vec<Key<Operator>>,
}

macro_rules! operator_enum {
    ($($op:ident),* $(,)?) => {
        pub enum Operator {
            $($op($op),)*
        }

        $(
            impl From<$op> for Operator {
                fn from(op: $op) -> Self {
                    Operator::$op(op)
                }
            }
        )*

        impl Operator {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Operator::$op(_) => stringify!($op),)*
                }
            }
        }
    };
}

operator_enum! {
    // sources
    Scan,
    Call,
    Values,

    // row at a time
    Filter,
    Project,

    // blocking
    Aggregate,
    Sort,

    // cardinality
    Take,

    // combining streams
    Join,
    Union,
}

impl Operator {
    /// Inputs in their significant order.
    pub fn children(&self) -> SmallVec<[Key<Operator>; 2]> {
        match self {
            Operator::Scan(_) | Operator::Call(_) | Operator::Values(_) => SmallVec::new(),
            Operator::Filter(Filter { input, .. })
            | Operator::Project(Project { input, .. })
            | Operator::Aggregate(Aggregate { input, .. })
            | Operator::Sort(Sort { input, .. })
            | Operator::Take(Take { input, .. }) => smallvec![*input],
            Operator::Join(Join { left, right, .. }) => smallvec![*left, *right],
            Operator::Union(Union { inputs }) => inputs.iter().copied().collect(),
        }
    }

    /// Checks for the `INV`s on operator fields.
    pub(super) fn check_invariants(&self) {
        match self {
            Operator::Values(Values { rows, shape }) => assert!(
                rows.iter().all(|row| shape.admits(row)),
                "values must have shape {shape}"
            ),
            Operator::Project(Project { exprs, shape, .. }) => assert_eq!(
                exprs.len(),
                shape.width(),
                "a projection needs one expression per field"
            ),
            Operator::Aggregate(Aggregate {
                group_by,
                calls,
                shape,
                ..
            }) => {
                assert_eq!(
                    group_by.len() + calls.len(),
                    shape.width(),
                    "an aggregate needs one key or call per field"
                );
                assert!(
                    calls
                        .iter()
                        .all(|call| call.arg.is_some() || call.kind == AggKind::Count),
                    "only count can be applied to whole rows"
                );
            }
            Operator::Join(Join {
                kind: JoinKind::Equi { left, right },
                ..
            }) => assert_eq!(left.len(), right.len(), "equi join keys must pair up"),
            Operator::Union(Union { inputs }) => {
                assert!(!inputs.is_empty(), "a union needs at least one input")
            }
            _ => {}
        }
    }
}
