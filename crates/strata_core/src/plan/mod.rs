//! # Operator plans
//! An arena of [`Operator`]s. A plan is a DAG: the same sub-plan may be the
//! input of several operators (for example after common sub-expression
//! elimination), and the compiler only compiles it once.

use rustc_hash::FxHashMap;
use typed_generational_arena::{Index, NonzeroGeneration, StandardArena as GenArena};

use crate::value::ElementShape;

mod access;
mod operators;
mod scalar;

pub use access::*;
pub use operators::*;
pub use scalar::Scalar;

pub struct Plan {
    pub operators: GenArena<Operator>,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    pub fn new() -> Self {
        Plan {
            operators: GenArena::new(),
        }
    }

    /// Add an operator, all of its inputs must already be in the plan.
    pub fn insert(&mut self, op: impl Into<Operator>) -> Key<Operator> {
        let op = op.into();
        for child in op.children() {
            assert!(
                self.operators.get(child).is_some(),
                "{} refers to an operator that is not in the plan",
                op.name()
            );
        }
        op.check_invariants();
        self.operators.insert(op)
    }

    pub fn get_operator(&self, key: Key<Operator>) -> &Operator {
        self.operators
            .get(key)
            .expect("keys are only created by inserting into the plan")
    }

    /// The number of edges into each operator reachable from `root`.
    pub fn consumers(&self, root: Key<Operator>) -> FxHashMap<Idx<'_, Operator>, usize> {
        let mut counts = FxHashMap::default();
        counts.insert(Idx::new(root, self), 0);
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            for child in self.get_operator(key).children() {
                let count = counts.entry(Idx::new(child, self)).or_insert(0);
                *count += 1;
                if *count == 1 {
                    stack.push(child);
                }
            }
        }
        counts
    }

    /// The shape of rows produced by an operator.
    pub fn shape(&self, key: Key<Operator>) -> ElementShape {
        match self.get_operator(key) {
            Operator::Scan(Scan { shape, .. })
            | Operator::Call(Call { shape, .. })
            | Operator::Values(Values { shape, .. })
            | Operator::Project(Project { shape, .. })
            | Operator::Aggregate(Aggregate { shape, .. }) => shape.clone(),
            Operator::Filter(Filter { input, .. })
            | Operator::Sort(Sort { input, .. })
            | Operator::Take(Take { input, .. }) => self.shape(*input),
            Operator::Join(Join { left, right, .. }) => self.shape(*left).concat(&self.shape(*right)),
            Operator::Union(Union { inputs }) => self.shape(inputs[0]),
        }
    }
}
