//! Keys into the plan, and indexes into a plan borrowed immutably.

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use super::*;

/// Operators are referenced through a [Key]. Access is checked, and keys are
/// generational so a stale key never reaches a newer operator.
pub type Key<T> = Index<T, usize, NonzeroGeneration<usize>>;

/// A hashable position in a plan that is borrowed immutably for `'imm`.
///
/// While the borrow lasts the plan cannot change, so the generation of the
/// key it was made from can be dropped.
pub struct Idx<'imm, T> {
    position: usize,
    _plan: PhantomData<(&'imm Plan, fn() -> T)>,
}

impl<'imm, T> Idx<'imm, T> {
    pub fn new(key: Key<T>, _plan: &'imm Plan) -> Self {
        Idx {
            position: key.arr_idx(),
            _plan: PhantomData,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T> Clone for Idx<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<'_, T> {}

impl<T> PartialEq for Idx<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<T> Eq for Idx<'_, T> {}

impl<T> Hash for Idx<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state)
    }
}

impl<T> fmt::Debug for Idx<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.position)
    }
}
