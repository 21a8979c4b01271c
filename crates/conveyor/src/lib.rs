//! # Conveyor
//! Physical operators over streams, used to run compiled relational pipelines.
//!
//! ## Strategies
//! Every strategy implements [`Physical`], so a pipeline can be driven by any
//! of them without change:
//! - [`Iter`] Lazily evaluated pull streams (boxed rust iterators). Nothing is
//!   computed until the exported stream is pulled.
//! - [`Basic`] Eager push operators, each producing a [`Vec`].
//!
//! ## Ordering
//! All operators preserve the order of their (left) input. Grouping emits
//! groups in order of first appearance, and joins emit matches in left input
//! order, then right input order.

use std::{cmp::Ordering, hash::Hash};

mod basic;
mod iter;

pub use basic::Basic;
pub use iter::Iter;

/// A physical implementation of stream operators.
///
/// Closures passed to operators must be `Send + 'static` as lazy strategies
/// hold them inside the returned stream.
pub trait Physical {
    type Stream<Data: Send + 'static>: Send + 'static;

    fn consume_stream<Data>(iter: impl Iterator<Item = Data> + Send + 'static) -> Self::Stream<Data>
    where
        Data: Send + 'static;

    fn export_stream<Data>(stream: Self::Stream<Data>) -> Box<dyn Iterator<Item = Data> + Send>
    where
        Data: Send + 'static;

    fn map<InData, OutData>(
        stream: Self::Stream<InData>,
        mapping: impl Fn(InData) -> OutData + Send + 'static,
    ) -> Self::Stream<OutData>
    where
        InData: Send + 'static,
        OutData: Send + 'static;

    fn filter<Data>(
        stream: Self::Stream<Data>,
        predicate: impl Fn(&Data) -> bool + Send + 'static,
    ) -> Self::Stream<Data>
    where
        Data: Send + 'static;

    /// Fold the stream into a stream of exactly one accumulated value.
    fn fold<InData, Acc>(
        stream: Self::Stream<InData>,
        initial: Acc,
        fold_fn: impl Fn(Acc, InData) -> Acc + Send + 'static,
    ) -> Self::Stream<Acc>
    where
        InData: Send + 'static,
        Acc: Send + 'static;

    /// A stable sort.
    fn sort<Data>(
        stream: Self::Stream<Data>,
        ordering: impl Fn(&Data, &Data) -> Ordering + Send + 'static,
    ) -> Self::Stream<Data>
    where
        Data: Send + 'static;

    fn take<Data>(stream: Self::Stream<Data>, n: usize) -> Self::Stream<Data>
    where
        Data: Send + 'static;

    fn group_by<Key, Rest, Data>(
        stream: Self::Stream<Data>,
        split: impl Fn(Data) -> (Key, Rest) + Send + 'static,
    ) -> Self::Stream<(Key, Vec<Rest>)>
    where
        Data: Send + 'static,
        Key: Eq + Hash + Send + 'static,
        Rest: Send + 'static;

    fn cross_join<LeftData, RightData>(
        left: Self::Stream<LeftData>,
        right: Self::Stream<RightData>,
    ) -> Self::Stream<(LeftData, RightData)>
    where
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static;

    fn equi_join<LeftData, RightData, Key>(
        left: Self::Stream<LeftData>,
        right: Self::Stream<RightData>,
        left_key: impl Fn(&LeftData) -> Key + Send + 'static,
        right_key: impl Fn(&RightData) -> Key + Send + 'static,
    ) -> Self::Stream<(LeftData, RightData)>
    where
        Key: Eq + Hash + Send + 'static,
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static;

    fn predicate_join<LeftData, RightData>(
        left: Self::Stream<LeftData>,
        right: Self::Stream<RightData>,
        pred: impl Fn(&LeftData, &RightData) -> bool + Send + 'static,
    ) -> Self::Stream<(LeftData, RightData)>
    where
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static;

    fn union<Data>(left: Self::Stream<Data>, right: Self::Stream<Data>) -> Self::Stream<Data>
    where
        Data: Send + 'static;
}
