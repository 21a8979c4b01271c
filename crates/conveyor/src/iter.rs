use std::{cmp::Ordering, hash::Hash};

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use super::Physical;

macro_rules! stream { ($data:ty) => { Box<dyn Iterator<Item = $data> + Send> }; }

/// ## Rust Iterator based Operators
/// Implements a lazily evaluated pull model.
/// - **Pull** streaming operators (map, filter, take, union) wrap the input
///   iterator directly.
/// - **Deferred** blocking operators (sort, joins, grouping, fold) buffer
///   their input only when the first value is pulled, so building a pipeline
///   never evaluates it.
///
/// Each exported stream is an independent traversal. To traverse a source
/// twice, build the pipeline twice.
pub struct Iter;

/// Runs `build` on the first pull and streams its result.
struct Deferred<F, I> {
    build: Option<F>,
    iter: Option<I>,
}

impl<F, I> Iterator for Deferred<F, I>
where
    F: FnOnce() -> I,
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(build) = self.build.take() {
            self.iter = Some(build());
        }
        self.iter.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.iter {
            Some(iter) => iter.size_hint(),
            None => (0, None),
        }
    }
}

fn deferred<Data, I>(build: impl FnOnce() -> I + Send + 'static) -> stream!(Data)
where
    Data: Send + 'static,
    I: Iterator<Item = Data> + Send + 'static,
{
    Box::new(Deferred {
        build: Some(build),
        iter: None,
    })
}

impl Physical for Iter {
    type Stream<Data: Send + 'static> = stream!(Data);

    fn consume_stream<Data>(iter: impl Iterator<Item = Data> + Send + 'static) -> stream!(Data)
    where
        Data: Send + 'static,
    {
        Box::new(iter)
    }

    fn export_stream<Data>(stream: stream!(Data)) -> stream!(Data)
    where
        Data: Send + 'static,
    {
        stream
    }

    fn map<InData, OutData>(
        stream: stream!(InData),
        mapping: impl Fn(InData) -> OutData + Send + 'static,
    ) -> stream!(OutData)
    where
        InData: Send + 'static,
        OutData: Send + 'static,
    {
        Box::new(stream.map(mapping))
    }

    fn filter<Data>(
        stream: stream!(Data),
        predicate: impl Fn(&Data) -> bool + Send + 'static,
    ) -> stream!(Data)
    where
        Data: Send + 'static,
    {
        Box::new(stream.filter(move |data| predicate(data)))
    }

    fn fold<InData, Acc>(
        stream: stream!(InData),
        initial: Acc,
        fold_fn: impl Fn(Acc, InData) -> Acc + Send + 'static,
    ) -> stream!(Acc)
    where
        InData: Send + 'static,
        Acc: Send + 'static,
    {
        deferred(move || std::iter::once(stream.fold(initial, fold_fn)))
    }

    fn sort<Data>(
        stream: stream!(Data),
        ordering: impl Fn(&Data, &Data) -> Ordering + Send + 'static,
    ) -> stream!(Data)
    where
        Data: Send + 'static,
    {
        deferred(move || {
            let mut data = stream.collect::<Vec<_>>();
            data.sort_by(ordering);
            data.into_iter()
        })
    }

    fn take<Data>(stream: stream!(Data), n: usize) -> stream!(Data)
    where
        Data: Send + 'static,
    {
        Box::new(stream.take(n))
    }

    fn group_by<Key, Rest, Data>(
        stream: stream!(Data),
        split: impl Fn(Data) -> (Key, Rest) + Send + 'static,
    ) -> stream!((Key, Vec<Rest>))
    where
        Data: Send + 'static,
        Key: Eq + Hash + Send + 'static,
        Rest: Send + 'static,
    {
        deferred(move || {
            let mut groups = IndexMap::with_hasher(FxBuildHasher);
            for data in stream {
                let (k, r) = split(data);
                groups.entry(k).or_insert_with(Vec::new).push(r);
            }
            groups.into_iter()
        })
    }

    fn cross_join<LeftData, RightData>(
        left: stream!(LeftData),
        right: stream!(RightData),
    ) -> stream!((LeftData, RightData))
    where
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static,
    {
        deferred(move || {
            let right_vals = right.collect::<Vec<_>>();
            left.flat_map(move |l| {
                right_vals
                    .iter()
                    .map(|r| (l.clone(), r.clone()))
                    .collect::<Vec<_>>()
            })
        })
    }

    fn equi_join<LeftData, RightData, Key>(
        left: stream!(LeftData),
        right: stream!(RightData),
        left_key: impl Fn(&LeftData) -> Key + Send + 'static,
        right_key: impl Fn(&RightData) -> Key + Send + 'static,
    ) -> stream!((LeftData, RightData))
    where
        Key: Eq + Hash + Send + 'static,
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static,
    {
        deferred(move || {
            let mut rights = FxHashMap::default();
            for r in right {
                rights.entry(right_key(&r)).or_insert_with(Vec::new).push(r);
            }
            left.flat_map(move |l| match rights.get(&left_key(&l)) {
                Some(rs) => rs.iter().map(|r| (l.clone(), r.clone())).collect::<Vec<_>>(),
                None => Vec::new(),
            })
        })
    }

    fn predicate_join<LeftData, RightData>(
        left: stream!(LeftData),
        right: stream!(RightData),
        pred: impl Fn(&LeftData, &RightData) -> bool + Send + 'static,
    ) -> stream!((LeftData, RightData))
    where
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static,
    {
        deferred(move || {
            let right_vals = right.collect::<Vec<_>>();
            left.flat_map(move |l| {
                right_vals
                    .iter()
                    .filter(|r| pred(&l, r))
                    .map(|r| (l.clone(), r.clone()))
                    .collect::<Vec<_>>()
            })
        })
    }

    fn union<Data>(left: stream!(Data), right: stream!(Data)) -> stream!(Data)
    where
        Data: Send + 'static,
    {
        Box::new(left.chain(right))
    }
}
