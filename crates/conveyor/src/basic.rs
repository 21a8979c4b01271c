use std::{cmp::Ordering, hash::Hash};

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use super::Physical;

/// Extremely basic push operators.
/// - Every operator fully evaluates its input into a [`Vec`]
/// - Useful as a reference for [`super::Iter`], and when a pipeline will be
///   consumed in full anyway.
pub struct Basic;

impl Physical for Basic {
    type Stream<Data: Send + 'static> = Vec<Data>;

    fn consume_stream<Data>(iter: impl Iterator<Item = Data> + Send + 'static) -> Vec<Data>
    where
        Data: Send + 'static,
    {
        iter.collect()
    }

    fn export_stream<Data>(stream: Vec<Data>) -> Box<dyn Iterator<Item = Data> + Send>
    where
        Data: Send + 'static,
    {
        Box::new(stream.into_iter())
    }

    fn map<InData, OutData>(
        stream: Vec<InData>,
        mapping: impl Fn(InData) -> OutData + Send + 'static,
    ) -> Vec<OutData>
    where
        InData: Send + 'static,
        OutData: Send + 'static,
    {
        stream.into_iter().map(mapping).collect()
    }

    fn filter<Data>(
        stream: Vec<Data>,
        predicate: impl Fn(&Data) -> bool + Send + 'static,
    ) -> Vec<Data>
    where
        Data: Send + 'static,
    {
        stream.into_iter().filter(|data| predicate(data)).collect()
    }

    fn fold<InData, Acc>(
        stream: Vec<InData>,
        initial: Acc,
        fold_fn: impl Fn(Acc, InData) -> Acc + Send + 'static,
    ) -> Vec<Acc>
    where
        InData: Send + 'static,
        Acc: Send + 'static,
    {
        let mut acc = initial;
        for data in stream {
            acc = fold_fn(acc, data);
        }
        vec![acc]
    }

    fn sort<Data>(
        mut stream: Vec<Data>,
        ordering: impl Fn(&Data, &Data) -> Ordering + Send + 'static,
    ) -> Vec<Data>
    where
        Data: Send + 'static,
    {
        stream.sort_by(ordering);
        stream
    }

    fn take<Data>(mut stream: Vec<Data>, n: usize) -> Vec<Data>
    where
        Data: Send + 'static,
    {
        stream.truncate(n);
        stream
    }

    fn group_by<Key, Rest, Data>(
        stream: Vec<Data>,
        split: impl Fn(Data) -> (Key, Rest) + Send + 'static,
    ) -> Vec<(Key, Vec<Rest>)>
    where
        Data: Send + 'static,
        Key: Eq + Hash + Send + 'static,
        Rest: Send + 'static,
    {
        let mut groups = IndexMap::with_hasher(FxBuildHasher);
        for data in stream {
            let (k, r) = split(data);
            groups.entry(k).or_insert_with(Vec::new).push(r);
        }
        groups.into_iter().collect()
    }

    fn cross_join<LeftData, RightData>(
        left: Vec<LeftData>,
        right: Vec<RightData>,
    ) -> Vec<(LeftData, RightData)>
    where
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static,
    {
        let mut result = Vec::with_capacity(left.len() * right.len());
        for l in left {
            for r in &right {
                result.push((l.clone(), r.clone()));
            }
        }
        result
    }

    fn equi_join<LeftData, RightData, Key>(
        left: Vec<LeftData>,
        right: Vec<RightData>,
        left_key: impl Fn(&LeftData) -> Key + Send + 'static,
        right_key: impl Fn(&RightData) -> Key + Send + 'static,
    ) -> Vec<(LeftData, RightData)>
    where
        Key: Eq + Hash + Send + 'static,
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static,
    {
        let mut rights = FxHashMap::default();
        for r in &right {
            rights.entry(right_key(r)).or_insert_with(Vec::new).push(r);
        }
        let mut results = Vec::new();
        for l in left {
            if let Some(rs) = rights.get(&left_key(&l)) {
                for r in rs {
                    results.push((l.clone(), (*r).clone()))
                }
            }
        }
        results
    }

    fn predicate_join<LeftData, RightData>(
        left: Vec<LeftData>,
        right: Vec<RightData>,
        pred: impl Fn(&LeftData, &RightData) -> bool + Send + 'static,
    ) -> Vec<(LeftData, RightData)>
    where
        LeftData: Clone + Send + 'static,
        RightData: Clone + Send + 'static,
    {
        let mut results = Vec::new();
        for l in &left {
            for r in &right {
                if pred(l, r) {
                    results.push((l.clone(), r.clone()));
                }
            }
        }
        results
    }

    fn union<Data>(mut left: Vec<Data>, right: Vec<Data>) -> Vec<Data>
    where
        Data: Send + 'static,
    {
        left.extend(right);
        left
    }
}
