//! Sorted views over a sequence.
//!
//! `order_by` and friends return an [`OrderedSequence`] that collects sort
//! levels (`then_by`, `then_by_descending`, ...) until it is turned back into
//! a [`Sequence`]. Sorting happens on the first pull:
//!
//! 1. the source is drained into `(key, item)` entries
//! 2. every level computes its sort key once per entry
//! 3. entry positions are stable-sorted by the levels in order
//!
//! Descending levels reverse the comparison result only, so ties keep their
//! original relative order in both directions.
//!
//! ```
//! use ironseq::Sequence;
//!
//! # fn main() -> ironseq::Result<()> {
//! let people = Sequence::from_vec(vec![("bo", 31), ("al", 25), ("cy", 31)]);
//! let names: Vec<&str> = people
//!     .order_by_descending(|p: &(&str, i32)| p.1)
//!     .then_by(|p: &(&'static str, i32)| p.0)
//!     .prevent_keys()
//!     .map(|p: &(&'static str, i32), _| p.0)
//!     .to_vec()?;
//! assert_eq!(names, vec!["bo", "cy", "al"]);
//! # Ok(())
//! # }
//! ```

use crate::comparer::Comparer;
use crate::error::Result;
use crate::ops::drain;
use crate::sequence::{IntoSequence, Sequence};
use crate::utils::SplitMix64;
use crate::Elem;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

type Ranker = Box<dyn Fn(usize, usize) -> Ordering>;
type Level<K, T> = Rc<dyn Fn(&[(K, T)]) -> Ranker>;

/// A sort level whose keys are computed once per entry by `compute`.
fn level<K, T, U, F>(compute: F, cmp: Comparer<U>, descending: bool) -> Level<K, T>
where
    K: 'static,
    T: 'static,
    U: 'static,
    F: Fn(&[(K, T)]) -> Vec<U> + 'static,
{
    Rc::new(move |entries: &[(K, T)]| -> Ranker {
        let keys = compute(entries);
        let cmp = cmp.clone();
        Box::new(move |a: usize, b: usize| {
            let ordering = cmp.compare(&keys[a], &keys[b]);
            if descending { ordering.reverse() } else { ordering }
        })
    })
}

fn by_selector<K, T, U, S>(selector: S, cmp: Comparer<U>, descending: bool) -> Level<K, T>
where
    K: 'static,
    T: 'static,
    U: 'static,
    S: Fn(&T) -> U + 'static,
{
    level(move |entries: &[(K, T)]| entries.iter().map(|(_, item)| selector(item)).collect(), cmp, descending)
}

/// A sequence with pending sort levels.
pub struct OrderedSequence<T, K = usize> {
    source: Sequence<T, K>,
    levels: Vec<Level<K, T>>,
}

impl<T: 'static, K: 'static> fmt::Debug for OrderedSequence<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSequence")
            .field("source", &self.source)
            .field("levels", &self.levels.len())
            .finish()
    }
}

impl<T: Elem, K: Elem> OrderedSequence<T, K> {
    fn new(source: Sequence<T, K>, first: Level<K, T>) -> Self {
        Self {
            source,
            levels: vec![first],
        }
    }

    fn push(mut self, level: Level<K, T>) -> Self {
        self.levels.push(level);
        self
    }

    /// Break remaining ties by `selector`, ascending.
    #[must_use]
    pub fn then_by<U, S>(self, selector: S) -> Self
    where
        U: PartialOrd + 'static,
        S: Fn(&T) -> U + 'static,
    {
        self.then_by_with(selector, Comparer::natural())
    }

    #[must_use]
    pub fn then_by_with<U, S>(self, selector: S, cmp: Comparer<U>) -> Self
    where
        U: 'static,
        S: Fn(&T) -> U + 'static,
    {
        self.push(by_selector(selector, cmp, false))
    }

    #[must_use]
    pub fn then_by_descending<U, S>(self, selector: S) -> Self
    where
        U: PartialOrd + 'static,
        S: Fn(&T) -> U + 'static,
    {
        self.then_by_descending_with(selector, Comparer::natural())
    }

    #[must_use]
    pub fn then_by_descending_with<U, S>(self, selector: S, cmp: Comparer<U>) -> Self
    where
        U: 'static,
        S: Fn(&T) -> U + 'static,
    {
        self.push(by_selector(selector, cmp, true))
    }

    /// The sorted sequence; every element keeps its original key.
    #[must_use]
    pub fn into_sequence(self) -> Sequence<T, K> {
        let levels = self.levels;
        self.source.deferred("order_by", move |pos| {
            let entries = drain(pos)?;
            let rankers: Vec<Ranker> = levels.iter().map(|level| level(&entries)).collect();
            let mut order: Vec<usize> = (0..entries.len()).collect();
            order.sort_by(|&a, &b| {
                rankers
                    .iter()
                    .map(|rank| rank(a, b))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
            let mut slots: Vec<Option<(K, T)>> = entries.into_iter().map(Some).collect();
            Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
        })
    }

    /// The sorted sequence, renumbered from zero.
    #[must_use]
    pub fn prevent_keys(self) -> Sequence<T> {
        self.into_sequence().values()
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn to_vec(self) -> Result<Vec<T>> {
        self.into_sequence().to_vec()
    }
}

impl<T: Elem, K: Elem> IntoSequence for OrderedSequence<T, K> {
    type Item = T;
    type Key = K;

    fn into_sequence(self) -> Sequence<T, K> {
        Self::into_sequence(self)
    }
}

impl<T: Elem, K: Elem> From<OrderedSequence<T, K>> for Sequence<T, K> {
    fn from(ordered: OrderedSequence<T, K>) -> Self {
        ordered.into_sequence()
    }
}

impl<T: Elem, K: Elem> Sequence<T, K> {
    /// Stable ascending sort by `selector`.
    #[must_use]
    pub fn order_by<U, S>(self, selector: S) -> OrderedSequence<T, K>
    where
        U: PartialOrd + 'static,
        S: Fn(&T) -> U + 'static,
    {
        self.order_by_with(selector, Comparer::natural())
    }

    #[must_use]
    pub fn order_by_with<U, S>(self, selector: S, cmp: Comparer<U>) -> OrderedSequence<T, K>
    where
        U: 'static,
        S: Fn(&T) -> U + 'static,
    {
        OrderedSequence::new(self, by_selector(selector, cmp, false))
    }

    #[must_use]
    pub fn order_by_descending<U, S>(self, selector: S) -> OrderedSequence<T, K>
    where
        U: PartialOrd + 'static,
        S: Fn(&T) -> U + 'static,
    {
        self.order_by_descending_with(selector, Comparer::natural())
    }

    #[must_use]
    pub fn order_by_descending_with<U, S>(self, selector: S, cmp: Comparer<U>) -> OrderedSequence<T, K>
    where
        U: 'static,
        S: Fn(&T) -> U + 'static,
    {
        OrderedSequence::new(self, by_selector(selector, cmp, true))
    }

    /// Sort by the items themselves.
    #[must_use]
    pub fn order(self) -> OrderedSequence<T, K>
    where
        T: PartialOrd,
    {
        self.order_with(Comparer::natural())
    }

    #[must_use]
    pub fn order_with(self, cmp: Comparer<T>) -> OrderedSequence<T, K> {
        self.order_by_with(T::clone, cmp)
    }

    #[must_use]
    pub fn order_descending(self) -> OrderedSequence<T, K>
    where
        T: PartialOrd,
    {
        self.order_by_descending_with(T::clone, Comparer::natural())
    }

    /// The elements in reverse order, keys kept.
    #[must_use]
    pub fn reverse(self) -> Sequence<T, K> {
        let descending_index = level(
            |entries: &[(K, T)]| (0..entries.len()).map(|i| usize::MAX - i).collect(),
            Comparer::natural(),
            false,
        );
        OrderedSequence::new(self, descending_index).into_sequence()
    }

    /// The elements in an order drawn from a generator seeded with `seed`.
    ///
    /// The same seed over the same input always yields the same order.
    #[must_use]
    pub fn randomize(self, seed: u64) -> Sequence<T, K> {
        let draws = level(
            move |entries: &[(K, T)]| {
                let mut rng = SplitMix64::new(seed);
                entries.iter().map(|_| rng.next_u64()).collect()
            },
            Comparer::natural(),
            false,
        );
        OrderedSequence::new(self, draws).into_sequence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_keeps_ties_in_input_order() {
        let seq = Sequence::from_vec(vec![(1, 'a'), (1, 'b'), (2, 'c')]);
        let sorted = seq.order_by_descending(|p: &(i32, char)| p.0).to_vec();
        assert_eq!(sorted.ok(), Some(vec![(2, 'c'), (1, 'a'), (1, 'b')]));
    }

    #[test]
    fn reverse_keeps_original_keys() {
        let mut rev = Sequence::from_vec(vec!['x', 'y', 'z']).reverse();
        assert_eq!(rev.to_entries().ok(), Some(vec![(2, 'z'), (1, 'y'), (0, 'x')]));
    }

    #[test]
    fn randomize_is_a_permutation() {
        let mut shuffled = Sequence::from_vec((0..20).collect::<Vec<i32>>()).randomize(42);
        let mut values = shuffled.to_vec().unwrap_or_default();
        values.sort_unstable();
        assert_eq!(values, (0..20).collect::<Vec<i32>>());
    }
}
