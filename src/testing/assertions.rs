//! Assertions over sequences.
//!
//! Every assertion accepts anything that converts into a sequence
//! ([`IntoSequence`]): a `Sequence` built inline, a `Vec`, a slice, a
//! [`Lookup`](crate::Lookup). The input is driven to completion first; a
//! failure while pulling panics with the error. Mismatch messages name the
//! position and the key of the offending element.

use crate::error::{ErrorKind, Result};
use crate::grouping::Grouping;
use crate::sequence::IntoSequence;
use std::fmt::Debug;

/// Drive `input` and return its entries, panicking on a pull failure.
fn drain<S: IntoSequence>(input: S) -> Vec<(S::Key, S::Item)> {
    match input.into_sequence().to_entries() {
        Ok(entries) => entries,
        Err(err) => panic!("sequence failed while being checked: {err}"),
    }
}

/// Assert that `actual` yields exactly `expected`, in order. Keys are ignored.
///
/// # Panics
///
/// Panics on a length or item mismatch, or if the sequence fails.
///
/// # Example
///
/// ```
/// use ironseq::Sequence;
/// use ironseq::testing::assert_sequence_eq;
///
/// let doubled = Sequence::from_vec(vec![1, 2, 3]).map(|x: &i32, _| x * 2);
/// assert_sequence_eq(doubled, &[2, 4, 6]);
/// ```
pub fn assert_sequence_eq<S>(actual: S, expected: &[S::Item])
where
    S: IntoSequence,
    S::Key: Debug,
    S::Item: Debug + PartialEq,
{
    let entries = drain(actual);
    for (i, (key, item)) in entries.iter().enumerate() {
        match expected.get(i) {
            Some(want) => assert_eq!(item, want, "item #{i} (key {key:?}) differs\n  entries: {entries:?}"),
            None => panic!("unexpected extra item #{i} (key {key:?}): {item:?}\n  expected: {expected:?}"),
        }
    }
    assert_eq!(
        entries.len(),
        expected.len(),
        "sequence ended early; missing {:?}",
        &expected[entries.len().min(expected.len())..]
    );
}

/// Assert that `actual` yields exactly `expected`, keys included, in order.
///
/// # Panics
///
/// Panics on the first differing entry, or if the sequence fails.
///
/// # Example
///
/// ```
/// use ironseq::Sequence;
/// use ironseq::testing::assert_entries_eq;
///
/// # fn main() -> ironseq::Result<()> {
/// let tail = Sequence::from_vec(vec!['a', 'b', 'c']).skip(1)?;
/// assert_entries_eq(tail, &[(1, 'b'), (2, 'c')]);
/// # Ok(())
/// # }
/// ```
pub fn assert_entries_eq<S>(actual: S, expected: &[(S::Key, S::Item)])
where
    S: IntoSequence,
    S::Key: Debug + PartialEq,
    S::Item: Debug + PartialEq,
{
    let entries = drain(actual);
    assert_eq!(entries.as_slice(), expected, "entries differ");
}

/// Assert that `actual` yields the items of `expected` in any order, with
/// matching multiplicities. Items only need `PartialEq`.
///
/// # Panics
///
/// Panics listing the missing and unexpected items, or if the sequence fails.
///
/// # Example
///
/// ```
/// use ironseq::Sequence;
/// use ironseq::testing::assert_sequence_unordered_eq;
///
/// let shuffled = Sequence::from_vec(vec![1, 2, 2, 3]).randomize(11);
/// assert_sequence_unordered_eq(shuffled, &[2, 3, 2, 1]);
/// ```
pub fn assert_sequence_unordered_eq<S>(actual: S, expected: &[S::Item])
where
    S: IntoSequence,
    S::Item: Debug + PartialEq,
{
    let mut unmatched: Vec<S::Item> = drain(actual).into_iter().map(|(_, item)| item).collect();
    let mut missing = Vec::new();
    for want in expected {
        match unmatched.iter().position(|item| item == want) {
            Some(i) => {
                unmatched.swap_remove(i);
            }
            None => missing.push(want),
        }
    }
    assert!(
        missing.is_empty() && unmatched.is_empty(),
        "multisets differ\n  missing: {missing:?}\n  unexpected: {unmatched:?}"
    );
}

/// Assert that groupings come out with these keys and members, both in order.
///
/// # Panics
///
/// Panics on the first group whose key or members differ.
///
/// # Example
///
/// ```
/// use ironseq::Sequence;
/// use ironseq::testing::assert_groupings_eq;
///
/// let groups = Sequence::from_vec(vec![1, 2, 3, 4]).group_by(|x: &i32| x % 2);
/// assert_groupings_eq(groups, &[(1, vec![1, 3]), (0, vec![2, 4])]);
/// ```
pub fn assert_groupings_eq<S, GK, V>(actual: S, expected: &[(GK, Vec<V>)])
where
    S: IntoSequence<Item = Grouping<GK, V>>,
    GK: Debug + PartialEq,
    V: Debug + PartialEq + Clone,
{
    let entries = drain(actual);
    let found: Vec<(&GK, Vec<V>)> = entries.iter().map(|(_, g)| (g.key(), g.to_vec())).collect();
    let wanted: Vec<(&GK, Vec<V>)> = expected.iter().map(|(k, v)| (k, v.clone())).collect();
    assert_eq!(found, wanted, "groupings differ");
}

/// Assert that every item satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first failing item and its key.
///
/// # Example
///
/// ```
/// use ironseq::testing::assert_all;
///
/// assert_all(vec![2, 4, 6, 8], |x| x % 2 == 0);
/// ```
pub fn assert_all<S>(actual: S, predicate: impl Fn(&S::Item) -> bool)
where
    S: IntoSequence,
    S::Key: Debug,
    S::Item: Debug,
{
    if let Some((key, item)) = drain(actual).iter().find(|(_, item)| !predicate(item)) {
        panic!("item at key {key:?} fails the predicate: {item:?}");
    }
}

/// Assert that at least one item satisfies `predicate`.
///
/// # Panics
///
/// Panics listing the items when none match.
pub fn assert_any<S>(actual: S, predicate: impl Fn(&S::Item) -> bool)
where
    S: IntoSequence,
    S::Item: Debug,
{
    let items: Vec<S::Item> = drain(actual).into_iter().map(|(_, item)| item).collect();
    assert!(items.iter().any(&predicate), "no item satisfies the predicate: {items:?}");
}

/// Assert that no item satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first matching item and its key.
pub fn assert_none<S>(actual: S, predicate: impl Fn(&S::Item) -> bool)
where
    S: IntoSequence,
    S::Key: Debug,
    S::Item: Debug,
{
    if let Some((key, item)) = drain(actual).iter().find(|(_, item)| predicate(item)) {
        panic!("item at key {key:?} unexpectedly satisfies the predicate: {item:?}");
    }
}

/// Assert that `result` failed with an error of kind `expected`.
///
/// # Panics
///
/// Panics if `result` is `Ok` or fails with a different kind.
///
/// # Example
///
/// ```
/// use ironseq::{ErrorKind, Sequence};
/// use ironseq::testing::assert_error_kind;
///
/// assert_error_kind(&Sequence::<i32>::empty().first(), ErrorKind::InvalidOperation);
/// ```
pub fn assert_error_kind<T: Debug>(result: &Result<T>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("expected a {expected} error, got Ok({value:?})"),
        Err(err) => assert_eq!(err.kind(), expected, "unexpected error: {err}"),
    }
}
