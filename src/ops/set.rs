//! Set operators: distinct, union, except, intersect.
//!
//! Membership is decided by an [`EqualityComparer`], so every operator is a
//! linear scan over the working set (O(n·m)). Element order always follows
//! the first sequence.

use crate::comparer::EqualityComparer;
use crate::cursor::{BoxCursor, Cursor, Position};
use crate::error::Result;
use crate::sequence::{IntoSequence, Sequence};
use crate::Elem;
use std::rc::Rc;
use tracing::trace;

/// Values of `pos`, keeping the first occurrence of each equivalence class.
pub(crate) fn distinct_values<K: 'static, T: 'static>(
    pos: &mut Position<K, T>,
    eq: &EqualityComparer<T>,
) -> Result<Vec<T>> {
    let mut uniques: Vec<T> = Vec::new();
    while let Some((_, item)) = pos.take()? {
        if !uniques.iter().any(|u| eq.equals(u, &item)) {
            uniques.push(item);
        }
    }
    Ok(uniques)
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    Except,
    Intersect,
}

enum Other<KS, T> {
    Pending(Position<KS, T>),
    Ready(Rc<[T]>),
}

/// Streams the first sequence, filtered against the distinct values of a second.
///
/// The second sequence is read in full on the first pull.
pub(crate) struct SetFilterCursor<K, T, KS> {
    first: Position<K, T>,
    other: Other<KS, T>,
    working: Vec<T>,
    eq: EqualityComparer<T>,
    mode: Mode,
}

impl<K: Elem, T: Elem, KS: Elem> SetFilterCursor<K, T, KS> {
    fn ready(&mut self) -> Result<()> {
        if let Other::Pending(pos) = &mut self.other {
            let set: Rc<[T]> = distinct_values(pos, &self.eq)?.into();
            trace!(operator = ?self.mode, entries = set.len(), "materialized");
            self.working = set.to_vec();
            self.other = Other::Ready(set);
        }
        Ok(())
    }
}

impl<K: Elem, T: Elem, KS: Elem> Cursor for SetFilterCursor<K, T, KS> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        self.ready()?;
        while let Some((key, item)) = self.first.take()? {
            let found = self.working.iter().position(|w| self.eq.equals(w, &item));
            match (self.mode, found) {
                (Mode::Except, None) => return Ok(Some((key, item))),
                (Mode::Intersect, Some(index)) => {
                    self.working.remove(index);
                    return Ok(Some((key, item)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn reset(&mut self) -> Result<()> {
        self.first.reset()?;
        if let Other::Ready(set) = &self.other {
            self.working = set.to_vec();
        }
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.first.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        let other = match &self.other {
            Other::Pending(pos) => Other::Pending(pos.fork()?),
            Other::Ready(set) => Other::Ready(Rc::clone(set)),
        };
        Some(Box::new(Self {
            first: self.first.fork()?,
            other,
            working: self.working.clone(),
            eq: self.eq.clone(),
            mode: self.mode,
        }))
    }
}

impl<T: Elem, K: Elem> Sequence<T, K> {
    fn set_filter<S>(self, second: S, eq: EqualityComparer<T>, mode: Mode) -> Self
    where
        S: IntoSequence<Item = T>,
    {
        Self::from_cursor(SetFilterCursor {
            first: self.into_position(),
            other: Other::Pending(second.into_sequence().into_position()),
            working: Vec::new(),
            eq,
            mode,
        })
    }

    /// Drop repeated elements; the first occurrence (and its key) wins.
    #[must_use]
    pub fn distinct(self) -> Self
    where
        T: PartialEq,
    {
        self.distinct_with(EqualityComparer::structural())
    }

    #[must_use]
    pub fn distinct_with(self, eq: EqualityComparer<T>) -> Self {
        self.deferred("distinct", move |pos| {
            let mut uniques: Vec<(K, T)> = Vec::new();
            while let Some((key, item)) = pos.take()? {
                if !uniques.iter().any(|(_, u)| eq.equals(u, &item)) {
                    uniques.push((key, item));
                }
            }
            Ok(uniques)
        })
    }

    /// Distinct elements of both sequences, this one first.
    pub fn union<S>(self, second: S) -> Self
    where
        T: PartialEq,
        S: IntoSequence<Item = T, Key = K>,
    {
        self.union_with(second, EqualityComparer::structural())
    }

    pub fn union_with<S>(self, second: S, eq: EqualityComparer<T>) -> Self
    where
        S: IntoSequence<Item = T, Key = K>,
    {
        self.concat(second).distinct_with(eq)
    }

    /// Elements of this sequence that do not occur in `second`.
    ///
    /// Duplicates within this sequence are kept.
    pub fn except<S>(self, second: S) -> Self
    where
        T: PartialEq,
        S: IntoSequence<Item = T>,
    {
        self.except_with(second, EqualityComparer::structural())
    }

    pub fn except_with<S>(self, second: S, eq: EqualityComparer<T>) -> Self
    where
        S: IntoSequence<Item = T>,
    {
        self.set_filter(second, eq, Mode::Except)
    }

    /// Elements of this sequence that also occur in `second`.
    ///
    /// Each distinct value of `second` matches at most once, so the output
    /// holds no duplicates.
    pub fn intersect<S>(self, second: S) -> Self
    where
        T: PartialEq,
        S: IntoSequence<Item = T>,
    {
        self.intersect_with(second, EqualityComparer::structural())
    }

    pub fn intersect_with<S>(self, second: S, eq: EqualityComparer<T>) -> Self
    where
        S: IntoSequence<Item = T>,
    {
        self.set_filter(second, eq, Mode::Intersect)
    }
}
