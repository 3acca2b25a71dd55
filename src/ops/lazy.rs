//! Lazy element-wise operators.
//!
//! Each operator wraps the receiver's position in a cursor that pulls one
//! upstream element per request and runs the user callback with a fresh
//! [`ItemContext`]. Callbacks run exactly once per pulled element, in order.
//! A callback that calls [`cancel`](ItemContext::cancel) ends the operator's
//! output after the current element.
//!
//! `skip` and `skip_while` are the exception: they move the receiver's own
//! position forward immediately and hand the same sequence back.

use crate::context::{ItemContext, Stepper};
use crate::cursor::{BoxCursor, Cursor, Position};
use crate::error::Result;
use crate::sequence::{IntoSequence, Sequence};
use crate::utils::count_arg;
use crate::Elem;
use std::fmt;
use std::rc::Rc;

type MapFn<K, T, K2, O> = Rc<dyn Fn(&T, &mut ItemContext<'_, K, T>) -> Result<(K2, O)>>;
type PredFn<K, T> = Rc<dyn Fn(&T, &mut ItemContext<'_, K, T>) -> Result<bool>>;
type FlatFn<K, T, KU, U> = Rc<dyn Fn(&T, &mut ItemContext<'_, K, T>) -> Result<Sequence<U, KU>>>;
type ZipFn<K, T, KU, U, O> =
    Rc<dyn Fn(&T, &U, &mut ItemContext<'_, K, T>, &mut ItemContext<'_, KU, U>) -> O>;

/* ===================== map ===================== */

pub(crate) struct MapCursor<K, T, K2, O> {
    inner: Position<K, T>,
    f: MapFn<K, T, K2, O>,
    stepper: Stepper,
}

impl<K: Elem, T: Elem, K2: Elem, O: Elem> Cursor for MapCursor<K, T, K2, O> {
    type Key = K2;
    type Item = O;

    fn pull(&mut self) -> Result<Option<(K2, O)>> {
        let f = &self.f;
        let step = self.stepper.step(&mut self.inner, |item, ctx| f(item, ctx))?;
        Ok(step.map(|(_, _, out)| out))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.stepper.restart();
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K2, O>> {
        Some(Box::new(Self {
            inner: self.inner.fork()?,
            f: Rc::clone(&self.f),
            stepper: self.stepper,
        }))
    }
}

/* ===================== filter / take_while ===================== */

#[derive(Clone, Copy)]
enum Gate {
    Filter,
    TakeWhile,
}

pub(crate) struct GateCursor<K, T> {
    inner: Position<K, T>,
    pred: PredFn<K, T>,
    stepper: Stepper,
    gate: Gate,
}

impl<K: Elem, T: Elem> Cursor for GateCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        loop {
            let pred = &self.pred;
            match self.stepper.step(&mut self.inner, |item, ctx| pred(item, ctx))? {
                None => return Ok(None),
                Some((key, item, true)) => return Ok(Some((key, item))),
                Some(_) => {
                    if matches!(self.gate, Gate::TakeWhile) {
                        self.stepper.stop();
                        return Ok(None);
                    }
                }
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.stepper.restart();
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        Some(Box::new(Self {
            inner: self.inner.fork()?,
            pred: Rc::clone(&self.pred),
            stepper: self.stepper,
            gate: self.gate,
        }))
    }
}

/* ===================== take ===================== */

/// Hands out at most `count` entries and never touches upstream after that.
pub(crate) struct TakeCursor<K, T> {
    inner: Position<K, T>,
    count: usize,
    taken: usize,
}

impl<K: Elem, T: Elem> Cursor for TakeCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        if self.taken >= self.count {
            return Ok(None);
        }
        let entry = self.inner.take()?;
        self.taken = if entry.is_some() { self.taken + 1 } else { self.count };
        Ok(entry)
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.taken = 0;
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        Some(Box::new(Self {
            inner: self.inner.fork()?,
            count: self.count,
            taken: self.taken,
        }))
    }
}

/* ===================== flat_map ===================== */

pub(crate) struct FlatMapCursor<K, T, KU, U> {
    inner: Position<K, T>,
    f: FlatFn<K, T, KU, U>,
    current: Option<Position<KU, U>>,
    stepper: Stepper,
    emitted: usize,
}

impl<K: Elem, T: Elem, KU: Elem, U: Elem> Cursor for FlatMapCursor<K, T, KU, U> {
    type Key = usize;
    type Item = U;

    fn pull(&mut self) -> Result<Option<(usize, U)>> {
        loop {
            if let Some(current) = self.current.as_mut()
                && let Some((_, item)) = current.take()?
            {
                let key = self.emitted;
                self.emitted += 1;
                return Ok(Some((key, item)));
            }
            self.current = None;

            let f = &self.f;
            match self.stepper.step(&mut self.inner, |item, ctx| f(item, ctx))? {
                None => return Ok(None),
                Some((_, _, inner)) => self.current = Some(inner.into_position()),
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.current = None;
        self.stepper.restart();
        self.emitted = 0;
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<usize, U>> {
        let current = match &self.current {
            Some(current) => Some(current.fork()?),
            None => None,
        };
        Some(Box::new(Self {
            inner: self.inner.fork()?,
            f: Rc::clone(&self.f),
            current,
            stepper: self.stepper,
            emitted: self.emitted,
        }))
    }
}

/* ===================== concat ===================== */

pub(crate) struct ConcatCursor<K, T> {
    parts: Vec<Position<K, T>>,
    active: usize,
}

impl<K: Elem, T: Elem> Cursor for ConcatCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        while let Some(part) = self.parts.get_mut(self.active) {
            if let Some(entry) = part.take()? {
                return Ok(Some(entry));
            }
            self.active += 1;
        }
        Ok(None)
    }

    fn reset(&mut self) -> Result<()> {
        for part in &mut self.parts {
            part.reset()?;
        }
        self.active = 0;
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.parts.iter().all(Position::can_reset)
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        let parts = self.parts.iter().map(Position::fork).collect::<Option<Vec<_>>>()?;
        Some(Box::new(Self {
            parts,
            active: self.active,
        }))
    }
}

/* ===================== zip ===================== */

pub(crate) struct ZipCursor<K, T, KU, U, O> {
    first: Position<K, T>,
    second: Position<KU, U>,
    f: ZipFn<K, T, KU, U, O>,
    index: usize,
    stopped: bool,
}

impl<K: Elem, T: Elem, KU: Elem, U: Elem, O: Elem> Cursor for ZipCursor<K, T, KU, U, O> {
    type Key = K;
    type Item = O;

    fn pull(&mut self) -> Result<Option<(K, O)>> {
        if self.stopped {
            return Ok(None);
        }
        let Some((key_a, a)) = self.first.take()? else {
            self.stopped = true;
            return Ok(None);
        };
        let Some((key_b, b)) = self.second.take()? else {
            self.stopped = true;
            return Ok(None);
        };
        let last_a = !self.first.has_more()?;
        let last_b = !self.second.has_more()?;
        let mut ctx_a = ItemContext::new(&key_a, &a, self.index, last_a, None, (), ());
        let mut ctx_b = ItemContext::new(&key_b, &b, self.index, last_b, None, (), ());
        let out = (self.f)(&a, &b, &mut ctx_a, &mut ctx_b);
        if ctx_a.is_cancelled() || ctx_b.is_cancelled() {
            self.stopped = true;
        }
        self.index += 1;
        Ok(Some((key_a, out)))
    }

    fn reset(&mut self) -> Result<()> {
        self.first.reset()?;
        self.second.reset()?;
        self.index = 0;
        self.stopped = false;
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.first.can_reset() && self.second.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K, O>> {
        Some(Box::new(Self {
            first: self.first.fork()?,
            second: self.second.fork()?,
            f: Rc::clone(&self.f),
            index: self.index,
            stopped: self.stopped,
        }))
    }
}

/* ===================== default_if_empty ===================== */

pub(crate) struct DefaultIfEmptyCursor<K, T> {
    inner: Position<K, T>,
    fallback: (K, T),
    seen: bool,
    done: bool,
}

impl<K: Elem, T: Elem> Cursor for DefaultIfEmptyCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        if self.done {
            return Ok(None);
        }
        if let Some(entry) = self.inner.take()? {
            self.seen = true;
            return Ok(Some(entry));
        }
        self.done = true;
        Ok((!self.seen).then(|| self.fallback.clone()))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.seen = false;
        self.done = false;
        Ok(())
    }

    fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        Some(Box::new(Self {
            inner: self.inner.fork()?,
            fallback: self.fallback.clone(),
            seen: self.seen,
            done: self.done,
        }))
    }
}

/* ===================== operators ===================== */

impl<T: Elem, K: Elem> Sequence<T, K> {
    /// Re-key and transform every entry with a fallible callback.
    pub(crate) fn map_entries<K2, O, F>(self, f: F) -> Sequence<O, K2>
    where
        K2: Elem,
        O: Elem,
        F: Fn(&T, &mut ItemContext<'_, K, T>) -> Result<(K2, O)> + 'static,
    {
        let f: MapFn<K, T, K2, O> = Rc::new(f);
        Sequence::from_cursor(MapCursor {
            inner: self.into_position(),
            f,
            stepper: Stepper::default(),
        })
    }

    fn gate<P>(self, gate: Gate, pred: P) -> Self
    where
        P: Fn(&T, &mut ItemContext<'_, K, T>) -> Result<bool> + 'static,
    {
        let pred: PredFn<K, T> = Rc::new(pred);
        Self::from_cursor(GateCursor {
            inner: self.into_position(),
            pred,
            stepper: Stepper::default(),
            gate,
        })
    }

    /// Transform every element; keys are kept.
    pub fn map<O, F>(self, f: F) -> Sequence<O, K>
    where
        O: Elem,
        F: Fn(&T, &mut ItemContext<'_, K, T>) -> O + 'static,
    {
        self.map_entries(move |item, ctx| Ok((ctx.key().clone(), f(item, ctx))))
    }

    /// Like [`map`](Self::map), for callbacks that can fail.
    pub fn try_map<O, F>(self, f: F) -> Sequence<O, K>
    where
        O: Elem,
        F: Fn(&T, &mut ItemContext<'_, K, T>) -> Result<O> + 'static,
    {
        self.map_entries(move |item, ctx| {
            let key = ctx.key().clone();
            Ok((key, f(item, ctx)?))
        })
    }

    /// Replace every key with `f(item, key)`; items are kept.
    pub fn map_keys<K2, F>(self, f: F) -> Sequence<T, K2>
    where
        K2: Elem,
        F: Fn(&T, &K) -> K2 + 'static,
    {
        self.map_entries(move |item, ctx| Ok((f(item, ctx.key()), item.clone())))
    }

    /// Key every item by `f(item)`.
    pub fn with_keys<K2, F>(self, f: F) -> Sequence<T, K2>
    where
        K2: Elem,
        F: Fn(&T) -> K2 + 'static,
    {
        self.map_keys(move |item, _| f(item))
    }

    /// Drop the keys and renumber from zero.
    #[must_use]
    pub fn values(self) -> Sequence<T> {
        self.map_entries(|item, ctx| Ok((ctx.index(), item.clone())))
    }

    /// The keys, as a positional sequence.
    #[must_use]
    pub fn keys(self) -> Sequence<K> {
        self.map_entries(|_, ctx| Ok((ctx.index(), ctx.key().clone())))
    }

    /// Keep the elements for which `pred` holds; keys are kept.
    pub fn filter<P>(self, pred: P) -> Self
    where
        P: Fn(&T, &mut ItemContext<'_, K, T>) -> bool + 'static,
    {
        self.gate(Gate::Filter, move |item, ctx| Ok(pred(item, ctx)))
    }

    pub fn try_filter<P>(self, pred: P) -> Self
    where
        P: Fn(&T, &mut ItemContext<'_, K, T>) -> Result<bool> + 'static,
    {
        self.gate(Gate::Filter, pred)
    }

    /// Yield elements while `pred` holds; the first failing element ends the sequence.
    pub fn take_while<P>(self, pred: P) -> Self
    where
        P: Fn(&T, &mut ItemContext<'_, K, T>) -> bool + 'static,
    {
        self.gate(Gate::TakeWhile, move |item, ctx| Ok(pred(item, ctx)))
    }

    /// The first `count` elements.
    ///
    /// The `count`-th element is the last one pulled from upstream; `take(0)`
    /// pulls nothing.
    ///
    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`](crate::SeqError::ArgumentOutOfRange) for a negative count.
    pub fn take<N>(self, count: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let count = count_arg("count", count)?;
        Ok(Self::from_cursor(TakeCursor {
            inner: self.into_position(),
            count,
            taken: 0,
        }))
    }

    /// Skip leading elements while `pred` holds.
    ///
    /// Runs immediately: the receiver's own position is moved forward and the
    /// same sequence is returned. The element that fails `pred` stays current.
    /// Contexts seen by `pred` report `is_last() == false`.
    ///
    /// # Errors
    /// Propagates failures raised while pulling upstream elements.
    pub fn skip_while<P>(mut self, mut pred: P) -> Result<Self>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.rewind_if_driven()?;
        let pos = self.position();
        let mut index = 0;
        loop {
            let Some((key, item)) = pos.peek()? else { break };
            let mut ctx = ItemContext::new(key, item, index, false, None, (), ());
            let skip = pred(item, &mut ctx);
            if !skip || ctx.is_cancelled() {
                if skip {
                    pos.advance()?;
                }
                break;
            }
            pos.advance()?;
            index += 1;
        }
        Ok(self)
    }

    /// Skip the first `count` elements, immediately.
    ///
    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`](crate::SeqError::ArgumentOutOfRange) for a negative count.
    pub fn skip<N>(self, count: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let count = count_arg("count", count)?;
        self.skip_while(|_, ctx| ctx.index() < count)
    }

    /// Replace every element with the elements of `f(element)`, renumbered.
    ///
    /// Return `None` (or any empty input) to drop an element.
    pub fn flat_map<I, F>(self, f: F) -> Sequence<I::Item>
    where
        I: IntoSequence,
        F: Fn(&T, &mut ItemContext<'_, K, T>) -> I + 'static,
    {
        let f: FlatFn<K, T, I::Key, I::Item> =
            Rc::new(move |item: &T, ctx: &mut ItemContext<'_, K, T>| Ok(f(item, ctx).into_sequence()));
        Sequence::from_cursor(FlatMapCursor {
            inner: self.into_position(),
            f,
            current: None,
            stepper: Stepper::default(),
            emitted: 0,
        })
    }

    /// This sequence followed by `other`. Keys are kept as they are.
    pub fn concat<S>(self, other: S) -> Self
    where
        S: IntoSequence<Item = T, Key = K>,
    {
        Self::from_cursor(ConcatCursor {
            parts: vec![self.into_position(), other.into_sequence().into_position()],
            active: 0,
        })
    }

    /// Pair elements of both sequences by position; the shorter one wins.
    ///
    /// `f` sees one context per side. Output keys come from this sequence.
    pub fn zip<S, O, F>(self, second: S, f: F) -> Sequence<O, K>
    where
        S: IntoSequence,
        O: Elem,
        F: Fn(&T, &S::Item, &mut ItemContext<'_, K, T>, &mut ItemContext<'_, S::Key, S::Item>) -> O + 'static,
    {
        let f: ZipFn<K, T, S::Key, S::Item, O> = Rc::new(f);
        Sequence::from_cursor(ZipCursor {
            first: self.into_position(),
            second: second.into_sequence().into_position(),
            f,
            index: 0,
            stopped: false,
        })
    }

    /// [`zip`](Self::zip) into tuples.
    pub fn zip_pairs<S>(self, second: S) -> Sequence<(T, S::Item), K>
    where
        S: IntoSequence,
    {
        self.zip(second, |a, b, _, _| (a.clone(), b.clone()))
    }

    /// A single `value` (keyed by `K::default()`) when this sequence is empty.
    pub fn default_if_empty(self, value: T) -> Self
    where
        K: Default,
    {
        Self::from_cursor(DefaultIfEmptyCursor {
            inner: self.into_position(),
            fallback: (K::default(), value),
            seen: false,
            done: false,
        })
    }
}

impl<T: Elem> Sequence<T> {
    /// This sequence followed by `item`.
    #[must_use]
    pub fn append(self, item: T) -> Self {
        self.concat(Self::once(item))
    }

    /// `item` followed by this sequence.
    #[must_use]
    pub fn prepend(self, item: T) -> Self {
        Self::once(item).concat(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CallCounter;

    #[test]
    fn map_is_lazy_until_pulled() {
        let counter = CallCounter::new();
        let c = counter.clone();
        let mut seq = Sequence::from_vec(vec![1, 2, 3]).map(move |n: &i32, _| {
            c.hit();
            n + 1
        });
        assert_eq!(counter.count(), 0);
        assert_eq!(seq.first().ok(), Some(2));
        // the driving loop looks one element ahead for `is_last`
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn take_stops_pulling_after_count() {
        let counter = CallCounter::new();
        let c = counter.clone();
        let mut seq = Sequence::generate(|| 0..)
            .map(move |n: &i32, _| {
                c.hit();
                *n
            })
            .take(3)
            .expect("non-negative");
        assert_eq!(seq.to_vec().ok(), Some(vec![0, 1, 2]));
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn skip_while_moves_the_receiver() {
        let mut seq = Sequence::from_vec(vec![1, 2, 5, 1])
            .skip_while(|n: &i32, _| *n < 3)
            .expect("skip");
        assert_eq!(seq.position().current().ok().flatten(), Some(&5));
        assert_eq!(seq.to_vec().ok(), Some(vec![5, 1]));
    }
}
