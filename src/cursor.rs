//! Forward cursors over `(key, item)` entries.
//!
//! A [`Cursor`] is the minimal pull contract every sequence is built on: hand
//! out the next entry, and optionally rewind. Concrete sources are provided
//! here:
//!
//! - [`ArrayCursor`] - a shared, array-backed buffer; resettable and forkable.
//! - [`IterCursor`] - wraps a one-shot iterator; single-pass, `reset` fails.
//! - [`GenerateCursor`] - re-runs an iterator factory; resettable.
//! - [`EmptyCursor`] - yields nothing.
//!
//! [`Position`] layers the classic `current` / `current_key` / `advance` /
//! `has_more` view on top of any boxed cursor. It pulls lazily, so building a
//! pipeline never runs an upstream callback until someone asks for an element.

use crate::error::{Result, SeqError};
use crate::Elem;
use std::marker::PhantomData;
use std::rc::Rc;

/// A forward-only source of `(key, item)` entries.
///
/// Once `pull` returns `Ok(None)` the cursor is exhausted; callers never pull
/// again without a successful [`reset`](Cursor::reset).
pub trait Cursor {
    type Key: 'static;
    type Item: 'static;

    /// Hand out the next entry, or `None` at the end.
    ///
    /// # Errors
    /// Propagates failures from upstream callbacks.
    fn pull(&mut self) -> Result<Option<(Self::Key, Self::Item)>>;

    /// Rewind to the first entry.
    ///
    /// # Errors
    /// Returns [`SeqError::Unsupported`] for single-pass cursors.
    fn reset(&mut self) -> Result<()> {
        Err(SeqError::unsupported("reset"))
    }

    /// Whether [`reset`](Cursor::reset) is expected to succeed.
    fn can_reset(&self) -> bool {
        false
    }

    /// An independent cursor at the same position, if the source allows it.
    fn fork(&self) -> Option<BoxCursor<Self::Key, Self::Item>> {
        None
    }
}

/// A type-erased cursor, owned by exactly one [`Position`].
pub type BoxCursor<K, T> = Box<dyn Cursor<Key = K, Item = T>>;

/// Capability of sources that can always be rewound.
///
/// Implementors answer `can_reset() == true` and route
/// [`Cursor::reset`] through the infallible [`rewind`](ResettableCursor::rewind).
/// Single-pass sources implement only [`Cursor`].
pub trait ResettableCursor: Cursor {
    fn rewind(&mut self);
}

/* ===================== ArrayCursor ===================== */

/// Cursor over a shared, immutable buffer of entries.
pub struct ArrayCursor<K, T> {
    entries: Rc<[(K, T)]>,
    next: usize,
}

impl<K, T> ArrayCursor<K, T> {
    /// Cursor over explicit `(key, item)` entries.
    pub fn keyed(entries: impl Into<Rc<[(K, T)]>>) -> Self {
        Self {
            entries: entries.into(),
            next: 0,
        }
    }

    pub(crate) fn at(entries: Rc<[(K, T)]>, next: usize) -> Self {
        Self { entries, next }
    }

    /// Number of entries not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entries.len().saturating_sub(self.next)
    }
}

impl<T> ArrayCursor<usize, T> {
    /// Cursor over `items`, keyed by position.
    #[must_use]
    pub fn positional(items: Vec<T>) -> Self {
        let entries: Vec<(usize, T)> = items.into_iter().enumerate().collect();
        Self::keyed(entries)
    }
}

impl<K: Elem, T: Elem> Cursor for ArrayCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        let entry = self.entries.get(self.next).cloned();
        if entry.is_some() {
            self.next += 1;
        }
        Ok(entry)
    }

    fn reset(&mut self) -> Result<()> {
        self.rewind();
        Ok(())
    }

    fn can_reset(&self) -> bool {
        true
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        Some(Box::new(Self::at(Rc::clone(&self.entries), self.next)))
    }
}

impl<K: Elem, T: Elem> ResettableCursor for ArrayCursor<K, T> {
    fn rewind(&mut self) {
        self.next = 0;
    }
}

/* ===================== IterCursor ===================== */

/// Single-pass cursor over a one-shot iterator, keyed by position.
pub struct IterCursor<I> {
    iter: I,
    index: usize,
    done: bool,
}

impl<I> IterCursor<I> {
    pub const fn new(iter: I) -> Self {
        Self {
            iter,
            index: 0,
            done: false,
        }
    }
}

impl<I> Cursor for IterCursor<I>
where
    I: Iterator + 'static,
    I::Item: 'static,
{
    type Key = usize;
    type Item = I::Item;

    fn pull(&mut self) -> Result<Option<(usize, I::Item)>> {
        if self.done {
            return Ok(None);
        }
        match self.iter.next() {
            Some(item) => {
                let key = self.index;
                self.index += 1;
                Ok(Some((key, item)))
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/* ===================== GenerateCursor ===================== */

type Factory<T> = Rc<dyn Fn() -> Box<dyn Iterator<Item = T>>>;

/// Restartable generator: every reset asks the factory for a fresh iterator.
pub struct GenerateCursor<T> {
    factory: Factory<T>,
    iter: Option<Box<dyn Iterator<Item = T>>>,
    index: usize,
}

impl<T: 'static> GenerateCursor<T> {
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = T> + 'static,
    {
        let factory: Factory<T> = Rc::new(move || Box::new(factory()));
        Self {
            factory,
            iter: None,
            index: 0,
        }
    }
}

impl<T: 'static> Cursor for GenerateCursor<T> {
    type Key = usize;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(usize, T)>> {
        let factory = &self.factory;
        let iter = self.iter.get_or_insert_with(|| factory());
        Ok(iter.next().map(|item| {
            let key = self.index;
            self.index += 1;
            (key, item)
        }))
    }

    fn reset(&mut self) -> Result<()> {
        self.rewind();
        Ok(())
    }

    fn can_reset(&self) -> bool {
        true
    }

    fn fork(&self) -> Option<BoxCursor<usize, T>> {
        let mut iter = (self.factory)();
        if self.index > 0 {
            iter.nth(self.index - 1);
        }
        Some(Box::new(Self {
            factory: Rc::clone(&self.factory),
            iter: Some(iter),
            index: self.index,
        }))
    }
}

impl<T: 'static> ResettableCursor for GenerateCursor<T> {
    fn rewind(&mut self) {
        self.iter = None;
        self.index = 0;
    }
}

/* ===================== EmptyCursor ===================== */

pub struct EmptyCursor<K, T>(PhantomData<(K, T)>);

impl<K, T> EmptyCursor<K, T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K, T> Default for EmptyCursor<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: 'static, T: 'static> Cursor for EmptyCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        Ok(None)
    }

    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    fn can_reset(&self) -> bool {
        true
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        Some(Box::new(Self::new()))
    }
}

impl<K: 'static, T: 'static> ResettableCursor for EmptyCursor<K, T> {
    fn rewind(&mut self) {}
}

/// Stands in for a single-pass source that was already driven to the end.
pub(crate) struct SpentCursor<K, T>(PhantomData<(K, T)>);

impl<K, T> SpentCursor<K, T> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K: 'static, T: 'static> Cursor for SpentCursor<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        Err(SeqError::invalid(
            "single-pass sequence was already iterated; snapshot it with as_resettable() first",
        ))
    }
}

/* ===================== Position ===================== */

#[derive(Clone)]
enum Head<K, T> {
    Unprimed,
    At(K, T),
    End,
}

/// The `current` / `advance` view over a boxed cursor.
///
/// A position that has never been advanced points at the first entry (if
/// any). Reaching the end is permanent until [`reset`](Position::reset).
pub struct Position<K, T> {
    cursor: BoxCursor<K, T>,
    head: Head<K, T>,
}

impl<K: 'static, T: 'static> Position<K, T> {
    #[must_use]
    pub fn new(cursor: BoxCursor<K, T>) -> Self {
        Self {
            cursor,
            head: Head::Unprimed,
        }
    }

    fn prime(&mut self) -> Result<()> {
        if matches!(self.head, Head::Unprimed) {
            self.head = match self.cursor.pull()? {
                Some((key, item)) => Head::At(key, item),
                None => Head::End,
            };
        }
        Ok(())
    }

    /// Whether a current entry exists.
    ///
    /// # Errors
    /// Propagates failures raised while pulling the entry.
    pub fn has_more(&mut self) -> Result<bool> {
        self.prime()?;
        Ok(matches!(self.head, Head::At(..)))
    }

    /// Borrow the current entry without moving past it.
    ///
    /// # Errors
    /// Propagates failures raised while pulling the entry.
    pub fn peek(&mut self) -> Result<Option<(&K, &T)>> {
        self.prime()?;
        Ok(match &self.head {
            Head::At(key, item) => Some((key, item)),
            _ => None,
        })
    }

    /// The current item.
    ///
    /// # Errors
    /// Propagates failures raised while pulling the entry.
    pub fn current(&mut self) -> Result<Option<&T>> {
        Ok(self.peek()?.map(|(_, item)| item))
    }

    /// The current key.
    ///
    /// # Errors
    /// Propagates failures raised while pulling the entry.
    pub fn current_key(&mut self) -> Result<Option<&K>> {
        Ok(self.peek()?.map(|(key, _)| key))
    }

    /// Move forward exactly one entry.
    ///
    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] when there is no current entry.
    pub fn advance(&mut self) -> Result<()> {
        self.prime()?;
        if matches!(self.head, Head::End) {
            return Err(SeqError::invalid("cannot advance past the end of a sequence"));
        }
        self.head = Head::Unprimed;
        Ok(())
    }

    /// Move the current entry out and step past it.
    ///
    /// The following entry is not pulled until it is asked for.
    ///
    /// # Errors
    /// Propagates failures raised while pulling the entry.
    pub fn take(&mut self) -> Result<Option<(K, T)>> {
        self.prime()?;
        match std::mem::replace(&mut self.head, Head::Unprimed) {
            Head::At(key, item) => Ok(Some((key, item))),
            other => {
                self.head = other;
                Ok(None)
            }
        }
    }

    /// Rewind the underlying cursor.
    ///
    /// # Errors
    /// Returns [`SeqError::Unsupported`] for single-pass sources.
    pub fn reset(&mut self) -> Result<()> {
        self.cursor.reset()?;
        self.head = Head::Unprimed;
        Ok(())
    }

    #[must_use]
    pub fn can_reset(&self) -> bool {
        self.cursor.can_reset()
    }
}

impl<K: Elem, T: Elem> Position<K, T> {
    /// An independent position over the same entries, at the same place.
    #[must_use]
    pub fn fork(&self) -> Option<Self> {
        self.cursor.fork().map(|cursor| Self {
            cursor,
            head: self.head.clone(),
        })
    }
}

impl<K: Elem, T: Elem> Cursor for Position<K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        self.take()
    }

    fn reset(&mut self) -> Result<()> {
        Self::reset(self)
    }

    fn can_reset(&self) -> bool {
        Self::can_reset(self)
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        Self::fork(self).map(|pos| Box::new(pos) as BoxCursor<K, T>)
    }
}
