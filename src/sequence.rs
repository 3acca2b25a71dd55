//! The [`Sequence`] type, its constructors, and input normalization.
//!
//! A `Sequence<T, K>` owns a single [`Position`] over some cursor. Lazy
//! operators consume the sequence and wrap its position in a new cursor;
//! terminal operators drive it. Nothing upstream runs until a terminal
//! operator (or an explicit [`Position`] call) asks for an element.

use crate::context::{drive, ItemContext};
use crate::cursor::{ArrayCursor, BoxCursor, Cursor, EmptyCursor, GenerateCursor, IterCursor, Position, SpentCursor};
use crate::error::{Result, SeqError};
use crate::Elem;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// A lazy, ordered sequence of `(key, item)` entries.
///
/// `K` defaults to `usize` for positional sequences.
///
/// ```
/// use ironseq::Sequence;
///
/// # fn main() -> ironseq::Result<()> {
/// let mut evens = Sequence::from_vec(vec![1, 2, 3, 4, 5, 6])
///     .filter(|n: &i32, _| n % 2 == 0)
///     .map(|n: &i32, _| n * 10);
/// assert_eq!(evens.to_vec()?, vec![20, 40, 60]);
/// # Ok(())
/// # }
/// ```
pub struct Sequence<T, K = usize> {
    pos: Position<K, T>,
    driven: bool,
}

impl<T: 'static, K: 'static> fmt::Debug for Sequence<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("resettable", &self.pos.can_reset())
            .field("driven", &self.driven)
            .finish()
    }
}

impl<T: Elem, K: Elem> Sequence<T, K> {
    /// Wrap any cursor.
    pub fn from_cursor<C>(cursor: C) -> Self
    where
        C: Cursor<Key = K, Item = T> + 'static,
    {
        Self::from_boxed(Box::new(cursor))
    }

    #[must_use]
    pub fn from_boxed(cursor: BoxCursor<K, T>) -> Self {
        Self {
            pos: Position::new(cursor),
            driven: false,
        }
    }

    /// A resettable sequence over explicit `(key, item)` entries.
    #[must_use]
    pub fn from_keyed(entries: Vec<(K, T)>) -> Self {
        Self::from_cursor(ArrayCursor::keyed(entries))
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_cursor(EmptyCursor::new())
    }

    /// Direct access to the underlying position.
    pub fn position(&mut self) -> &mut Position<K, T> {
        &mut self.pos
    }

    /// Whether the underlying cursor can be rewound.
    #[must_use]
    pub fn is_resettable(&self) -> bool {
        self.pos.can_reset()
    }

    /// Rewind to the first element.
    ///
    /// # Errors
    /// Returns [`SeqError::Unsupported`] for single-pass sources.
    pub fn reset(&mut self) -> Result<()> {
        self.pos.reset()?;
        self.driven = false;
        Ok(())
    }

    /// Rewind a sequence that a previous terminal operation drove.
    pub(crate) fn rewind_if_driven(&mut self) -> Result<()> {
        if self.driven {
            if !self.pos.can_reset() {
                return Err(SeqError::invalid(
                    "single-pass sequence was already iterated; snapshot it with as_resettable() first",
                ));
            }
            self.pos.reset()?;
            self.driven = false;
        }
        Ok(())
    }

    /// Prepare for a terminal operation and hand out the position to drive.
    pub(crate) fn begin(&mut self) -> Result<&mut Position<K, T>> {
        self.rewind_if_driven()?;
        self.driven = true;
        Ok(&mut self.pos)
    }

    /// Give up the position to a wrapping operator.
    pub(crate) fn into_position(mut self) -> Position<K, T> {
        if self.driven && self.rewind_if_driven().is_err() {
            return Position::new(Box::new(SpentCursor::new()));
        }
        self.pos
    }

    /// Box the position up as a plain cursor.
    #[must_use]
    pub fn into_cursor(self) -> BoxCursor<K, T> {
        Box::new(self.into_position())
    }

    /// The generic driving loop every terminal operation is built on.
    ///
    /// `action` runs once per element with a context carrying `init_result`
    /// as its accumulator and `init_value` as its carried state. The final
    /// accumulator is returned, also after a cancel.
    ///
    /// # Errors
    /// Propagates any error raised by `action` or by an upstream operator.
    pub fn iterate<R, S, F>(&mut self, init_result: R, init_value: S, action: F) -> Result<R>
    where
        F: FnMut(&T, &mut ItemContext<'_, K, T, R, S>) -> Result<()>,
    {
        drive(self.begin()?, init_result, init_value, action)
    }

    /// An independent sequence at the same position.
    ///
    /// # Errors
    /// Returns [`SeqError::Unsupported`] when the cursor cannot be forked.
    pub fn try_clone(&self) -> Result<Self> {
        let pos = self.pos.fork().ok_or(SeqError::unsupported("fork"))?;
        Ok(Self {
            pos,
            driven: self.driven,
        })
    }

    /// Snapshot the remaining entries into a resettable buffer.
    ///
    /// Already-resettable sequences are returned unchanged.
    ///
    /// # Errors
    /// Propagates errors raised while draining the source.
    pub fn as_resettable(mut self) -> Result<Self> {
        if self.pos.can_reset() {
            return Ok(self);
        }
        let pos = self.begin()?;
        let mut entries = Vec::new();
        while let Some(entry) = pos.take()? {
            entries.push(entry);
        }
        trace!(entries = entries.len(), "snapshot single-pass sequence");
        Ok(Self::from_keyed(entries))
    }

    /// Iterate `(key, item)` entries instead of bare items.
    pub fn entries(self) -> Entries<K, T> {
        Entries {
            pos: self.into_position(),
            failed: false,
        }
    }
}

impl<T: Elem> Sequence<T> {
    /// A resettable sequence over `items`, keyed by position.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_cursor(ArrayCursor::positional(items))
    }

    /// A single-pass sequence over any iterator.
    ///
    /// A second terminal operation fails unless the sequence is first
    /// snapshotted with [`as_resettable`](Self::as_resettable).
    pub fn from_iter_once<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_cursor(IterCursor::new(iter.into_iter()))
    }

    /// A resettable sequence that asks `factory` for a fresh iterator on every pass.
    pub fn generate<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = T> + 'static,
    {
        Self::from_cursor(GenerateCursor::new(factory))
    }

    #[must_use]
    pub fn once(item: T) -> Self {
        Self::from_vec(vec![item])
    }

    /// `item`, `count` times.
    ///
    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`] for a negative count.
    pub fn repeat<N>(item: T, count: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let count = crate::utils::count_arg("count", count)?;
        let item = Rc::new(item);
        Ok(Self::generate(move || {
            let item = Rc::clone(&item);
            (0..count).map(move |_| T::clone(&item))
        }))
    }
}

impl Sequence<i64> {
    /// `count` consecutive integers starting at `start`.
    ///
    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`] for a negative count.
    pub fn range<N>(start: i64, count: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let count = crate::utils::count_arg("count", count)?;
        Ok(Self::generate(move || (start..).take(count)))
    }
}

impl Sequence<char> {
    /// The characters of `text`, keyed by position.
    #[must_use]
    pub fn chars(text: &str) -> Self {
        Self::from_vec(text.chars().collect())
    }
}

impl<T: Elem> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: Elem> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/* ===================== iteration ===================== */

/// Item-wise iterator returned by `Sequence::into_iter`.
///
/// Yields `Err` at most once; iteration stops after the first error.
pub struct IntoIter<K, T> {
    entries: Entries<K, T>,
}

impl<K: Elem, T: Elem> Iterator for IntoIter<K, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| entry.map(|(_, item)| item))
    }
}

impl<T: Elem, K: Elem> IntoIterator for Sequence<T, K> {
    type Item = Result<T>;
    type IntoIter = IntoIter<K, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            entries: self.entries(),
        }
    }
}

/// Entry-wise iterator returned by [`Sequence::entries`].
pub struct Entries<K, T> {
    pos: Position<K, T>,
    failed: bool,
}

impl<K: Elem, T: Elem> Iterator for Entries<K, T> {
    type Item = Result<(K, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.pos.take() {
            Ok(entry) => entry.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/* ===================== normalization ===================== */

/// Conversion of heterogeneous inputs into a [`Sequence`].
///
/// Operators that take a second sequence (`concat`, `zip`, `except`, joins,
/// ...) accept anything implementing this trait.
pub trait IntoSequence {
    type Item: Elem;
    type Key: Elem;

    fn into_sequence(self) -> Sequence<Self::Item, Self::Key>;
}

impl<T: Elem, K: Elem> IntoSequence for Sequence<T, K> {
    type Item = T;
    type Key = K;

    fn into_sequence(self) -> Self {
        self
    }
}

impl<T: Elem> IntoSequence for Vec<T> {
    type Item = T;
    type Key = usize;

    fn into_sequence(self) -> Sequence<T> {
        Sequence::from_vec(self)
    }
}

impl<T: Elem, const N: usize> IntoSequence for [T; N] {
    type Item = T;
    type Key = usize;

    fn into_sequence(self) -> Sequence<T> {
        Sequence::from_vec(self.into())
    }
}

impl<T: Elem> IntoSequence for &[T] {
    type Item = T;
    type Key = usize;

    fn into_sequence(self) -> Sequence<T> {
        Sequence::from_vec(self.to_vec())
    }
}

/// `None` is the empty sequence, `Some(x)` a sequence of one.
impl<T: Elem> IntoSequence for Option<T> {
    type Item = T;
    type Key = usize;

    fn into_sequence(self) -> Sequence<T> {
        Sequence::from_vec(self.into_iter().collect())
    }
}

impl IntoSequence for &str {
    type Item = char;
    type Key = usize;

    fn into_sequence(self) -> Sequence<char> {
        Sequence::chars(self)
    }
}

impl IntoSequence for String {
    type Item = char;
    type Key = usize;

    fn into_sequence(self) -> Sequence<char> {
        Sequence::chars(&self)
    }
}

impl<K: Elem + Ord, V: Elem> IntoSequence for BTreeMap<K, V> {
    type Item = V;
    type Key = K;

    fn into_sequence(self) -> Sequence<V, K> {
        Sequence::from_keyed(self.into_iter().collect())
    }
}

/// Entries come out in the map's iteration order.
impl<K: Elem, V: Elem, H> IntoSequence for HashMap<K, V, H> {
    type Item = V;
    type Key = K;

    fn into_sequence(self) -> Sequence<V, K> {
        Sequence::from_keyed(self.into_iter().collect())
    }
}
