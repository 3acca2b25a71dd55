//! Per-element context handed to operator callbacks.
//!
//! An [`ItemContext`] is created by the engine for every element an operator
//! visits and dropped right after the callback returns. It carries the
//! element's position within the current loop, first/last flags, a state
//! value threaded through the whole loop, a one-shot slot for handing data to
//! the next element, the loop's accumulator, and a cancellation flag.
//!
//! ```
//! use ironseq::Sequence;
//!
//! # fn main() -> ironseq::Result<()> {
//! let mut seq = Sequence::from_vec(vec![3, 5, 8]);
//! // Running difference to the previous element, threaded through `next_value`.
//! let deltas = seq.iterate(Vec::new(), 0, |item: &i32, ctx| {
//!     let delta = ctx.previous_value().map_or(0, |prev: &i32| item - prev);
//!     ctx.result_mut().push(delta);
//!     ctx.set_next_value(*item);
//!     Ok(())
//! })?;
//! assert_eq!(deltas, vec![0, 2, 3]);
//! # Ok(())
//! # }
//! ```

use crate::cursor::Position;
use crate::error::Result;

/// Metadata and state for one element of one operator loop.
///
/// `R` is the loop accumulator and `S` the carried state. Plain operators
/// use `()` for both.
pub struct ItemContext<'a, K, T, R = (), S = ()> {
    index: usize,
    key: &'a K,
    item: &'a T,
    is_last: bool,
    previous: Option<S>,
    next: Option<S>,
    value: S,
    result: R,
    cancelled: bool,
}

/// What the engine reads back once a callback returns.
pub(crate) struct Outcome<R, S> {
    pub(crate) result: R,
    pub(crate) value: S,
    pub(crate) next: Option<S>,
    pub(crate) cancelled: bool,
}

impl<'a, K, T, R, S> ItemContext<'a, K, T, R, S> {
    pub(crate) const fn new(
        key: &'a K,
        item: &'a T,
        index: usize,
        is_last: bool,
        previous: Option<S>,
        result: R,
        value: S,
    ) -> Self {
        Self {
            index,
            key,
            item,
            is_last,
            previous,
            next: None,
            value,
            result,
            cancelled: false,
        }
    }

    /// Zero-based position within this loop (not within the original source).
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn key(&self) -> &'a K {
        self.key
    }

    #[must_use]
    pub const fn item(&self) -> &'a T {
        self.item
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Whether no element follows this one.
    ///
    /// Only known when the engine looked ahead; contexts built without
    /// advancing (as in `skip_while`) always report `false`.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.is_last
    }

    /// Whatever the previous element stored with [`set_next_value`](Self::set_next_value).
    #[must_use]
    pub const fn previous_value(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    /// Hand a value to the next element's [`previous_value`](Self::previous_value).
    pub fn set_next_value(&mut self, value: S) {
        self.next = Some(value);
    }

    #[must_use]
    pub const fn next_value(&self) -> Option<&S> {
        self.next.as_ref()
    }

    /// State carried across the whole loop.
    #[must_use]
    pub const fn value(&self) -> &S {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut S {
        &mut self.value
    }

    pub fn set_value(&mut self, value: S) {
        self.value = value;
    }

    /// The loop accumulator.
    #[must_use]
    pub const fn result(&self) -> &R {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut R {
        &mut self.result
    }

    pub fn set_result(&mut self, result: R) {
        self.result = result;
    }

    /// Stop the driving loop once this element has been processed.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Run `f` against a plain view of this element; a cancel from the view
    /// carries over.
    pub(crate) fn scoped<O>(&mut self, f: impl FnOnce(&mut ItemContext<'a, K, T>) -> O) -> O {
        let mut view = ItemContext::new(self.key, self.item, self.index, self.is_last, None, (), ());
        let out = f(&mut view);
        if view.cancelled {
            self.cancelled = true;
        }
        out
    }

    pub(crate) fn finish(self) -> Outcome<R, S> {
        Outcome {
            result: self.result,
            value: self.value,
            next: self.next,
            cancelled: self.cancelled,
        }
    }
}

/// The generic iterate-with-context loop.
///
/// Every element is moved out of `pos`, the following one is primed to
/// compute `is_last`, and `action` runs with a fresh context. The accumulator
/// survives a cancel; the loop stops right after a cancelled element.
pub(crate) fn drive<K, T, R, S, F>(
    pos: &mut Position<K, T>,
    init_result: R,
    init_value: S,
    mut action: F,
) -> Result<R>
where
    K: 'static,
    T: 'static,
    F: FnMut(&T, &mut ItemContext<'_, K, T, R, S>) -> Result<()>,
{
    let mut index = 0;
    let mut previous: Option<S> = None;
    let mut value = init_value;
    let mut result = init_result;

    while let Some((key, item)) = pos.take()? {
        let is_last = !pos.has_more()?;
        let mut ctx = ItemContext::new(&key, &item, index, is_last, previous.take(), result, value);
        action(&item, &mut ctx)?;
        let outcome = ctx.finish();
        result = outcome.result;
        if outcome.cancelled {
            break;
        }
        previous = outcome.next;
        value = outcome.value;
        index += 1;
    }
    Ok(result)
}

/// Fold over `pos` with an owned accumulator kept outside the context.
///
/// Used where the accumulator is handed to the callback by value. Stops after
/// a cancelled element like [`drive`].
pub(crate) fn fold_with<K, T, A, F>(pos: &mut Position<K, T>, seed: A, mut f: F) -> Result<A>
where
    K: 'static,
    T: 'static,
    F: FnMut(A, &T, &mut ItemContext<'_, K, T>) -> Result<A>,
{
    let mut acc = seed;
    let mut index = 0;
    while let Some((key, item)) = pos.take()? {
        let is_last = !pos.has_more()?;
        let mut ctx = ItemContext::new(&key, &item, index, is_last, None, (), ());
        acc = f(acc, &item, &mut ctx)?;
        if ctx.is_cancelled() {
            break;
        }
        index += 1;
    }
    Ok(acc)
}

/// Stepping state for lazy operators that pull one element per request.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stepper {
    index: usize,
    stopped: bool,
}

impl Stepper {
    /// Pull the next element and run `f` against it.
    ///
    /// Returns `None` at the end of input or once a previous callback cancelled.
    pub(crate) fn step<K, T, O, F>(&mut self, pos: &mut Position<K, T>, f: F) -> Result<Option<(K, T, O)>>
    where
        K: 'static,
        T: 'static,
        F: FnOnce(&T, &mut ItemContext<'_, K, T>) -> Result<O>,
    {
        if self.stopped {
            return Ok(None);
        }
        let Some((key, item)) = pos.take()? else {
            self.stopped = true;
            return Ok(None);
        };
        let is_last = !pos.has_more()?;
        let mut ctx = ItemContext::new(&key, &item, self.index, is_last, None, (), ());
        let out = f(&item, &mut ctx)?;
        if ctx.is_cancelled() {
            self.stopped = true;
        }
        self.index += 1;
        Ok(Some((key, item, out)))
    }

    pub(crate) const fn stop(&mut self) {
        self.stopped = true;
    }

    pub(crate) fn restart(&mut self) {
        *self = Self::default();
    }
}
