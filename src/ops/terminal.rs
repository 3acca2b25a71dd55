//! Terminal operators: drive the sequence and return a value.
//!
//! Every terminal operator first rewinds a sequence that an earlier terminal
//! operation already drove (see [`Sequence::iterate`]). Short-circuiting
//! operators (`first`, `any_match`, `all`, ...) cancel the loop as soon as the
//! answer is known; `last` and `single` always scan to the end.

use crate::comparer::{default_compare, Comparer, EqualityComparer};
use crate::context::{fold_with, ItemContext};
use crate::error::{Result, SeqError};
use crate::sequence::Sequence;
use crate::utils::count_arg;
use crate::Elem;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

impl<T: Elem, K: Elem> Sequence<T, K> {
    /* ---------- folding ---------- */

    fn aggregate_inner<F>(&mut self, mut f: F) -> Result<Option<T>>
    where
        F: FnMut(T, &T, &mut ItemContext<'_, K, T>) -> T,
    {
        fold_with(self.begin()?, None, |acc: Option<T>, item, ctx| {
            Ok(Some(match acc {
                None => item.clone(),
                Some(acc) => f(acc, item, ctx),
            }))
        })
    }

    /// Fold with the first element as the seed.
    ///
    /// `f` is not called for the first element.
    ///
    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn aggregate<F>(&mut self, f: F) -> Result<T>
    where
        F: FnMut(T, &T, &mut ItemContext<'_, K, T>) -> T,
    {
        self.aggregate_inner(f)?.ok_or_else(SeqError::no_elements)
    }

    /// Like [`aggregate`](Self::aggregate), returning `default` untouched on an
    /// empty sequence.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn aggregate_or<F>(&mut self, default: T, f: F) -> Result<T>
    where
        F: FnMut(T, &T, &mut ItemContext<'_, K, T>) -> T,
    {
        Ok(self.aggregate_inner(f)?.unwrap_or(default))
    }

    /// Fold from an explicit seed.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn fold<A, F>(&mut self, seed: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, &T, &mut ItemContext<'_, K, T>) -> A,
    {
        fold_with(self.begin()?, seed, |acc, item, ctx| Ok(f(acc, item, ctx)))
    }

    /// Run `f` for every element; `f` may cancel.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&T, &mut ItemContext<'_, K, T>),
    {
        self.iterate((), (), |item, ctx| {
            ctx.scoped(|view| f(item, view));
            Ok(())
        })
    }

    /// Like [`each`](Self::each), stopping at the first error `f` returns.
    ///
    /// # Errors
    /// Returns the first error raised by `f` or upstream.
    pub fn try_each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&T, &mut ItemContext<'_, K, T>) -> Result<()>,
    {
        self.iterate((), (), |item, ctx| ctx.scoped(|view| f(item, view)))
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn for_each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        self.each(|item, _| f(item))
    }

    /* ---------- quantifiers ---------- */

    /// Whether the sequence has at least one element.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn any(&mut self) -> Result<bool> {
        self.begin()?.has_more()
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn any_match<P>(&mut self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.iterate(false, (), |item, ctx| {
            if ctx.scoped(|view| pred(item, view)) {
                ctx.set_result(true);
                ctx.cancel();
            }
            Ok(())
        })
    }

    /// Whether `pred` holds for every element (vacuously true when empty).
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn all<P>(&mut self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.iterate(true, (), |item, ctx| {
            if !ctx.scoped(|view| pred(item, view)) {
                ctx.set_result(false);
                ctx.cancel();
            }
            Ok(())
        })
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn count(&mut self) -> Result<usize> {
        self.iterate(0, (), |_, ctx| {
            *ctx.result_mut() += 1;
            Ok(())
        })
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn count_where<P>(&mut self, mut pred: P) -> Result<usize>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.iterate(0, (), |item, ctx| {
            if ctx.scoped(|view| pred(item, view)) {
                *ctx.result_mut() += 1;
            }
            Ok(())
        })
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn contains(&mut self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.any_match(|item, _| item == value)
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn contains_with(&mut self, value: &T, eq: &EqualityComparer<T>) -> Result<bool> {
        self.any_match(|item, _| eq.equals(item, value))
    }

    /// Key of the first element equal to `value`.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn index_of(&mut self, value: &T) -> Result<Option<K>>
    where
        T: PartialEq,
    {
        self.iterate(None, (), |item, ctx| {
            if item == value {
                let key = ctx.key().clone();
                ctx.set_result(Some(key));
                ctx.cancel();
            }
            Ok(())
        })
    }

    /* ---------- element access ---------- */

    fn find_first<P>(&mut self, mut pred: P) -> Result<Option<T>>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.iterate(None, (), |item, ctx| {
            if ctx.scoped(|view| pred(item, view)) {
                ctx.set_result(Some(item.clone()));
                ctx.cancel();
            }
            Ok(())
        })
    }

    fn find_last<P>(&mut self, mut pred: P) -> Result<Option<T>>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.iterate(None, (), |item, ctx| {
            if ctx.scoped(|view| pred(item, view)) {
                ctx.set_result(Some(item.clone()));
            }
            Ok(())
        })
    }

    fn find_single<P>(&mut self, mut pred: P) -> Result<Option<T>>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.iterate(None, (), |item, ctx| {
            if ctx.scoped(|view| pred(item, view)) {
                if ctx.result().is_some() {
                    return Err(SeqError::MultipleElements { index: ctx.index() });
                }
                ctx.set_result(Some(item.clone()));
            }
            Ok(())
        })
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn first(&mut self) -> Result<T> {
        self.find_first(|_, _| true)?.ok_or_else(SeqError::no_elements)
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] when nothing matches.
    pub fn first_where<P>(&mut self, pred: P) -> Result<T>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.find_first(pred)?.ok_or_else(SeqError::no_elements)
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn first_or_default(&mut self, default: T) -> Result<T> {
        Ok(self.find_first(|_, _| true)?.unwrap_or(default))
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn first_or_default_where<P>(&mut self, pred: P, default: T) -> Result<T>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        Ok(self.find_first(pred)?.unwrap_or(default))
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn last(&mut self) -> Result<T> {
        self.find_last(|_, _| true)?.ok_or_else(SeqError::no_elements)
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] when nothing matches.
    pub fn last_where<P>(&mut self, pred: P) -> Result<T>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.find_last(pred)?.ok_or_else(SeqError::no_elements)
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn last_or_default(&mut self, default: T) -> Result<T> {
        Ok(self.find_last(|_, _| true)?.unwrap_or(default))
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn last_or_default_where<P>(&mut self, pred: P, default: T) -> Result<T>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        Ok(self.find_last(pred)?.unwrap_or(default))
    }

    /// The only element.
    ///
    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] when empty and
    /// [`SeqError::MultipleElements`] when there is more than one element.
    pub fn single(&mut self) -> Result<T> {
        self.find_single(|_, _| true)?.ok_or_else(SeqError::no_elements)
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] when nothing matches and
    /// [`SeqError::MultipleElements`] on a second match.
    pub fn single_where<P>(&mut self, pred: P) -> Result<T>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        self.find_single(pred)?.ok_or_else(SeqError::no_elements)
    }

    /// # Errors
    /// Returns [`SeqError::MultipleElements`] when there is more than one element.
    pub fn single_or_default(&mut self, default: T) -> Result<T> {
        Ok(self.find_single(|_, _| true)?.unwrap_or(default))
    }

    /// # Errors
    /// Returns [`SeqError::MultipleElements`] on a second match.
    pub fn single_or_default_where<P>(&mut self, pred: P, default: T) -> Result<T>
    where
        P: FnMut(&T, &mut ItemContext<'_, K, T>) -> bool,
    {
        Ok(self.find_single(pred)?.unwrap_or(default))
    }

    /// The element at zero-based position `index`.
    ///
    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`] for a negative index or one
    /// past the end.
    pub fn element_at<N>(&mut self, index: N) -> Result<T>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let at = count_arg("index", index)?;
        self.find_first(|_, ctx| ctx.index() == at)?
            .ok_or_else(|| SeqError::out_of_range("index", index))
    }

    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`] for a negative index.
    pub fn element_at_or_default<N>(&mut self, index: N, default: T) -> Result<T>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let at = count_arg("index", index)?;
        Ok(self.find_first(|_, ctx| ctx.index() == at)?.unwrap_or(default))
    }

    /* ---------- numeric ---------- */

    /// # Errors
    /// Propagates upstream failures.
    pub fn sum(&mut self) -> Result<T>
    where
        T: Add<Output = T> + Default,
    {
        self.fold(T::default(), |acc, item, _| acc + item.clone())
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn min(&mut self) -> Result<T>
    where
        T: PartialOrd,
    {
        self.extreme(default_compare, Ordering::Less)
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn max(&mut self) -> Result<T>
    where
        T: PartialOrd,
    {
        self.extreme(default_compare, Ordering::Greater)
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn min_by(&mut self, cmp: &Comparer<T>) -> Result<T> {
        self.extreme(|a, b| cmp.compare(a, b), Ordering::Less)
    }

    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn max_by(&mut self, cmp: &Comparer<T>) -> Result<T> {
        self.extreme(|a, b| cmp.compare(a, b), Ordering::Greater)
    }

    /// The first element that beats every other one in direction `wins`.
    fn extreme<C>(&mut self, cmp: C, wins: Ordering) -> Result<T>
    where
        C: Fn(&T, &T) -> Ordering,
    {
        self.aggregate(|best, item, _| if cmp(item, &best) == wins { item.clone() } else { best })
    }

    /// Arithmetic mean.
    ///
    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    pub fn average(&mut self) -> Result<f64>
    where
        T: Into<f64>,
    {
        self.average_by(|item| item.clone().into())
    }

    /// Arithmetic mean of `f(item)`.
    ///
    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] on an empty sequence.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_by<F>(&mut self, mut f: F) -> Result<f64>
    where
        F: FnMut(&T) -> f64,
    {
        let (sum, n) = self.fold((0.0, 0_u64), |(sum, n), item, _| (sum + f(item), n + 1))?;
        if n == 0 {
            return Err(SeqError::no_elements());
        }
        Ok(sum / n as f64)
    }

    /// Concatenate the elements' `Display` output with `separator` between them.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn join_to_string(&mut self, separator: &str) -> Result<String>
    where
        T: fmt::Display,
    {
        self.iterate(String::new(), (), |item, ctx| {
            ctx.result_mut().push_str(&item.to_string());
            if !ctx.is_last() {
                ctx.result_mut().push_str(separator);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_seeds_with_first_element() {
        let mut seq = Sequence::from_vec(vec![1, 2, 3, 4]);
        let calls = std::cell::Cell::new(0);
        let total = seq.aggregate(|acc, item, _| {
            calls.set(calls.get() + 1);
            acc + item
        });
        assert_eq!(total.ok(), Some(10));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn extreme_keeps_first_of_ties() {
        let mut seq = Sequence::from_vec(vec![(2, 'a'), (1, 'b'), (1, 'c')]);
        let by_first = Comparer::from_selector(|p: &(i32, char)| p.0);
        assert_eq!(seq.min_by(&by_first).ok(), Some((1, 'b')));
    }

    #[test]
    fn join_to_string_has_no_trailing_separator() {
        let mut seq = Sequence::from_vec(vec![1, 2, 3]);
        assert_eq!(seq.join_to_string(", ").ok().as_deref(), Some("1, 2, 3"));
    }
}
