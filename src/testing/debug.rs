//! Debug utilities for inspecting sequences during test execution.
//!
//! The methods in [`SequenceDebugExt`] are lazy pass-through operators: they
//! yield every element unchanged and emit `tracing` events at `DEBUG` level as
//! elements are pulled. Install a subscriber in the test to see them.

use crate::context::ItemContext;
use crate::sequence::Sequence;
use crate::Elem;
use std::fmt::Debug;
use tracing::debug;

/// Only the first elements are logged by [`SequenceDebugExt::debug_inspect`].
const INSPECT_LIMIT: usize = 10;

/// Debugging operators for [`Sequence`].
pub trait SequenceDebugExt<T, K>: Sized {
    /// Log the first few elements as they are pulled.
    ///
    /// # Example
    ///
    /// ```
    /// use ironseq::Sequence;
    /// use ironseq::testing::SequenceDebugExt;
    ///
    /// # fn main() -> ironseq::Result<()> {
    /// let result = Sequence::from_vec(vec![1, 2, 3])
    ///     .debug_inspect("after source")
    ///     .map(|x: &i32, _| x * 2)
    ///     .debug_inspect("after map")
    ///     .to_vec()?;
    /// assert_eq!(result, vec![2, 4, 6]);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    fn debug_inspect(self, label: &str) -> Self;

    /// Like [`debug_inspect`](Self::debug_inspect), also running `inspector`
    /// against every element.
    #[must_use]
    fn debug_inspect_with<F>(self, label: &str, inspector: F) -> Self
    where
        F: Fn(&T) + 'static;

    /// Log how many elements passed once the last one is pulled.
    ///
    /// Nothing is logged for an empty sequence.
    #[must_use]
    fn debug_count(self, label: &str) -> Self;

    /// Log the first `n` elements.
    #[must_use]
    fn debug_sample(self, n: usize, label: &str) -> Self;
}

impl<T: Elem + Debug, K: Elem + Debug> SequenceDebugExt<T, K> for Sequence<T, K> {
    fn debug_inspect(self, label: &str) -> Self {
        self.debug_sample(INSPECT_LIMIT, label)
    }

    fn debug_inspect_with<F>(self, label: &str, inspector: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        self.debug_inspect(label).map(move |item: &T, _: &mut ItemContext<'_, K, T>| {
            inspector(item);
            item.clone()
        })
    }

    fn debug_count(self, label: &str) -> Self {
        let label = label.to_owned();
        self.map(move |item: &T, ctx: &mut ItemContext<'_, K, T>| {
            if ctx.is_last() {
                debug!(label = %label, count = ctx.index() + 1, "elements passed");
            }
            item.clone()
        })
    }

    fn debug_sample(self, n: usize, label: &str) -> Self {
        let label = label.to_owned();
        self.map(move |item: &T, ctx: &mut ItemContext<'_, K, T>| {
            if ctx.index() < n {
                debug!(label = %label, index = ctx.index(), key = ?ctx.key(), item = ?item, "pulled");
            }
            item.clone()
        })
    }
}
