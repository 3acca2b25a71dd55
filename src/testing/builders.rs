//! Builders for test sequences.
//!
//! [`SequenceBuilder`] assembles entries and hands them out as a resettable
//! or a single-pass [`Sequence`], so one dataset can exercise both source
//! kinds. [`seeded_ints`] is a restartable pseudo-random source.

use crate::sequence::Sequence;
use crate::utils::SplitMix64;
use crate::Elem;

/// Collects `(key, item)` entries for a test sequence.
///
/// Positional builders (`K = usize`) number items in push order; keyed
/// builders take explicit keys.
///
/// # Example
///
/// ```
/// use ironseq::testing::SequenceBuilder;
///
/// # fn main() -> ironseq::Result<()> {
/// let mut seq = SequenceBuilder::new().push(7).repeat(0, 2).extend(1..=2).build();
/// assert_eq!(seq.to_vec()?, vec![7, 0, 0, 1, 2]);
///
/// let mut once = SequenceBuilder::new().extend(["a", "b"]).build_single_pass();
/// assert_eq!(once.count()?, 2);
/// assert!(once.count().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SequenceBuilder<T, K = usize> {
    entries: Vec<(K, T)>,
}

impl<T, K> Default for SequenceBuilder<T, K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: Elem> SequenceBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one item at the next position.
    #[must_use]
    pub fn push(mut self, item: T) -> Self {
        self.entries.push((self.entries.len(), item));
        self
    }

    /// Append every item of `items`.
    #[must_use]
    pub fn extend(self, items: impl IntoIterator<Item = T>) -> Self {
        items.into_iter().fold(self, Self::push)
    }

    /// Append `item` `times` times.
    #[must_use]
    pub fn repeat(self, item: T, times: usize) -> Self {
        self.extend(std::iter::repeat_n(item, times))
    }

    /// A sequence over the items that can be driven exactly once.
    #[must_use]
    pub fn build_single_pass(self) -> Sequence<T> {
        Sequence::from_iter_once(self.entries.into_iter().map(|(_, item)| item))
    }
}

impl<T: Elem, K: Elem> SequenceBuilder<T, K> {
    /// An empty builder with explicit keys.
    ///
    /// ```
    /// use ironseq::testing::SequenceBuilder;
    ///
    /// # fn main() -> ironseq::Result<()> {
    /// let mut seq = SequenceBuilder::keyed().entry("a", 1).entries("b", [2, 3]).build();
    /// assert_eq!(seq.to_entries()?, vec![("a", 1), ("b", 2), ("b", 3)]);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn keyed() -> Self {
        Self::default()
    }

    /// Append `item` under `key`.
    #[must_use]
    pub fn entry(mut self, key: K, item: T) -> Self {
        self.entries.push((key, item));
        self
    }

    /// Append every item of `items` under the same `key`.
    #[must_use]
    pub fn entries(mut self, key: K, items: impl IntoIterator<Item = T>) -> Self {
        self.entries.extend(items.into_iter().map(|item| (key.clone(), item)));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A resettable sequence over the collected entries.
    #[must_use]
    pub fn build(self) -> Sequence<T, K> {
        Sequence::from_keyed(self.entries)
    }
}

/// `count` pseudo-random integers in `min..max`, drawn from [`SplitMix64`].
///
/// The source restarts from `seed` on every pass, so repeated terminal
/// operations see the same values.
///
/// ```
/// use ironseq::testing::seeded_ints;
///
/// # fn main() -> ironseq::Result<()> {
/// let mut seq = seeded_ints(5, 10, 20, 42);
/// let first = seq.to_vec()?;
/// assert_eq!(first.len(), 5);
/// assert!(first.iter().all(|v| (10..20).contains(v)));
/// assert_eq!(seq.to_vec()?, first);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn seeded_ints(count: usize, min: i32, max: i32, seed: u64) -> Sequence<i32> {
    let span = u64::from(max.abs_diff(min)).max(1);
    let low = min.min(max);
    Sequence::generate(move || {
        let mut rng = SplitMix64::new(seed);
        (0..count).map(move |_| {
            let offset = rng.next_u64() % span;
            i32::try_from(i64::from(low) + i64::try_from(offset).unwrap_or(0)).unwrap_or(low)
        })
    })
}
