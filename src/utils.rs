//! Small helpers shared by the operators.

use crate::error::{Result, SeqError};
use std::fmt;

/// A tiny deterministic PRNG (`SplitMix64`).
///
/// Used by [`randomize`](crate::Sequence::randomize) so that a given seed
/// always produces the same permutation.
///
/// ```
/// use ironseq::utils::SplitMix64;
///
/// let mut a = SplitMix64::new(7);
/// let mut b = SplitMix64::new(7);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub const fn next_u64(&mut self) -> u64 {
        let mut z = {
            self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            self.state
        };
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Convert a caller-supplied count, rejecting negatives.
pub(crate) fn count_arg<N>(param: &'static str, n: N) -> Result<usize>
where
    N: TryInto<usize> + Copy + fmt::Display,
{
    n.try_into().map_err(|_| SeqError::out_of_range(param, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_sequence_is_stable() {
        let mut rng = SplitMix64::new(0);
        assert_eq!(rng.next_u64(), 0xE220_A839_7B1D_CDAF);
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert_eq!(count_arg("count", 3_i64).ok(), Some(3));
        assert!(count_arg("count", -1_i32).is_err_and(|e| e.is_out_of_range()));
    }
}
