//! Testing utilities for sequence queries.
//!
//! This module provides helpers for writing idiomatic Rust tests against
//! query pipelines. It includes:
//!
//! - **Assertions**: Drive a sequence and compare what it yields
//! - **Builders**: Assemble resettable or single-pass test sequences
//! - **Debug utilities**: Trace elements as they are pulled
//! - **Fixtures**: Pre-built datasets for grouping, joins and ordering
//! - **Call counting**: Observe how often a lazy callback actually runs
//!
//! # Quick Start
//!
//! ```
//! use ironseq::Sequence;
//! use ironseq::testing::*;
//!
//! let doubled = Sequence::from_vec(vec![1, 2, 3]).map(|x: &i32, _| x * 2);
//! assert_sequence_eq(doubled, &[2, 4, 6]);
//! ```
//!
//! # Assertion Functions
//!
//! All of them accept any [`IntoSequence`](crate::IntoSequence) input.
//!
//! - [`assert_sequence_eq`]: Items in order
//! - [`assert_entries_eq`]: Keys and items in order
//! - [`assert_sequence_unordered_eq`]: Items as a multiset
//! - [`assert_groupings_eq`]: Group keys and members
//! - [`assert_all`], [`assert_any`], [`assert_none`]: Predicate checks
//! - [`assert_error_kind`]: Check the [`ErrorKind`](crate::ErrorKind) of a failed result
//!
//! # Laziness
//!
//! [`CallCounter`] is a cheap shared counter that can be moved into a
//! `'static` callback and read back afterwards:
//!
//! ```
//! use ironseq::Sequence;
//! use ironseq::testing::CallCounter;
//!
//! # fn main() -> ironseq::Result<()> {
//! let calls = CallCounter::new();
//! let hits = calls.clone();
//! let first = Sequence::from_vec(vec![1, 2, 3, 4])
//!     .map(move |x: &i32, _| { hits.hit(); x * 10 })
//!     .first()?;
//! assert_eq!(first, 10);
//! // one call for the first element, one for the look-ahead behind `is_last`
//! assert_eq!(calls.count(), 2);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod builders;
pub mod debug;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::*;
pub use builders::*;
pub use debug::*;
pub use fixtures::*;

use std::cell::Cell;
use std::rc::Rc;

/// A shared counter for observing callback invocations.
///
/// Clones share the same count.
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    calls: Rc<Cell<usize>>,
}

impl CallCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub fn hit(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.get()
    }

    pub fn reset(&self) {
        self.calls.set(0);
    }
}
