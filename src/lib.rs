//! # ironseq
//!
//! A **lazy query library** for Rust: LINQ-style operators over ordered sequences of
//! `(key, item)` entries, composed with a fluent interface and driven on demand.
//!
//! ## Key Features
//!
//! - **Lazy pipelines** - map, filter, flat_map, zip, concat, take_while run only when pulled
//! - **Per-element context** - every callback sees index, key, first/last flags, carried state
//!   and can cancel the loop
//! - **Set operators** - distinct, union, except, intersect with pluggable equality
//! - **Stable multi-key ordering** - order_by / then_by with custom comparers
//! - **Grouping and joins** - group_by, inner join, group join, lookups
//! - **Materialization** - vectors, maps, keyed arrays, JSON
//! - **Textual lambdas** (feature `lambda`) - `x => x.price * 2` compiled into an expression tree
//!
//! ## Quick Start
//!
//! ```
//! use ironseq::*;
//!
//! # fn main() -> ironseq::Result<()> {
//! let words = Sequence::from_vec(vec!["apple", "bob", "cat", "avocado", "banana"]);
//!
//! let mut by_initial = words
//!     .filter(|w: &&str, _| w.len() > 2)
//!     .group_by(|w: &&str| w.chars().next().unwrap_or(' '));
//!
//! let sizes: Vec<(char, usize)> = by_initial
//!     .map(|g: &Grouping<char, &str>, _| (*g.key(), g.len()))
//!     .to_vec()?;
//! assert_eq!(sizes, vec![('a', 2), ('b', 2), ('c', 1)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Sequence
//!
//! A [`Sequence<T, K>`] owns a cursor over `(key, item)` entries. Sequences are:
//! - **Lazy** - building a pipeline runs nothing until a terminal operation pulls
//! - **Keyed** - every element carries a key (`usize` position by default)
//! - **Single-owner** - operators consume their receiver and return a new sequence
//!
//! Sources built from vectors, ranges and generators are resettable, so every
//! terminal operation starts from the beginning. One-shot iterators
//! ([`Sequence::from_iter_once`]) can be driven exactly once; use
//! [`as_resettable`](Sequence::as_resettable) to buffer them.
//!
//! ### Operators
//!
//! #### Lazy
//! - [`map`](Sequence::map) / [`try_map`](Sequence::try_map) - transform each element
//! - [`filter`](Sequence::filter) / [`try_filter`](Sequence::try_filter) - keep matching elements
//! - [`flat_map`](Sequence::flat_map) - zero or more outputs per element
//! - [`take_while`](Sequence::take_while), [`take`](Sequence::take), [`concat`](Sequence::concat),
//!   [`zip`](Sequence::zip), [`default_if_empty`](Sequence::default_if_empty)
//!
//! #### Deferred (materialize on first pull)
//! - [`distinct`](Sequence::distinct), [`union`](Sequence::union),
//!   [`except`](Sequence::except), [`intersect`](Sequence::intersect)
//! - [`order_by`](Sequence::order_by), [`reverse`](Sequence::reverse),
//!   [`randomize`](Sequence::randomize)
//! - [`group_by`](Sequence::group_by), [`join`](Sequence::join),
//!   [`group_join`](Sequence::group_join)
//!
//! #### Terminal
//! - Folding: [`aggregate`](Sequence::aggregate), [`fold`](Sequence::fold),
//!   [`iterate`](Sequence::iterate)
//! - Queries: [`any`](Sequence::any), [`all`](Sequence::all), [`count`](Sequence::count),
//!   [`first`](Sequence::first), [`single`](Sequence::single), [`sum`](Sequence::sum), ...
//! - Targets: [`to_vec`](Sequence::to_vec), [`to_map`](Sequence::to_map),
//!   [`to_lookup`](Sequence::to_lookup), [`to_json`](Sequence::to_json), ...
//!
//! ## Feature Flags
//!
//! - `lambda` (default) - textual lambda expressions via [`lambda::as_callable`]
//!
//! ## Module Overview
//!
//! - [`cursor`] - the pull contract and concrete sources
//! - [`context`] - the per-element [`ItemContext`]
//! - [`sequence`] - the [`Sequence`] type and input normalization
//! - [`ops`] - lazy, set and terminal operators
//! - [`ordering`] - sorted views and [`OrderedSequence`]
//! - [`grouping`] - groupings, joins and [`Lookup`]
//! - [`materialize`] - keyed arrays, maps and JSON
//! - [`testing`] - assertions, builders and fixtures for tests

pub mod comparer;
pub mod context;
pub mod cursor;
pub mod error;
pub mod grouping;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod materialize;
pub mod ops;
pub mod ordering;
pub mod sequence;
pub mod testing;
pub mod utils;

/// Blanket bound for everything stored in a sequence, key or item.
pub trait Elem: Clone + 'static {}
impl<T: Clone + 'static> Elem for T {}

// General re-exports
pub use comparer::{compare_json, default_compare, Comparer, EqualityComparer};
pub use context::ItemContext;
pub use cursor::{
    ArrayCursor, BoxCursor, Cursor, EmptyCursor, GenerateCursor, IterCursor, Position, ResettableCursor,
};
pub use error::{ErrorKind, Result, SeqError};
pub use grouping::{Grouping, Lookup};
pub use materialize::{from_json, ArrayKey, JsonOptions, KeyedArray};
pub use ordering::OrderedSequence;
pub use sequence::{IntoSequence, Sequence};

// Gated re-exports
#[cfg(feature = "lambda")]
pub use lambda::{as_callable, Lambda};
