//! Grouping, joins, and lookups.
//!
//! Grouping never hashes: keys may be arbitrary values compared by an
//! [`EqualityComparer`], so every item does a linear scan over the buckets
//! seen so far (O(n·g)). Buckets come out in the order their key was first
//! seen.
//!
//! Joins run two grouping passes, one per side, then match outer buckets
//! against inner buckets:
//!
//! - [`join`](Sequence::join) emits one result per matching `(outer, inner)` pair
//! - [`group_join`](Sequence::group_join) emits one result per outer item, paired
//!   with the whole matching inner group (empty when nothing matches)
//!
//! ```
//! use ironseq::Sequence;
//!
//! # fn main() -> ironseq::Result<()> {
//! let users = Sequence::from_vec(vec![(1, "ann"), (2, "bob")]);
//! let orders = vec![(1, "pen"), (1, "ink"), (3, "cup")];
//!
//! let rows = users
//!     .join(
//!         orders,
//!         |u: &(i32, &str)| u.0,
//!         |o: &(i32, &str)| o.0,
//!         |u: &(i32, &str), o: &(i32, &str)| format!("{}:{}", u.1, o.1),
//!     )
//!     .to_vec()?;
//! assert_eq!(rows, vec!["ann:pen", "ann:ink"]);
//! # Ok(())
//! # }
//! ```

use crate::comparer::EqualityComparer;
use crate::cursor::Position;
use crate::error::{Result, SeqError};
use crate::ops::drain;
use crate::sequence::{IntoSequence, Sequence};
use crate::Elem;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Buckets in first-seen key order.
pub(crate) type Buckets<GK, V> = Vec<(GK, Vec<V>)>;

/// Distribute `pairs` into buckets, scanning existing keys with `eq`.
pub(crate) fn bucket<GK: 'static, V>(pairs: impl IntoIterator<Item = (GK, V)>, eq: &EqualityComparer<GK>) -> Buckets<GK, V> {
    let mut buckets: Buckets<GK, V> = Vec::new();
    for (key, value) in pairs {
        if let Some(i) = buckets.iter().position(|(k, _)| eq.equals(k, &key)) {
            buckets[i].1.push(value);
        } else {
            buckets.push((key, vec![value]));
        }
    }
    buckets
}

/* ===================== Grouping ===================== */

/// A key with the items that share it.
#[derive(Clone, Debug, PartialEq)]
pub struct Grouping<GK, T> {
    key: GK,
    items: Rc<[T]>,
}

impl<GK, T> Grouping<GK, T> {
    pub fn new(key: GK, items: Vec<T>) -> Self {
        Self {
            key,
            items: items.into(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> &GK {
        &self.key
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<GK, T: Clone> Grouping<GK, T> {
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.to_vec()
    }
}

impl<GK: Elem, T: Elem> Grouping<GK, T> {
    /// A fresh, independent sequence over the group's items.
    #[must_use]
    pub fn items(&self) -> Sequence<T> {
        Sequence::from_vec(self.to_vec())
    }
}

impl<GK: Elem, T: Elem> IntoSequence for Grouping<GK, T> {
    type Item = T;
    type Key = usize;

    fn into_sequence(self) -> Sequence<T> {
        self.items()
    }
}

impl<GK: Serialize, T: Serialize> Serialize for Grouping<GK, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Grouping", 2)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("items", &*self.items)?;
        state.end()
    }
}

/* ===================== Lookup ===================== */

/// Groups addressable by key.
#[derive(Clone, Debug)]
pub struct Lookup<GK, T> {
    groups: Vec<Grouping<GK, T>>,
    eq: EqualityComparer<GK>,
}

impl<GK: Elem, T: Elem> Lookup<GK, T> {
    pub(crate) fn from_buckets(buckets: Buckets<GK, T>, eq: EqualityComparer<GK>) -> Self {
        let groups = buckets.into_iter().map(|(key, items)| Grouping::new(key, items)).collect();
        Self { groups, eq }
    }

    fn find(&self, key: &GK) -> Option<&Grouping<GK, T>> {
        self.groups.iter().find(|g| self.eq.equals(&g.key, key))
    }

    /// The items under `key`; empty when the key is absent.
    #[must_use]
    pub fn get(&self, key: &GK) -> Sequence<T> {
        self.find(key).map_or_else(Sequence::empty, Grouping::items)
    }

    /// # Errors
    /// Returns [`SeqError::KeyNotFound`] when the key is absent.
    pub fn try_get(&self, key: &GK) -> Result<&Grouping<GK, T>>
    where
        GK: fmt::Debug,
    {
        self.find(key).ok_or_else(|| SeqError::key_not_found(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &GK) -> bool {
        self.find(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &GK> {
        self.groups.iter().map(Grouping::key)
    }

    #[must_use]
    pub fn groupings(&self) -> &[Grouping<GK, T>] {
        &self.groups
    }
}

impl<GK: Elem, T: Elem> IntoSequence for Lookup<GK, T> {
    type Item = Grouping<GK, T>;
    type Key = GK;

    fn into_sequence(self) -> Sequence<Grouping<GK, T>, GK> {
        Sequence::from_keyed(self.groups.into_iter().map(|g| (g.key.clone(), g)).collect())
    }
}

/* ===================== join plumbing ===================== */

enum InnerState<KI, U, JK> {
    Pending(Position<KI, U>),
    Ready(Rc<Buckets<JK, U>>),
}

/// The inner side of a join, grouped once and shared by every fork.
struct InnerSide<KI, U, JK> {
    state: RefCell<InnerState<KI, U, JK>>,
    key: Box<dyn Fn(&U) -> JK>,
    eq: EqualityComparer<JK>,
}

impl<KI: Elem, U: Elem, JK: 'static> InnerSide<KI, U, JK> {
    fn groups(&self) -> Result<Rc<Buckets<JK, U>>> {
        let mut state = self.state.borrow_mut();
        match &mut *state {
            InnerState::Ready(groups) => Ok(Rc::clone(groups)),
            InnerState::Pending(pos) => {
                let pairs = drain(pos)?.into_iter().map(|(_, item)| ((self.key)(&item), item));
                let groups = Rc::new(bucket(pairs, &self.eq));
                trace!(operator = "join", groups = groups.len(), "grouped inner side");
                *state = InnerState::Ready(Rc::clone(&groups));
                Ok(groups)
            }
        }
    }
}

impl<T: Elem, K: Elem> Sequence<T, K> {
    /* ---------- group_by ---------- */

    /// Group items by `key`, buckets in first-seen order.
    #[must_use]
    pub fn group_by<GK, F>(self, key: F) -> Sequence<Grouping<GK, T>, GK>
    where
        GK: Elem + PartialEq,
        F: Fn(&T) -> GK + 'static,
    {
        self.group_by_with(key, EqualityComparer::structural())
    }

    #[must_use]
    pub fn group_by_with<GK, F>(self, key: F, eq: EqualityComparer<GK>) -> Sequence<Grouping<GK, T>, GK>
    where
        GK: Elem,
        F: Fn(&T) -> GK + 'static,
    {
        self.group_by_select_with(key, T::clone, eq)
    }

    /// Group `value(item)` by `key(item)`.
    #[must_use]
    pub fn group_by_select<GK, V, F, G>(self, key: F, value: G) -> Sequence<Grouping<GK, V>, GK>
    where
        GK: Elem + PartialEq,
        V: Elem,
        F: Fn(&T) -> GK + 'static,
        G: Fn(&T) -> V + 'static,
    {
        self.group_by_select_with(key, value, EqualityComparer::structural())
    }

    #[must_use]
    pub fn group_by_select_with<GK, V, F, G>(
        self,
        key: F,
        value: G,
        eq: EqualityComparer<GK>,
    ) -> Sequence<Grouping<GK, V>, GK>
    where
        GK: Elem,
        V: Elem,
        F: Fn(&T) -> GK + 'static,
        G: Fn(&T) -> V + 'static,
    {
        self.deferred("group_by", move |pos| {
            let pairs = drain(pos)?.into_iter().map(|(_, item)| (key(&item), value(&item)));
            Ok(bucket(pairs, &eq)
                .into_iter()
                .map(|(k, items)| (k.clone(), Grouping::new(k, items)))
                .collect())
        })
    }

    /* ---------- join ---------- */

    /// Inner join on `outer_key(item) == inner_key(other)`.
    ///
    /// Results are ordered by outer group, then outer item, then inner item,
    /// and renumbered from zero.
    pub fn join<S, JK, R, OF, IF, RF>(self, inner: S, outer_key: OF, inner_key: IF, result: RF) -> Sequence<R>
    where
        S: IntoSequence,
        JK: Elem + PartialEq,
        R: Elem,
        OF: Fn(&T) -> JK + 'static,
        IF: Fn(&S::Item) -> JK + 'static,
        RF: Fn(&T, &S::Item) -> R + 'static,
    {
        self.join_with(inner, outer_key, inner_key, result, EqualityComparer::structural())
    }

    pub fn join_with<S, JK, R, OF, IF, RF>(
        self,
        inner: S,
        outer_key: OF,
        inner_key: IF,
        result: RF,
        eq: EqualityComparer<JK>,
    ) -> Sequence<R>
    where
        S: IntoSequence,
        JK: Elem,
        R: Elem,
        OF: Fn(&T) -> JK + 'static,
        IF: Fn(&S::Item) -> JK + 'static,
        RF: Fn(&T, &S::Item) -> R + 'static,
    {
        let side = InnerSide {
            state: RefCell::new(InnerState::Pending(inner.into_sequence().into_position())),
            key: Box::new(inner_key),
            eq: eq.clone(),
        };
        self.deferred("join", move |pos| {
            let outer = bucket(drain(pos)?.into_iter().map(|(_, item)| (outer_key(&item), item)), &eq);
            let inner = side.groups()?;
            let mut rows = Vec::new();
            for (key, outer_items) in &outer {
                for (_, inner_items) in inner.iter().filter(|(k, _)| eq.equals(key, k)) {
                    for o in outer_items {
                        for i in inner_items {
                            rows.push((rows.len(), result(o, i)));
                        }
                    }
                }
            }
            Ok(rows)
        })
    }

    /// One result per outer item, paired with every inner item sharing its key.
    ///
    /// Outer items without a match get an empty group.
    pub fn group_join<S, JK, R, OF, IF, RF>(
        self,
        inner: S,
        outer_key: OF,
        inner_key: IF,
        result: RF,
    ) -> Sequence<R>
    where
        S: IntoSequence,
        JK: Elem + PartialEq,
        R: Elem,
        OF: Fn(&T) -> JK + 'static,
        IF: Fn(&S::Item) -> JK + 'static,
        RF: Fn(&T, &Grouping<JK, S::Item>) -> R + 'static,
    {
        self.group_join_with(inner, outer_key, inner_key, result, EqualityComparer::structural())
    }

    pub fn group_join_with<S, JK, R, OF, IF, RF>(
        self,
        inner: S,
        outer_key: OF,
        inner_key: IF,
        result: RF,
        eq: EqualityComparer<JK>,
    ) -> Sequence<R>
    where
        S: IntoSequence,
        JK: Elem,
        R: Elem,
        OF: Fn(&T) -> JK + 'static,
        IF: Fn(&S::Item) -> JK + 'static,
        RF: Fn(&T, &Grouping<JK, S::Item>) -> R + 'static,
    {
        let side = InnerSide {
            state: RefCell::new(InnerState::Pending(inner.into_sequence().into_position())),
            key: Box::new(inner_key),
            eq: eq.clone(),
        };
        self.deferred("group_join", move |pos| {
            let outer = bucket(drain(pos)?.into_iter().map(|(_, item)| (outer_key(&item), item)), &eq);
            let inner = side.groups()?;
            let mut rows = Vec::new();
            for (key, outer_items) in outer {
                let matched = inner
                    .iter()
                    .find(|(k, _)| eq.equals(&key, k))
                    .map(|(_, items)| items.clone())
                    .unwrap_or_default();
                let group = Grouping::new(key, matched);
                for o in &outer_items {
                    rows.push((rows.len(), result(o, &group)));
                }
            }
            Ok(rows)
        })
    }
}
