//! Materialization targets: vectors, maps, keyed arrays and JSON.
//!
//! A [`KeyedArray`] is an ordered associative array: integer slots and named
//! slots share one insertion order, and writing to an existing key overwrites
//! that slot in place. It serializes as a JSON array when its keys are exactly
//! `0..len` in order, and as a JSON object otherwise.
//!
//! ```
//! use ironseq::{ArrayKey, Sequence};
//!
//! # fn main() -> ironseq::Result<()> {
//! let mut seq = Sequence::from_vec(vec!["a1", "b", "a2"]);
//! let arr = seq.to_array_with(|_, item: &&str, _| {
//!     item.starts_with('a').then(|| ArrayKey::from("a"))
//! })?;
//! assert_eq!(arr.get(&ArrayKey::from("a")), Some(&"a2"));
//! assert_eq!(serde_json::to_string(&arr)?, r#"{"a":"a2","0":"b"}"#);
//! # Ok(())
//! # }
//! ```

use crate::comparer::EqualityComparer;
use crate::context::ItemContext;
use crate::error::{Result, SeqError};
use crate::grouping::{bucket, Lookup};
use crate::sequence::{IntoSequence, Sequence};
use crate::Elem;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use tracing::trace;

/* ===================== ArrayKey ===================== */

/// A slot key in a [`KeyedArray`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ArrayKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ArrayKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ArrayKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/* ===================== KeyedArray ===================== */

/// Ordered associative array with last-write-wins keys.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedArray<T> {
    entries: Vec<(ArrayKey, T)>,
    /// `None` once `usize::MAX` has been used as an index.
    next_index: Option<usize>,
}

impl<T> Default for KeyedArray<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_index: Some(0),
        }
    }
}

impl<T> KeyedArray<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` under `key`, overwriting an existing slot in place.
    pub fn insert(&mut self, key: ArrayKey, value: T) {
        if let ArrayKey::Index(i) = key {
            self.next_index = self.next_index.zip(i.checked_add(1)).map(|(next, after)| next.max(after));
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append `value` at the next free integer index.
    ///
    /// # Errors
    /// Returns [`SeqError::ArgumentOutOfRange`] when index `usize::MAX` is already taken.
    pub fn push(&mut self, value: T) -> Result<ArrayKey> {
        let index = self
            .next_index
            .ok_or_else(|| SeqError::out_of_range("index", "past usize::MAX"))?;
        let key = ArrayKey::Index(index);
        self.insert(key.clone(), value);
        Ok(key)
    }

    #[must_use]
    pub fn get(&self, key: &ArrayKey) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the keys are exactly `0, 1, .., len - 1` in order.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == ArrayKey::Index(i))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<(ArrayKey, T)> {
        self.entries
    }
}

impl<T: Serialize> Serialize for KeyedArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_list() {
            return serializer.collect_seq(self.values());
        }
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

impl<T: Elem> IntoSequence for KeyedArray<T> {
    type Item = T;
    type Key = ArrayKey;

    fn into_sequence(self) -> Sequence<T, ArrayKey> {
        Sequence::from_keyed(self.entries)
    }
}

/* ===================== options ===================== */

/// Options for [`Sequence::to_json_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Indent the output.
    pub pretty: bool,
    /// Serialize through a [`KeyedArray`] built from the sequence keys.
    pub keyed: bool,
}

/* ===================== targets ===================== */

impl<T: Elem, K: Elem> Sequence<T, K> {
    /// # Errors
    /// Propagates upstream failures.
    pub fn to_vec(&mut self) -> Result<Vec<T>> {
        self.iterate(Vec::new(), (), |item, ctx| {
            ctx.result_mut().push(item.clone());
            Ok(())
        })
    }

    /// `(key, item)` pairs in order.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn to_entries(&mut self) -> Result<Vec<(K, T)>> {
        self.iterate(Vec::new(), (), |item, ctx| {
            let key = ctx.key().clone();
            ctx.result_mut().push((key, item.clone()));
            Ok(())
        })
    }

    /// Build a [`KeyedArray`]: `None` from `key_selector` appends at the next
    /// integer index, `Some(key)` writes (or overwrites) that slot.
    ///
    /// # Errors
    /// Propagates upstream failures. Appending after index `usize::MAX` was
    /// written fails with [`SeqError::ArgumentOutOfRange`].
    pub fn to_array_with<F>(&mut self, mut key_selector: F) -> Result<KeyedArray<T>>
    where
        F: FnMut(&K, &T, &mut ItemContext<'_, K, T>) -> Option<ArrayKey>,
    {
        self.iterate(KeyedArray::new(), (), |item, ctx| {
            match ctx.scoped(|view| key_selector(view.key(), item, view)) {
                Some(key) => ctx.result_mut().insert(key, item.clone()),
                None => {
                    ctx.result_mut().push(item.clone())?;
                }
            }
            Ok(())
        })
    }

    /// A [`KeyedArray`] keyed by the sequence's own keys.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn to_array_keyed(&mut self) -> Result<KeyedArray<T>>
    where
        K: Into<ArrayKey>,
    {
        self.to_array_with(|key, _, _| Some(key.clone().into()))
    }

    /// Keys to items; a repeated key keeps the last item.
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn to_map(&mut self) -> Result<HashMap<K, T>>
    where
        K: Eq + Hash,
    {
        self.iterate(HashMap::new(), (), |item, ctx| {
            let key = ctx.key().clone();
            ctx.result_mut().insert(key, item.clone());
            Ok(())
        })
    }

    /// Build a map from selected keys and values.
    ///
    /// # Errors
    /// Returns [`SeqError::KeyNotFound`] when two items select the same key.
    pub fn to_dictionary<DK, DV, KF, VF>(&mut self, key: KF, value: VF) -> Result<HashMap<DK, DV>>
    where
        DK: Eq + Hash + fmt::Debug,
        KF: Fn(&T) -> DK,
        VF: Fn(&T) -> DV,
    {
        self.iterate(HashMap::new(), (), |item, ctx| {
            let k = key(item);
            if ctx.result().contains_key(&k) {
                return Err(SeqError::key_not_found(k));
            }
            ctx.result_mut().insert(k, value(item));
            Ok(())
        })
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn to_set(&mut self) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
    {
        self.iterate(HashSet::new(), (), |item, ctx| {
            ctx.result_mut().insert(item.clone());
            Ok(())
        })
    }

    /// Group eagerly into a [`Lookup`].
    ///
    /// # Errors
    /// Propagates upstream failures.
    pub fn to_lookup<GK, F>(&mut self, key: F) -> Result<Lookup<GK, T>>
    where
        GK: Elem + PartialEq,
        F: Fn(&T) -> GK,
    {
        self.to_lookup_with(key, EqualityComparer::structural())
    }

    /// # Errors
    /// Propagates upstream failures.
    pub fn to_lookup_with<GK, F>(&mut self, key: F, eq: EqualityComparer<GK>) -> Result<Lookup<GK, T>>
    where
        GK: Elem,
        F: Fn(&T) -> GK,
    {
        let items = self.to_vec()?;
        let buckets = bucket(items.into_iter().map(|item| (key(&item), item)), &eq);
        trace!(operator = "to_lookup", groups = buckets.len(), "materialized");
        Ok(Lookup::from_buckets(buckets, eq))
    }

    /// The items as a JSON array.
    ///
    /// # Errors
    /// Returns [`SeqError::Json`] when an item fails to serialize.
    pub fn to_json(&mut self) -> Result<String>
    where
        T: Serialize,
    {
        Ok(serde_json::to_string(&self.to_vec()?)?)
    }

    /// The entries as a JSON array or object, see [`KeyedArray`].
    ///
    /// # Errors
    /// Returns [`SeqError::Json`] when an item fails to serialize.
    pub fn to_json_keyed(&mut self) -> Result<String>
    where
        T: Serialize,
        K: Into<ArrayKey>,
    {
        Ok(serde_json::to_string(&self.to_array_keyed()?)?)
    }

    /// # Errors
    /// Returns [`SeqError::Json`] when an item fails to serialize.
    pub fn to_json_with(&mut self, options: JsonOptions) -> Result<String>
    where
        T: Serialize,
        K: Into<ArrayKey>,
    {
        let value = if options.keyed {
            serde_json::to_value(self.to_array_keyed()?)?
        } else {
            serde_json::to_value(self.to_vec()?)?
        };
        let text = if options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }
}

/// Parse JSON text into a keyed sequence.
///
/// Arrays yield `Index` keys, objects yield `Name` keys in document order,
/// `null` yields nothing and any other value yields itself once.
///
/// # Errors
/// Returns [`SeqError::Json`] for malformed input.
pub fn from_json(text: &str) -> Result<Sequence<Value, ArrayKey>> {
    let value: Value = serde_json::from_str(text)?;
    let entries: Vec<(ArrayKey, Value)> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().enumerate().map(|(i, v)| (ArrayKey::Index(i), v)).collect(),
        Value::Object(fields) => fields.into_iter().map(|(k, v)| (ArrayKey::Name(k), v)).collect(),
        scalar => vec![(ArrayKey::Index(0), scalar)],
    };
    Ok(Sequence::from_keyed(entries))
}
