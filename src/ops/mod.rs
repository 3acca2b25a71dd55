//! Operators on [`Sequence`](crate::Sequence).
//!
//! - [`lazy`] - element-wise operators that pull one element per request
//! - [`set`] - distinct / union / except / intersect
//! - [`terminal`] - operators that drive the sequence and return a value
//!
//! Operators that need to see every element before emitting the first one
//! (set, grouping, join, ordering) are built on [`DeferredCursor`]: nothing is
//! computed until the first pull, and the computed entries are buffered so the
//! result can be rewound without recomputing.

pub mod lazy;
pub mod set;
pub mod terminal;

use crate::cursor::{ArrayCursor, BoxCursor, Cursor, Position};
use crate::error::Result;
use crate::sequence::Sequence;
use crate::Elem;
use std::rc::Rc;
use tracing::trace;

type Build<K0, T0, K, T> = Rc<dyn Fn(&mut Position<K0, T0>) -> Result<Vec<(K, T)>>>;

/// Cursor that materializes its output from a source position on first pull.
pub(crate) struct DeferredCursor<K0, T0, K, T> {
    source: Position<K0, T0>,
    build: Build<K0, T0, K, T>,
    buffer: Option<ArrayCursor<K, T>>,
    label: &'static str,
}

impl<K0: Elem, T0: Elem, K: Elem, T: Elem> Cursor for DeferredCursor<K0, T0, K, T> {
    type Key = K;
    type Item = T;

    fn pull(&mut self) -> Result<Option<(K, T)>> {
        if self.buffer.is_none() {
            let entries = (self.build)(&mut self.source)?;
            trace!(operator = self.label, entries = entries.len(), "materialized");
            self.buffer = Some(ArrayCursor::keyed(entries));
        }
        match self.buffer.as_mut() {
            Some(buffer) => buffer.pull(),
            None => Ok(None),
        }
    }

    fn reset(&mut self) -> Result<()> {
        match self.buffer.as_mut() {
            Some(buffer) => buffer.reset(),
            None => self.source.reset(),
        }
    }

    fn can_reset(&self) -> bool {
        self.buffer.is_some() || self.source.can_reset()
    }

    fn fork(&self) -> Option<BoxCursor<K, T>> {
        if let Some(buffer) = &self.buffer {
            return buffer.fork();
        }
        let source = self.source.fork()?;
        Some(Box::new(Self {
            source,
            build: Rc::clone(&self.build),
            buffer: None,
            label: self.label,
        }))
    }
}

impl<T: Elem, K: Elem> Sequence<T, K> {
    /// A sequence whose entries are computed from this one in a single pass,
    /// on first demand.
    pub(crate) fn deferred<K2, T2, F>(self, label: &'static str, build: F) -> Sequence<T2, K2>
    where
        K2: Elem,
        T2: Elem,
        F: Fn(&mut Position<K, T>) -> Result<Vec<(K2, T2)>> + 'static,
    {
        Sequence::from_cursor(DeferredCursor {
            source: self.into_position(),
            build: Rc::new(build),
            buffer: None,
            label,
        })
    }
}

/// Drain a position into a vector of entries.
pub(crate) fn drain<K: 'static, T: 'static>(pos: &mut Position<K, T>) -> Result<Vec<(K, T)>> {
    let mut entries = Vec::new();
    while let Some(entry) = pos.take()? {
        entries.push(entry);
    }
    Ok(entries)
}
