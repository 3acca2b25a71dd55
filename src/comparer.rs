//! Comparers, equality comparers, and the default three-way comparison.
//!
//! Operators that order or match elements take an explicit [`Comparer`] or
//! [`EqualityComparer`]. Both come in three flavours:
//!
//! - the default (`natural` / `structural`), built on `PartialOrd` / `PartialEq`
//! - a binary function (`from_fn`)
//! - a unary key selector (`from_selector`): both operands go through the
//!   selector and the results are compared with the default
//!
//! ```
//! use ironseq::{Comparer, EqualityComparer};
//! use std::cmp::Ordering;
//!
//! let by_len = Comparer::from_selector(|s: &&str| s.len());
//! assert_eq!(by_len.compare(&"abc", &"zz"), Ordering::Greater);
//!
//! let ci = EqualityComparer::from_selector(|s: &&str| s.to_lowercase());
//! assert!(ci.equals(&"Rust", &"rUST"));
//! ```

use ordered_float::OrderedFloat;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Three-way comparison with the fallback used when no comparer is given.
///
/// The element's own ordering wins. A value that is not comparable with
/// itself (a float NaN) sorts after every other value, the way
/// `OrderedFloat` places NaN; two such values are equal. Any other
/// incomparable pair is treated as equal.
pub fn default_compare<T: PartialOrd + ?Sized>(a: &T, b: &T) -> Ordering {
    match a.partial_cmp(b) {
        Some(ordering) => ordering,
        None => {
            let unordered = |v: &T| v.partial_cmp(v).is_none();
            unordered(a).cmp(&unordered(b))
        }
    }
}

/// Total order over JSON values.
///
/// Values of different kinds order as `null < bool < number < string < array <
/// object`. Numbers compare numerically, strings lexically, arrays
/// element-wise. Objects compare by size, then entry by entry in key order.
#[must_use]
pub fn compare_json(a: &Value, b: &Value) -> Ordering {
    const fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = OrderedFloat(x.as_f64().unwrap_or(f64::NAN));
            let y = OrderedFloat(y.as_f64().unwrap_or(f64::NAN));
            x.cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(l, r)| compare_json(l, r))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()).then_with(|| {
            let mut xs: Vec<_> = x.iter().collect();
            let mut ys: Vec<_> = y.iter().collect();
            xs.sort_unstable_by(|l, r| l.0.cmp(r.0));
            ys.sort_unstable_by(|l, r| l.0.cmp(r.0));
            xs.into_iter()
                .zip(ys)
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| compare_json(va, vb)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        }),
        _ => rank(a).cmp(&rank(b)),
    }
}

/* ===================== Comparer ===================== */

/// A shared three-way comparison over `T`.
pub struct Comparer<T: ?Sized>(Rc<dyn Fn(&T, &T) -> Ordering>);

impl<T: ?Sized> Clone for Comparer<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Comparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparer(..)")
    }
}

impl<T: ?Sized + 'static> Comparer<T> {
    /// Wrap a three-way comparison.
    ///
    /// `f` must be a total order: sorting with an inconsistent comparison may
    /// panic or leave the elements in an unspecified order.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        Self(Rc::new(f))
    }

    /// Compare the selected keys with [`default_compare`].
    pub fn from_selector<U, F>(selector: F) -> Self
    where
        U: PartialOrd,
        F: Fn(&T) -> U + 'static,
    {
        Self::from_fn(move |a, b| default_compare(&selector(a), &selector(b)))
    }

    #[must_use]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        Self::from_fn(move |a, b| self.compare(a, b).reverse())
    }

    /// Break ties of `self` with `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self::from_fn(move |a, b| self.compare(a, b).then_with(|| next.compare(a, b)))
    }
}

impl<T: PartialOrd + ?Sized + 'static> Comparer<T> {
    #[must_use]
    pub fn natural() -> Self {
        Self::from_fn(default_compare)
    }
}

impl Comparer<Value> {
    #[must_use]
    pub fn json() -> Self {
        Self::from_fn(compare_json)
    }
}

impl<T: PartialOrd + ?Sized + 'static> Default for Comparer<T> {
    fn default() -> Self {
        Self::natural()
    }
}

/* ===================== EqualityComparer ===================== */

/// A shared equality test over `T`.
pub struct EqualityComparer<T: ?Sized>(Rc<dyn Fn(&T, &T) -> bool>);

impl<T: ?Sized> Clone for EqualityComparer<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for EqualityComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EqualityComparer(..)")
    }
}

impl<T: ?Sized + 'static> EqualityComparer<T> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self(Rc::new(f))
    }

    /// Two values are equal when their selected keys are.
    pub fn from_selector<U, F>(selector: F) -> Self
    where
        U: PartialEq,
        F: Fn(&T) -> U + 'static,
    {
        Self::from_fn(move |a, b| selector(a) == selector(b))
    }

    #[must_use]
    pub fn equals(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<T: PartialEq + ?Sized + 'static> EqualityComparer<T> {
    #[must_use]
    pub fn structural() -> Self {
        Self::from_fn(|a, b| a == b)
    }
}

impl<T: PartialEq + ?Sized + 'static> Default for EqualityComparer<T> {
    fn default() -> Self {
        Self::structural()
    }
}
