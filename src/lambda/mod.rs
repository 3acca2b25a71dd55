//! Textual lambda expressions.
//!
//! A [`Lambda`] is compiled from `params => body` source text into an
//! expression tree and evaluated over [`serde_json::Value`] arguments. Nothing
//! is ever handed to a host evaluator.
//!
//! ```text
//! x => x.price * 2
//! (a, b) => a.name == b.name
//! () => 42
//! p => p.age >= 18 ? "adult" : "minor"
//! ```
//!
//! Supported in the body: number, string, `true`/`false`/`null` literals,
//! parameter names, `a.b` members (`.length` on arrays and strings), `a[i]`
//! indexing, unary `!` and `-`, the binary operators
//! `* / % + - < <= > >= == != && ||`, `c ? a : b` and parentheses.
//!
//! Compiled lambdas plug into the operators through [`Lambda::selector`] and
//! [`Lambda::predicate`], which pass `[item, index]` as arguments:
//!
//! ```
//! use ironseq::{as_callable, Sequence};
//! use serde_json::{json, Value};
//!
//! # fn main() -> ironseq::Result<()> {
//! let adults = as_callable(Some("p => p.age >= 18"))?;
//! let names = as_callable(Some("p => p.name"))?;
//!
//! let people = Sequence::from_vec(vec![
//!     json!({"name": "ann", "age": 34}),
//!     json!({"name": "bob", "age": 12}),
//! ]);
//! let found: Vec<Value> = people
//!     .try_filter(adults.predicate())
//!     .try_map(names.selector())
//!     .to_vec()?;
//! assert_eq!(found, vec![json!("ann")]);
//! # Ok(())
//! # }
//! ```

mod eval;
mod lexer;
mod parser;

use crate::context::ItemContext;
use crate::error::{Result, SeqError};
use parser::{Expr, Parser};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// A compiled `params => body` expression.
#[derive(Clone)]
pub struct Lambda {
    source: Rc<str>,
    params: Rc<[String]>,
    body: Rc<Expr>,
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("source", &self.source)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Lambda {
    /// Compile `source` into an expression tree.
    ///
    /// # Errors
    /// Returns [`SeqError::Format`] for lexical errors and
    /// [`SeqError::Argument`] when the tokens do not form a lambda.
    pub fn compile(source: &str) -> Result<Self> {
        let tokens = lexer::tokenize(source)?;
        let (params, body) = Parser::new(&tokens, source.len()).parse_lambda()?;
        debug!(source, arity = params.len(), "compiled lambda");
        Ok(Self {
            source: source.into(),
            params: params.into(),
            body: Rc::new(body),
        })
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Evaluate with `args` bound by position; extra arguments are ignored
    /// and missing ones are `null`.
    ///
    /// # Errors
    /// Returns [`SeqError::InvalidOperation`] when an operator is applied to
    /// operands it does not support.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        eval::eval(&self.body, args)
    }

    /// Evaluate and interpret the result by truthiness.
    ///
    /// # Errors
    /// See [`call`](Self::call).
    pub fn test(&self, args: &[Value]) -> Result<bool> {
        self.call(args).map(|v| eval::truthy(&v))
    }

    /// A callback for [`try_map`](crate::Sequence::try_map) and friends,
    /// called with `[item, index]`.
    pub fn selector<K: 'static>(&self) -> impl Fn(&Value, &mut ItemContext<'_, K, Value>) -> Result<Value> + 'static {
        let lambda = self.clone();
        move |item: &Value, ctx: &mut ItemContext<'_, K, Value>| lambda.call(&[item.clone(), Value::from(ctx.index())])
    }

    /// A callback for [`try_filter`](crate::Sequence::try_filter), called
    /// with `[item, index]`.
    pub fn predicate<K: 'static>(&self) -> impl Fn(&Value, &mut ItemContext<'_, K, Value>) -> Result<bool> + 'static {
        let lambda = self.clone();
        move |item: &Value, ctx: &mut ItemContext<'_, K, Value>| lambda.test(&[item.clone(), Value::from(ctx.index())])
    }
}

/// Turn an optional expression into a callable.
///
/// # Errors
/// Returns [`SeqError::ArgumentNull`] for `None` or blank text, otherwise the
/// errors of [`Lambda::compile`].
pub fn as_callable(expression: Option<&str>) -> Result<Lambda> {
    match expression.map(str::trim) {
        None | Some("") => Err(SeqError::ArgumentNull { param: "expression" }),
        Some(text) => Lambda::compile(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evaluates_member_and_ternary() -> Result<()> {
        let label = Lambda::compile("p => p.age >= 18 ? 'adult' : 'minor'")?;
        assert_eq!(label.call(&[json!({"age": 20})])?, json!("adult"));
        assert_eq!(label.call(&[json!({"age": 3})])?, json!("minor"));
        Ok(())
    }

    #[test]
    fn or_yields_deciding_operand() -> Result<()> {
        let name = Lambda::compile("x => x.name || 'anon'")?;
        assert_eq!(name.call(&[json!({})])?, json!("anon"));
        Ok(())
    }

    #[test]
    fn blank_expression_is_argument_null() {
        let err = as_callable(Some("   ")).err();
        assert!(err.is_some_and(|e| e.is_argument_null()));
    }
}
