//! Recursive-descent parser from tokens to an expression tree.
//!
//! Precedence, loosest first: `?:`, `||`, `&&`, `== !=`, `< <= > >=`,
//! `+ -`, `* / %`, unary `! -`, then postfix `.name` and `[index]`.

use super::lexer::{Spanned, Token};
use crate::error::{Result, SeqError};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Not,
    Neg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    fn from_op(op: &str) -> Option<Self> {
        Some(match op {
            "||" => Self::Or,
            "&&" => Self::And,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Literal(Value),
    Param(usize),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// Operator groups from loosest to tightest binding.
const LEVELS: [&[&str]; 6] = [&["||"], &["&&"], &["==", "!="], &["<", "<=", ">", ">="], &["+", "-"], &["*", "/", "%"]];

/// Deepest expression tree, and deepest bracket/unary nesting, the parser accepts.
pub(crate) const MAX_DEPTH: usize = 128;

/// An expression and the height of its tree.
type Parsed = (Expr, usize);

fn too_deep() -> SeqError {
    SeqError::argument("expression nested too deeply")
}

/// Build a node over children of the given heights.
fn node(expr: Expr, children: &[usize]) -> Result<Parsed> {
    let height = children.iter().copied().max().unwrap_or(0) + 1;
    if height > MAX_DEPTH {
        return Err(too_deep());
    }
    Ok((expr, height))
}

pub(crate) struct Parser<'t> {
    tokens: &'t [Spanned],
    at: usize,
    params: Vec<String>,
    source_len: usize,
    nesting: usize,
}

impl<'t> Parser<'t> {
    pub(crate) const fn new(tokens: &'t [Spanned], source_len: usize) -> Self {
        Self {
            tokens,
            at: 0,
            params: Vec::new(),
            source_len,
            nesting: 0,
        }
    }

    /// Parse `params => body`, returning the parameter names and the body.
    pub(crate) fn parse_lambda(mut self) -> Result<(Vec<String>, Expr)> {
        self.parse_params()?;
        self.expect("=>")?;
        let (body, _) = self.parse_expr()?;
        if let Some((token, offset)) = self.tokens.get(self.at) {
            return Err(SeqError::argument(format!("unexpected {token:?} at offset {offset}")));
        }
        Ok((self.params, body))
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.at).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.at).map_or(self.source_len, |(_, o)| *o)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.peek();
        if token.is_some() {
            self.at += 1;
        }
        token
    }

    fn eat(&mut self, op: &str) -> bool {
        if matches!(self.peek(), Some(Token::Op(o)) if *o == op) {
            self.at += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, op: &str) -> Result<()> {
        if self.eat(op) {
            Ok(())
        } else {
            Err(SeqError::argument(format!("expected '{op}' at offset {}", self.offset())))
        }
    }

    fn declare(&mut self, name: &str) -> Result<()> {
        if self.params.iter().any(|p| p == name) {
            return Err(SeqError::argument(format!("duplicate parameter '{name}'")));
        }
        self.params.push(name.to_owned());
        Ok(())
    }

    fn parse_params(&mut self) -> Result<()> {
        if let Some(Token::Ident(name)) = self.peek() {
            self.at += 1;
            return self.declare(name);
        }
        self.expect("(")?;
        if self.eat(")") {
            return Ok(());
        }
        loop {
            match self.next() {
                Some(Token::Ident(name)) => self.declare(name)?,
                _ => return Err(SeqError::argument("expected parameter name")),
            }
            if self.eat(")") {
                return Ok(());
            }
            self.expect(",")?;
        }
    }

    /// Run `parse` one nesting level deeper.
    fn nested<R>(&mut self, parse: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep());
        }
        self.nesting += 1;
        let parsed = parse(self);
        self.nesting -= 1;
        parsed
    }

    fn parse_expr(&mut self) -> Result<Parsed> {
        self.nested(|p| {
            let (cond, hc) = p.parse_binary(0)?;
            if !p.eat("?") {
                return Ok((cond, hc));
            }
            let (then, ht) = p.parse_expr()?;
            p.expect(":")?;
            let (otherwise, ho) = p.parse_expr()?;
            node(
                Expr::Conditional(Box::new(cond), Box::new(then), Box::new(otherwise)),
                &[hc, ht, ho],
            )
        })
    }

    fn parse_binary(&mut self, level: usize) -> Result<Parsed> {
        let Some(ops) = LEVELS.get(level) else {
            return self.parse_unary();
        };
        let (mut lhs, mut height) = self.parse_binary(level + 1)?;
        while let Some(Token::Op(op)) = self.peek() {
            if !ops.contains(op) {
                break;
            }
            let Some(bin) = BinaryOp::from_op(op) else { break };
            self.at += 1;
            let (rhs, hr) = self.parse_binary(level + 1)?;
            (lhs, height) = node(Expr::Binary(bin, Box::new(lhs), Box::new(rhs)), &[height, hr])?;
        }
        Ok((lhs, height))
    }

    fn parse_unary(&mut self) -> Result<Parsed> {
        let op = if self.eat("!") {
            UnaryOp::Not
        } else if self.eat("-") {
            UnaryOp::Neg
        } else {
            return self.parse_postfix();
        };
        let (operand, height) = self.nested(Self::parse_unary)?;
        node(Expr::Unary(op, Box::new(operand)), &[height])
    }

    fn parse_postfix(&mut self) -> Result<Parsed> {
        let (mut expr, mut height) = self.parse_primary()?;
        loop {
            if self.eat(".") {
                match self.next() {
                    Some(Token::Ident(name)) => {
                        (expr, height) = node(Expr::Member(Box::new(expr), name.clone()), &[height])?;
                    }
                    _ => return Err(SeqError::argument("expected member name after '.'")),
                }
            } else if self.eat("[") {
                let (index, hi) = self.parse_expr()?;
                self.expect("]")?;
                (expr, height) = node(Expr::Index(Box::new(expr), Box::new(index)), &[height, hi])?;
            } else {
                return Ok((expr, height));
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Parsed> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Literal(value)) => Ok((Expr::Literal(value.clone()), 1)),
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok((Expr::Literal(Value::Bool(true)), 1)),
                "false" => Ok((Expr::Literal(Value::Bool(false)), 1)),
                "null" => Ok((Expr::Literal(Value::Null), 1)),
                _ => self
                    .params
                    .iter()
                    .position(|p| p == name)
                    .map(|i| (Expr::Param(i), 1))
                    .ok_or_else(|| SeqError::argument(format!("unknown identifier '{name}' at offset {offset}"))),
            },
            Some(Token::Op("(")) => {
                let inner = self.parse_expr()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some(token) => Err(SeqError::argument(format!("unexpected {token:?} at offset {offset}"))),
            None => Err(SeqError::argument("unexpected end of expression")),
        }
    }
}
