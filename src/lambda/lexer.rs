//! Tokenizer for lambda source text.

use crate::error::{Result, SeqError};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

static TOKEN: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?P<num>\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)",
        r#"|(?P<str>"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')"#,
        r"|(?P<ident>[A-Za-z_$][A-Za-z0-9_$]*)",
        r"|(?P<op>=>|==|!=|<=|>=|&&|\|\||[-+*/%<>!?:.,()\[\]])",
        r")",
    ))
});

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Literal(Value),
    Ident(String),
    Op(&'static str),
}

/// A token and the byte offset it starts at.
pub(crate) type Spanned = (Token, usize);

const OPS: [&str; 23] = [
    "=>", "==", "!=", "<=", ">=", "&&", "||", "-", "+", "*", "/", "%", "<", ">", "!", "?", ":", ".", ",", "(", ")",
    "[", "]",
];

fn intern(op: &str) -> Option<&'static str> {
    OPS.iter().copied().find(|known| *known == op)
}

fn number(text: &str, position: usize) -> Result<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Ok(Value::from(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| SeqError::format(format!("number out of range: {text}"), position))
}

fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Split `source` into tokens.
///
/// # Errors
/// Returns [`SeqError::Format`] at the offset of the first unrecognized
/// character.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>> {
    let re = TOKEN.as_ref().map_err(|e| SeqError::format(e.to_string(), 0))?;
    let mut tokens = Vec::new();
    let mut offset = 0;

    loop {
        let rest = &source[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }
        let Some(caps) = re.captures(trimmed) else {
            let found = trimmed.chars().next().unwrap_or(' ');
            return Err(SeqError::format(format!("unexpected character '{found}'"), offset));
        };
        let token = if let Some(m) = caps.name("num") {
            Token::Literal(number(m.as_str(), offset)?)
        } else if let Some(m) = caps.name("str") {
            Token::Literal(Value::String(unquote(m.as_str())))
        } else if let Some(m) = caps.name("ident") {
            Token::Ident(m.as_str().to_owned())
        } else if let Some(m) = caps.name("op") {
            let op = intern(m.as_str()).ok_or_else(|| SeqError::format("unknown operator", offset))?;
            Token::Op(op)
        } else {
            return Err(SeqError::format("unrecognized token", offset));
        };
        tokens.push((token, offset));
        offset += caps.get(0).map_or(1, |m| m.len());
    }
    Ok(tokens)
}
