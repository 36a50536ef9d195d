//! The tree layer: a generic JSON value built from the token sequence.
//!
//! This is the tokenizer's first consumer. Objects are kept in a `BTreeMap`,
//! so keys are always sorted and duplicate keys resolve to the last write;
//! normalizing an already-built tree is a no-op by construction. Numbers are
//! converted to `f64` here and only here; the tokenizer itself never
//! interprets digit spans.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::reader::ByteSource;
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// A JSON object with sorted keys and last-write-wins duplicates.
pub type Map = BTreeMap<String, Value>;

/// A JSON array.
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// A number, converted from its source span.
    Number(f64),
    /// A string with escapes decoded.
    String(String),
    /// An ordered sequence of values.
    Array(Array),
    /// A key-ordered map of members.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean payload, if this is a [`Boolean`](Value::Boolean).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a [`Number`](Value::Number).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a [`String`](Value::String).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an [`Array`](Value::Array).
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The members, if this is an [`Object`](Value::Object).
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// The member named `key`, if this is an object that has one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// The element at `index`, if this is an array that long.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Builds one value from a token stream, consuming tokens up to and
    /// including the value's last token plus the end-of-input check.
    ///
    /// The tokenizer must be positioned at the start of a value (a freshly
    /// constructed tokenizer always is).
    ///
    /// # Errors
    ///
    /// Any tokenizer error, or [`ParseError::UnexpectedEndOfFile`] for an
    /// empty document.
    ///
    /// # Panics
    ///
    /// If the tokenizer was already driven into the middle of an object, so
    /// that a key or close token arrives with no matching scope here.
    pub fn from_tokenizer<S: ByteSource>(
        tokenizer: &mut Tokenizer<S>,
    ) -> Result<Self, ParseError> {
        enum Scope {
            Array(Array),
            Object(Map, Option<String>),
        }

        let mut stack: Vec<Scope> = Vec::new();
        loop {
            let Some(token) = tokenizer.next_token()? else {
                return Err(ParseError::UnexpectedEndOfFile {
                    location: tokenizer.location(),
                });
            };

            let completed = match token {
                Token::ObjectOpen => {
                    stack.push(Scope::Object(Map::new(), None));
                    continue;
                }
                Token::ArrayOpen => {
                    stack.push(Scope::Array(Array::new()));
                    continue;
                }
                Token::ObjectKey(key) => {
                    let Some(Scope::Object(_, pending)) = stack.last_mut() else {
                        unreachable!("keys are only emitted in object context")
                    };
                    *pending = Some(key);
                    continue;
                }
                Token::ObjectClose => match stack.pop() {
                    Some(Scope::Object(map, _)) => Value::Object(map),
                    _ => unreachable!("closes are matched against the container stack"),
                },
                Token::ArrayClose => match stack.pop() {
                    Some(Scope::Array(array)) => Value::Array(array),
                    _ => unreachable!("closes are matched against the container stack"),
                },
                Token::String(s) => Value::String(s),
                // Verbatim spans match Rust's float grammar, so this parse
                // cannot fail; overflow saturates to infinity.
                Token::Number(span) => Value::Number(span.parse().unwrap_or(0.0)),
                Token::True => Value::Boolean(true),
                Token::False => Value::Boolean(false),
                Token::Null => Value::Null,
            };

            match stack.last_mut() {
                None => {
                    // Root complete; the tokenizer reports trailing content
                    // as an error here.
                    tokenizer.next_token()?;
                    return Ok(completed);
                }
                Some(Scope::Array(array)) => array.push(completed),
                Some(Scope::Object(map, pending)) => {
                    let Some(key) = pending.take() else {
                        unreachable!("a key precedes every object value")
                    };
                    map.insert(key, completed);
                }
            }
        }
    }
}

/// Parses one document from a byte slice into a [`Value`].
///
/// # Errors
///
/// Any [`ParseError`] raised by tokenization.
pub fn parse_slice(bytes: &[u8], options: ParserOptions) -> Result<Value, ParseError> {
    let mut tokenizer = Tokenizer::from_slice(bytes, options);
    Value::from_tokenizer(&mut tokenizer)
}

/// Parses one document from a string into a [`Value`].
///
/// # Errors
///
/// Any [`ParseError`] raised by tokenization.
pub fn parse_str(text: &str, options: ParserOptions) -> Result<Value, ParseError> {
    parse_slice(text.as_bytes(), options)
}

/// Escapes a string for inclusion in a JSON string literal: quotes,
/// backslashes, and control characters become their escape sequences.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(
    src: &str,
    f: &mut W,
) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c if (c as u32) < 0x20 => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => {
                // f64's Display is the shortest representation that parses
                // back to the same value, and never scientific notation.
                f.write_str(&alloc::string::ToString::to_string(&n))
            }
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(array) => {
                f.write_str("[")?;
                let mut first = true;
                for v in array {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
