//! Path-based extraction of sub-document byte ranges.
//!
//! The scanner performs the tokenizer's grammar walk over an in-memory
//! buffer without emitting tokens: values that are not on the requested path
//! are skipped structurally (matching brace depth, validating strings and
//! numbers with the same scalar lexers), so a sub-value can be located
//! without building a tree. The resulting byte range can be handed to any
//! decoder as a standalone document.
//!
//! The walk is fully synchronous and holds no state across calls; each
//! [`Scanner::locate`] owns its own cursor and stack frame.

use alloc::string::String;
use core::ops::Range;

use crate::error::ParseError;
use crate::literal::lex_literal;
use crate::numbers::lex_number;
use crate::options::ParserOptions;
use crate::reader::{Reader, SliceBytes};
use crate::strings::lex_string;
use crate::tokenizer::MAX_NESTING_DEPTH;

/// One step of a scanner path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Match the object member with this key.
    Key(String),
    /// Match the array element at this 0-based index.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.into())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Builds a `Vec<PathSegment>` from a heterogeneous list of keys and
/// indices.
///
/// ```
/// use jsonlex::{PathSegment, path};
///
/// let p = path!["a", "b", 1];
/// assert_eq!(
///     p,
///     vec![
///         PathSegment::Key("a".into()),
///         PathSegment::Key("b".into()),
///         PathSegment::Index(1),
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {
        $crate::vec![$($crate::PathSegment::from($elem)),*]
    };
}

/// Locates byte ranges of sub-values within a buffered document.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    options: ParserOptions,
}

impl<'a> Scanner<'a> {
    /// Scanner over a fully-buffered document.
    #[must_use]
    pub fn new(buf: &'a [u8], options: ParserOptions) -> Self {
        Self { buf, options }
    }

    /// Walks to the value at `path` and returns its byte range within the
    /// buffer, without materializing anything.
    ///
    /// An empty path spans the whole document value (whitespace excluded).
    ///
    /// # Errors
    ///
    /// The tokenizer's grammar errors, plus [`ParseError::KeyNotFound`] /
    /// [`ParseError::IndexNotFound`] when the path does not match, and
    /// [`ParseError::TooManyNestedContainers`] past 512 levels of nesting.
    pub fn locate(&self, path: &[PathSegment]) -> Result<Range<usize>, ParseError> {
        let mut walk = Walk {
            reader: Reader::new(self.buf.iter().copied()),
            strict: self.options.strict,
        };

        walk.reader.skip_whitespace();
        if walk.strict {
            let location = walk.reader.location();
            if !matches!(walk.reader.peek(0), Some(b'{' | b'[') | None) {
                return Err(ParseError::JsonFragmentDisallowed { location });
            }
        }

        for segment in path {
            match segment {
                PathSegment::Key(key) => walk.seek_key(key)?,
                PathSegment::Index(index) => walk.seek_index(*index)?,
            }
        }

        walk.reader.skip_whitespace();
        let start = walk.reader.location().index;
        walk.skip_value(0)?;
        let end = walk.reader.location().index;
        Ok(start..end)
    }
}

/// Returns the sub-slice of `buf` holding the value at `path`.
///
/// Convenience over [`Scanner::locate`]; see there for error behavior.
///
/// ```
/// use jsonlex::{ParserOptions, extract, path};
///
/// let doc = br#"{"a": {"b": [10, 20, 30]}}"#;
/// let span = extract(doc, &path!["a", "b", 1], ParserOptions::default()).unwrap();
/// assert_eq!(span, b"20");
/// ```
///
/// # Errors
///
/// Any [`ParseError`] raised by the walk.
pub fn extract<'a>(
    buf: &'a [u8],
    path: &[PathSegment],
    options: ParserOptions,
) -> Result<&'a [u8], ParseError> {
    let range = Scanner::new(buf, options).locate(path)?;
    Ok(&buf[range])
}

/// One in-flight walk: the cursor plus the mode flag.
struct Walk<'a> {
    reader: Reader<SliceBytes<'a>>,
    strict: bool,
}

impl Walk<'_> {
    /// Enters the object at the cursor and stops at the value of the member
    /// named `key`.
    fn seek_key(&mut self, key: &str) -> Result<(), ParseError> {
        self.reader.skip_whitespace();
        let location = self.reader.location();
        match self.reader.next() {
            Some(b'{') => {}
            Some(_) => return Err(ParseError::KeyNotFound { location }),
            None => return Err(ParseError::UnexpectedEndOfFile { location }),
        }

        let mut after_comma = false;
        loop {
            self.reader.skip_whitespace();
            let location = self.reader.location();
            match self.reader.next() {
                Some(b'"') => {
                    let name = lex_string(&mut self.reader)?;
                    self.expect_colon()?;
                    self.require_member_value()?;
                    if name == key {
                        return Ok(());
                    }
                    self.skip_value(0)?;
                    let location = self.next_member(b'}')?;
                    if let Some(location) = location {
                        return Err(ParseError::KeyNotFound { location });
                    }
                    after_comma = true;
                }
                Some(b'}') => {
                    if after_comma && self.strict {
                        return Err(ParseError::UnexpectedCharacter {
                            byte: b'}',
                            location,
                        });
                    }
                    return Err(ParseError::KeyNotFound { location });
                }
                Some(b':') => return Err(ParseError::MissingKey { location }),
                Some(byte) => return Err(ParseError::UnexpectedCharacter { byte, location }),
                None => return Err(ParseError::UnexpectedEndOfFile { location }),
            }
        }
    }

    /// Enters the array at the cursor and stops at the element at `target`.
    fn seek_index(&mut self, target: usize) -> Result<(), ParseError> {
        self.reader.skip_whitespace();
        let location = self.reader.location();
        match self.reader.next() {
            Some(b'[') => {}
            Some(_) => return Err(ParseError::IndexNotFound { location }),
            None => return Err(ParseError::UnexpectedEndOfFile { location }),
        }

        let mut index = 0;
        let mut after_comma = false;
        loop {
            self.reader.skip_whitespace();
            let location = self.reader.location();
            match self.reader.peek(0) {
                None => return Err(ParseError::UnexpectedEndOfFile { location }),
                Some(b']') => {
                    self.reader.next();
                    if after_comma && self.strict {
                        return Err(ParseError::UnexpectedCharacter {
                            byte: b']',
                            location,
                        });
                    }
                    return Err(ParseError::IndexNotFound { location });
                }
                Some(_) => {
                    if index == target {
                        return Ok(());
                    }
                    self.skip_value(0)?;
                    let location = self.next_member(b']')?;
                    if let Some(location) = location {
                        return Err(ParseError::IndexNotFound { location });
                    }
                    index += 1;
                    after_comma = true;
                }
            }
        }
    }

    /// Consumes the separator after a member or element. Returns
    /// `Ok(Some(location))` if the container closed instead (`close` is its
    /// closing bracket).
    fn next_member(&mut self, close: u8) -> Result<Option<crate::Location>, ParseError> {
        self.reader.skip_whitespace();
        let location = self.reader.location();
        match self.reader.next() {
            Some(b',') => Ok(None),
            Some(byte) if byte == close => Ok(Some(location)),
            Some(byte) => Err(ParseError::UnexpectedCharacter { byte, location }),
            None => Err(ParseError::UnexpectedEndOfFile { location }),
        }
    }

    fn expect_colon(&mut self) -> Result<(), ParseError> {
        self.reader.skip_whitespace();
        let location = self.reader.location();
        match self.reader.next() {
            Some(b':') => Ok(()),
            Some(byte) => Err(ParseError::UnexpectedCharacter { byte, location }),
            None => Err(ParseError::UnexpectedEndOfFile { location }),
        }
    }

    /// A `}` or `,` directly after a member's colon has no value to skip.
    fn require_member_value(&mut self) -> Result<(), ParseError> {
        self.reader.skip_whitespace();
        let location = self.reader.location();
        match self.reader.peek(0) {
            Some(b'}' | b',') => Err(ParseError::MissingObjectValue { location }),
            _ => Ok(()),
        }
    }

    /// Skips one whole value structurally. `depth` counts containers already
    /// open within this skip.
    fn skip_value(&mut self, depth: usize) -> Result<(), ParseError> {
        self.reader.skip_whitespace();
        let location = self.reader.location();
        let Some(byte) = self.reader.next() else {
            return Err(ParseError::UnexpectedEndOfFile { location });
        };
        match byte {
            b'{' => self.skip_object(depth, location),
            b'[' => self.skip_array(depth, location),
            b'"' => lex_string(&mut self.reader).map(drop),
            b't' | b'f' | b'n' => lex_literal(&mut self.reader, byte).map(drop),
            b'-' | b'0'..=b'9' => {
                self.reader.push_back(byte);
                lex_number(&mut self.reader).map(drop)
            }
            _ => Err(ParseError::UnexpectedCharacter { byte, location }),
        }
    }

    fn skip_object(&mut self, depth: usize, open: crate::Location) -> Result<(), ParseError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooManyNestedContainers { location: open });
        }
        let mut after_comma = false;
        loop {
            self.reader.skip_whitespace();
            let location = self.reader.location();
            match self.reader.next() {
                Some(b'}') => {
                    if after_comma && self.strict {
                        return Err(ParseError::UnexpectedCharacter {
                            byte: b'}',
                            location,
                        });
                    }
                    return Ok(());
                }
                Some(b'"') => {
                    lex_string(&mut self.reader)?;
                    self.expect_colon()?;
                    self.require_member_value()?;
                    self.skip_value(depth + 1)?;
                    if self.next_member(b'}')?.is_some() {
                        return Ok(());
                    }
                    after_comma = true;
                }
                Some(b':') => return Err(ParseError::MissingKey { location }),
                Some(byte) => return Err(ParseError::UnexpectedCharacter { byte, location }),
                None => return Err(ParseError::UnexpectedEndOfFile { location }),
            }
        }
    }

    fn skip_array(&mut self, depth: usize, open: crate::Location) -> Result<(), ParseError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooManyNestedContainers { location: open });
        }
        let mut after_comma = false;
        loop {
            self.reader.skip_whitespace();
            let location = self.reader.location();
            match self.reader.peek(0) {
                None => return Err(ParseError::UnexpectedEndOfFile { location }),
                Some(b']') => {
                    self.reader.next();
                    if after_comma && self.strict {
                        return Err(ParseError::UnexpectedCharacter {
                            byte: b']',
                            location,
                        });
                    }
                    return Ok(());
                }
                Some(_) => {
                    self.skip_value(depth + 1)?;
                    if self.next_member(b']')?.is_some() {
                        return Ok(());
                    }
                    after_comma = true;
                }
            }
        }
    }
}
