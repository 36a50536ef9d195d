//! The grammar state machine: a pull iterator over tokens.
//!
//! The tokenizer tracks two pieces of state between calls: the set of token
//! classes legally expected next (the [`Awaiting`] enum) and the stack of
//! open containers. Each call to [`Tokenizer::next_token`] consumes input up
//! to exactly the next emitted token, the terminal error, or end-of-input.
//! Separator punctuation is validated in place and consumed silently.
//!
//! The machine is resumable but not re-entrant: it is driven by a single
//! caller, and suspension happens only inside the byte source's `pull`.
//! After a terminal error the sequence has ended; further calls report
//! end-of-input.

use alloc::vec::Vec;

use crate::error::ParseError;
use crate::literal::lex_literal;
use crate::location::Location;
use crate::numbers::lex_number;
use crate::options::ParserOptions;
use crate::reader::{ByteSource, Reader, SliceBytes};
use crate::strings::lex_string;
use crate::token::Token;

/// Containers deeper than this fail with
/// [`ParseError::TooManyNestedContainers`], bounding stack growth on
/// adversarial input.
pub(crate) const MAX_NESTING_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// Token classes permitted at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    TopLevel,
    ObjectKeyOrClose,
    ObjectKey,
    KeyValueSeparator,
    ObjectValue,
    ObjectSeparatorOrClose,
    ArrayValueOrClose,
    ArrayValue,
    ArraySeparatorOrClose,
    End,
}

/// A pull-based JSON tokenizer over a [`ByteSource`].
///
/// Implements `Iterator<Item = Result<Token, ParseError>>`; the error, if
/// any, is the final item. See the crate docs for an example.
pub struct Tokenizer<S> {
    reader: Reader<S>,
    stack: Vec<Container>,
    awaiting: Awaiting,
    strict: bool,
    failed: bool,
}

impl<'a> Tokenizer<SliceBytes<'a>> {
    /// Tokenizer over a fully-buffered document.
    #[must_use]
    pub fn from_slice(bytes: &'a [u8], options: ParserOptions) -> Self {
        Self::new(bytes.iter().copied(), options)
    }

    /// Tokenizer over a string document.
    #[must_use]
    pub fn from_str(text: &'a str, options: ParserOptions) -> Self {
        Self::from_slice(text.as_bytes(), options)
    }
}

impl<S: ByteSource> Tokenizer<S> {
    /// Tokenizer over an arbitrary byte source, e.g. an incremental stream.
    ///
    /// A source that is cancelled mid-document should return `None` from
    /// then on; the tokenizer treats that as end-of-input (reporting
    /// [`ParseError::UnexpectedEndOfFile`] only if the grammar was
    /// mid-value) and never retries a read.
    pub fn new(source: S, options: ParserOptions) -> Self {
        Self {
            reader: Reader::new(source),
            stack: Vec::new(),
            awaiting: Awaiting::TopLevel,
            strict: options.strict,
            failed: false,
        }
    }

    /// Position of the next unconsumed byte.
    pub fn location(&self) -> Location {
        self.reader.location()
    }

    /// Advances to the next token.
    ///
    /// Returns `Ok(None)` at the end of a complete document (or of an empty
    /// one). After an error has been returned the sequence has terminated,
    /// and all further calls return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`]; all errors are terminal for this tokenizer.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if self.failed {
            return Ok(None);
        }
        let result = self.advance();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            self.reader.skip_whitespace();
            let location = self.reader.location();
            let Some(byte) = self.reader.next() else {
                return self.end_of_input(location);
            };

            match self.awaiting {
                Awaiting::TopLevel => match byte {
                    b'{' => return self.open_object(location),
                    b'[' => return self.open_array(location),
                    _ if self.strict => {
                        return Err(ParseError::JsonFragmentDisallowed { location });
                    }
                    _ => {
                        let token = self.lex_scalar(byte, location)?;
                        self.awaiting = Awaiting::End;
                        return Ok(Some(token));
                    }
                },

                Awaiting::ObjectKeyOrClose => match byte {
                    b'"' => return self.object_key(),
                    b'}' => return self.close_object(),
                    b':' => return Err(ParseError::MissingKey { location }),
                    _ => return Err(ParseError::UnexpectedCharacter { byte, location }),
                },

                Awaiting::ObjectKey => match byte {
                    b'"' => return self.object_key(),
                    b':' => return Err(ParseError::MissingKey { location }),
                    _ => return Err(ParseError::UnexpectedCharacter { byte, location }),
                },

                Awaiting::KeyValueSeparator => match byte {
                    b':' => self.awaiting = Awaiting::ObjectValue,
                    _ => return Err(ParseError::UnexpectedCharacter { byte, location }),
                },

                Awaiting::ObjectValue => match byte {
                    b'{' => return self.open_object(location),
                    b'[' => return self.open_array(location),
                    b'}' | b',' => return Err(ParseError::MissingObjectValue { location }),
                    _ => {
                        let token = self.lex_scalar(byte, location)?;
                        self.awaiting = Awaiting::ObjectSeparatorOrClose;
                        return Ok(Some(token));
                    }
                },

                Awaiting::ObjectSeparatorOrClose => match byte {
                    b',' => {
                        self.awaiting = if self.strict {
                            Awaiting::ObjectKey
                        } else {
                            Awaiting::ObjectKeyOrClose
                        };
                    }
                    b'}' => return self.close_object(),
                    _ => return Err(ParseError::UnexpectedCharacter { byte, location }),
                },

                Awaiting::ArrayValueOrClose => match byte {
                    b']' => return self.close_array(),
                    b'{' => return self.open_object(location),
                    b'[' => return self.open_array(location),
                    _ => {
                        let token = self.lex_scalar(byte, location)?;
                        self.awaiting = Awaiting::ArraySeparatorOrClose;
                        return Ok(Some(token));
                    }
                },

                Awaiting::ArrayValue => match byte {
                    b'{' => return self.open_object(location),
                    b'[' => return self.open_array(location),
                    // Covers the trailing comma before `]` in strict mode.
                    b']' => return Err(ParseError::UnexpectedCharacter { byte, location }),
                    _ => {
                        let token = self.lex_scalar(byte, location)?;
                        self.awaiting = Awaiting::ArraySeparatorOrClose;
                        return Ok(Some(token));
                    }
                },

                Awaiting::ArraySeparatorOrClose => match byte {
                    b',' => {
                        self.awaiting = if self.strict {
                            Awaiting::ArrayValue
                        } else {
                            Awaiting::ArrayValueOrClose
                        };
                    }
                    b']' => return self.close_array(),
                    _ => return Err(ParseError::UnexpectedCharacter { byte, location }),
                },

                Awaiting::End => {
                    return Err(ParseError::UnexpectedCharacter { byte, location });
                }
            }
        }
    }

    fn end_of_input(&self, location: Location) -> Result<Option<Token>, ParseError> {
        match self.awaiting {
            // A complete document, or no document at all.
            Awaiting::End | Awaiting::TopLevel => Ok(None),
            _ => Err(ParseError::UnexpectedEndOfFile { location }),
        }
    }

    fn lex_scalar(&mut self, byte: u8, location: Location) -> Result<Token, ParseError> {
        match byte {
            b'"' => Ok(Token::String(lex_string(&mut self.reader)?)),
            b't' | b'f' | b'n' => lex_literal(&mut self.reader, byte),
            b'-' | b'0'..=b'9' => {
                // Hand the first byte back so the number lexer sees the whole
                // span; a digit or minus is never a newline, so pushback
                // stays within the line.
                self.reader.push_back(byte);
                Ok(Token::Number(lex_number(&mut self.reader)?))
            }
            _ => Err(ParseError::UnexpectedCharacter { byte, location }),
        }
    }

    fn object_key(&mut self) -> Result<Option<Token>, ParseError> {
        let key = lex_string(&mut self.reader)?;
        self.awaiting = Awaiting::KeyValueSeparator;
        Ok(Some(Token::ObjectKey(key)))
    }

    fn open_object(&mut self, location: Location) -> Result<Option<Token>, ParseError> {
        self.push_container(Container::Object, location)?;
        self.awaiting = Awaiting::ObjectKeyOrClose;
        Ok(Some(Token::ObjectOpen))
    }

    fn open_array(&mut self, location: Location) -> Result<Option<Token>, ParseError> {
        self.push_container(Container::Array, location)?;
        self.awaiting = Awaiting::ArrayValueOrClose;
        Ok(Some(Token::ArrayOpen))
    }

    fn push_container(
        &mut self,
        container: Container,
        location: Location,
    ) -> Result<(), ParseError> {
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooManyNestedContainers { location });
        }
        self.stack.push(container);
        Ok(())
    }

    fn close_object(&mut self) -> Result<Option<Token>, ParseError> {
        let top = self.stack.pop();
        debug_assert_eq!(top, Some(Container::Object));
        self.awaiting = self.after_value();
        Ok(Some(Token::ObjectClose))
    }

    fn close_array(&mut self) -> Result<Option<Token>, ParseError> {
        let top = self.stack.pop();
        debug_assert_eq!(top, Some(Container::Array));
        self.awaiting = self.after_value();
        Ok(Some(Token::ArrayClose))
    }

    /// The awaiting state once a value has been produced, per the enclosing
    /// container.
    fn after_value(&self) -> Awaiting {
        match self.stack.last() {
            Some(Container::Object) => Awaiting::ObjectSeparatorOrClose,
            Some(Container::Array) => Awaiting::ArraySeparatorOrClose,
            None => Awaiting::End,
        }
    }
}

impl<S: ByteSource> Iterator for Tokenizer<S> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
