//! The closed set of parse failures.
//!
//! Every variant carries the [`Location`] of the offending byte. String
//! lexing failures additionally preserve the partially-decoded string, so
//! diagnostics can show exactly what was read before the failure. All errors
//! are terminal for the current parse: there is no recovery, and the error is
//! the final item of the token sequence.

use alloc::string::String;

use thiserror::Error;

use crate::location::Location;

/// A terminal failure raised by the tokenizer or the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A byte that does not match any token class currently permitted by the
    /// grammar state.
    #[error("unexpected character (0x{byte:02x}) at {location}")]
    UnexpectedCharacter {
        /// The offending byte.
        byte: u8,
        /// Position of the offending byte.
        location: Location,
    },

    /// The input ended while the grammar still required more bytes.
    #[error("unexpected end of file at {location}")]
    UnexpectedEndOfFile {
        /// Position just past the last input byte.
        location: Location,
    },

    /// A digit followed a bare leading `0` in a number's integer part.
    #[error("number with leading zero at {location}")]
    NumberWithLeadingZero {
        /// Position of the digit after the leading zero.
        location: Location,
    },

    /// A number ended with its exponent marker (or exponent sign) still
    /// awaiting digits.
    #[error("missing exponent digits at {location}")]
    MissingExponent {
        /// Position where the exponent digits were required.
        location: Location,
    },

    /// A `\` escape introduced a byte that is not a valid escape character.
    #[error("unexpected escaped character (0x{byte:02x}) after {partial:?} at {location}")]
    UnexpectedEscapedCharacter {
        /// The byte that followed the backslash.
        byte: u8,
        /// The string decoded before the failure.
        partial: String,
        /// Position of the offending byte.
        location: Location,
    },

    /// A raw control byte (0x00-0x1F) appeared unescaped inside a string.
    #[error("unescaped control character 0x{byte:02x} in string after {partial:?} at {location}")]
    UnescapedControlCharacterInString {
        /// The control byte.
        byte: u8,
        /// The string decoded before the failure.
        partial: String,
        /// Position of the control byte.
        location: Location,
    },

    /// A `\uXXXX` high surrogate was not followed by a `\uXXXX` low
    /// surrogate.
    #[error("expected low surrogate after high surrogate, decoded {partial:?} so far, at {location}")]
    ExpectedLowSurrogateAfterHighSurrogate {
        /// The string decoded before the failure.
        partial: String,
        /// Position where the low surrogate was required.
        location: Location,
    },

    /// A `\uXXXX` unit (or surrogate combination) does not map to a Unicode
    /// scalar value, e.g. a lone low surrogate.
    #[error("could not create unicode scalar from {value:#06x} after {partial:?} at {location}")]
    CouldNotCreateScalarFromSurrogateValue {
        /// The string decoded before the failure.
        partial: String,
        /// The 16-bit (or combined) value that was attempted.
        value: u32,
        /// Position of the escape sequence's last byte.
        location: Location,
    },

    /// A byte inside the four hex digits of a `\uXXXX` escape was not a hex
    /// digit.
    #[error("invalid hex digit sequence {text:?} at {location}")]
    InvalidHexDigitSequence {
        /// The digits read so far, including the offending byte.
        text: String,
        /// Position of the offending byte.
        location: Location,
    },

    /// A `:` appeared where an object key was required.
    #[error("missing object key at {location}")]
    MissingKey {
        /// Position of the colon.
        location: Location,
    },

    /// A `}` or `,` appeared where an object member's value was required.
    #[error("missing object value at {location}")]
    MissingObjectValue {
        /// Position of the offending byte.
        location: Location,
    },

    /// Literal bytes after `t`, `f`, or `n` diverged from `true`, `false`,
    /// or `null`.
    #[error("corrupted literal, expected {expected:?}, at {location}")]
    CorruptedLiteral {
        /// The literal the first byte committed to.
        expected: &'static str,
        /// Position of the diverging byte.
        location: Location,
    },

    /// A bare scalar appeared at the top level in strict mode, where only
    /// `{` or `[` may start a document.
    #[error("JSON fragments are disallowed at {location}")]
    JsonFragmentDisallowed {
        /// Position of the scalar's first byte.
        location: Location,
    },

    /// The scanner walked a whole object without matching the requested key.
    #[error("key not found at {location}")]
    KeyNotFound {
        /// Position where the search ended.
        location: Location,
    },

    /// The scanner walked a whole array without reaching the requested
    /// index.
    #[error("index not found at {location}")]
    IndexNotFound {
        /// Position where the search ended.
        location: Location,
    },

    /// Container nesting exceeded the depth guard (512).
    #[error("too many nested arrays or objects at {location}")]
    TooManyNestedContainers {
        /// Position of the open bracket that exceeded the guard.
        location: Location,
    },
}

impl ParseError {
    /// The source position the failure was raised at.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::UnexpectedCharacter { location, .. }
            | Self::UnexpectedEndOfFile { location }
            | Self::NumberWithLeadingZero { location }
            | Self::MissingExponent { location }
            | Self::UnexpectedEscapedCharacter { location, .. }
            | Self::UnescapedControlCharacterInString { location, .. }
            | Self::ExpectedLowSurrogateAfterHighSurrogate { location, .. }
            | Self::CouldNotCreateScalarFromSurrogateValue { location, .. }
            | Self::InvalidHexDigitSequence { location, .. }
            | Self::MissingKey { location }
            | Self::MissingObjectValue { location }
            | Self::CorruptedLiteral { location, .. }
            | Self::JsonFragmentDisallowed { location }
            | Self::KeyNotFound { location }
            | Self::IndexNotFound { location }
            | Self::TooManyNestedContainers { location } => *location,
        }
    }
}
