//! The number lexer: strict RFC 8259 number grammar over raw bytes.
//!
//! The output is the verbatim source span, never a converted value. The
//! grammar is enforced incrementally with a four-state control-character
//! model: each of `-`, `.`, `e`/`E`, and the exponent sign opens a state that must be satisfied
//! by at least one digit before the next control character or terminator.

use alloc::string::String;

use crate::error::ParseError;
use crate::reader::{ByteSource, Reader};

/// Control character most recently consumed; digits are counted since this
/// state was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlCharacter {
    Operand,
    DecimalPoint,
    Exp,
    ExpOperator,
}

/// Bytes that end a number. The terminator is peeked, never consumed, so it
/// stays available to the grammar state machine (and pushback never has to
/// cross a line break).
const TERMINATORS: [u8; 7] = [b' ', b'\t', b'\n', b'\r', b',', b']', b'}'];

/// Lexes a number whose first byte (`-` or a digit) is at the cursor.
pub(crate) fn lex_number<S: ByteSource>(reader: &mut Reader<S>) -> Result<String, ParseError> {
    let mut span = String::new();
    let mut state = ControlCharacter::Operand;
    let mut digits_since_control = 0usize;
    let mut leading_zero = false;

    if reader.peek(0) == Some(b'-') {
        reader.next();
        span.push('-');
    }

    loop {
        let location = reader.location();
        match reader.peek(0) {
            Some(byte @ b'0'..=b'9') => {
                if leading_zero {
                    return Err(ParseError::NumberWithLeadingZero { location });
                }
                if byte == b'0'
                    && digits_since_control == 0
                    && state == ControlCharacter::Operand
                {
                    leading_zero = true;
                }
                digits_since_control += 1;
                reader.next();
                span.push(char::from(byte));
            }
            Some(b'.') => {
                if digits_since_control == 0 || state != ControlCharacter::Operand {
                    return Err(ParseError::UnexpectedCharacter {
                        byte: b'.',
                        location,
                    });
                }
                leading_zero = false;
                state = ControlCharacter::DecimalPoint;
                digits_since_control = 0;
                reader.next();
                span.push('.');
            }
            Some(byte @ (b'e' | b'E')) => {
                if digits_since_control == 0
                    || matches!(
                        state,
                        ControlCharacter::Exp | ControlCharacter::ExpOperator
                    )
                {
                    return Err(ParseError::UnexpectedCharacter { byte, location });
                }
                leading_zero = false;
                state = ControlCharacter::Exp;
                digits_since_control = 0;
                reader.next();
                span.push(char::from(byte));
            }
            Some(byte @ (b'+' | b'-')) => {
                if state != ControlCharacter::Exp || digits_since_control != 0 {
                    return Err(ParseError::UnexpectedCharacter { byte, location });
                }
                state = ControlCharacter::ExpOperator;
                reader.next();
                span.push(char::from(byte));
            }
            Some(byte) if TERMINATORS.contains(&byte) => {
                if digits_since_control == 0 {
                    return Err(ParseError::UnexpectedCharacter { byte, location });
                }
                return Ok(span);
            }
            Some(byte) => {
                return Err(ParseError::UnexpectedCharacter { byte, location });
            }
            None => {
                if digits_since_control == 0 {
                    return Err(match state {
                        ControlCharacter::Exp | ControlCharacter::ExpOperator => {
                            ParseError::MissingExponent { location }
                        }
                        _ => ParseError::UnexpectedEndOfFile { location },
                    });
                }
                return Ok(span);
            }
        }
    }
}
