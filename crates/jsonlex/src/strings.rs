//! The string lexer: quote-delimited content with escape decoding.
//!
//! The reader is positioned just past the opening quote on entry. Unescaped
//! ASCII is copied byte-wise; multi-byte sequences are decoded with
//! [`bstr::decode_utf8`] (invalid sequences become U+FFFD rather than
//! aborting the parse, since the grammar itself is not violated). Every
//! failure preserves the string decoded so far, so diagnostics can show what
//! was read before the offending byte.

use alloc::string::String;
use core::mem;

use crate::error::ParseError;
use crate::escape::HexEscapeBuffer;
use crate::reader::{ByteSource, Reader};

const HIGH_SURROGATES: core::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Lexes the remainder of a string whose opening quote has been consumed,
/// returning the decoded content (without quotes).
pub(crate) fn lex_string<S: ByteSource>(reader: &mut Reader<S>) -> Result<String, ParseError> {
    let mut out = String::new();

    loop {
        let location = reader.location();
        let Some(byte) = reader.next() else {
            return Err(ParseError::UnexpectedEndOfFile { location });
        };
        match byte {
            b'"' => return Ok(out),
            b'\\' => lex_escape(reader, &mut out)?,
            0x00..=0x1F => {
                return Err(ParseError::UnescapedControlCharacterInString {
                    byte,
                    partial: out,
                    location,
                });
            }
            0x20..=0x7F => out.push(char::from(byte)),
            _ => push_multibyte(reader, byte, &mut out),
        }
    }
}

/// Resolves one escape sequence; the `\` has been consumed.
fn lex_escape<S: ByteSource>(
    reader: &mut Reader<S>,
    out: &mut String,
) -> Result<(), ParseError> {
    let location = reader.location();
    let Some(byte) = reader.next() else {
        return Err(ParseError::UnexpectedEndOfFile { location });
    };
    match byte {
        b'"' => out.push('"'),
        b'\\' => out.push('\\'),
        b'/' => out.push('/'),
        b'b' => out.push('\u{0008}'),
        b'f' => out.push('\u{000C}'),
        b'n' => out.push('\n'),
        b'r' => out.push('\r'),
        b't' => out.push('\t'),
        b'u' => return lex_unicode_escape(reader, out),
        _ => {
            return Err(ParseError::UnexpectedEscapedCharacter {
                byte,
                partial: mem::take(out),
                location,
            });
        }
    }
    Ok(())
}

/// Decodes `\uXXXX`, pairing surrogates where required; the `\u` prefix has
/// been consumed.
fn lex_unicode_escape<S: ByteSource>(
    reader: &mut Reader<S>,
    out: &mut String,
) -> Result<(), ParseError> {
    let unit = read_hex_unit(reader)?;
    let location = reader.location();

    if HIGH_SURROGATES.contains(&unit) {
        // The only legal continuation is an immediate `\u` low surrogate.
        if reader.peek(0) != Some(b'\\') || reader.peek(1) != Some(b'u') {
            return Err(ParseError::ExpectedLowSurrogateAfterHighSurrogate {
                partial: mem::take(out),
                location,
            });
        }
        reader.next();
        reader.next();
        let low = read_hex_unit(reader)?;
        if !LOW_SURROGATES.contains(&low) {
            return Err(ParseError::ExpectedLowSurrogateAfterHighSurrogate {
                partial: mem::take(out),
                location,
            });
        }
        let value = 0x10000 + (u32::from(unit) - 0xD800) * 0x400 + (u32::from(low) - 0xDC00);
        push_scalar(reader, out, value)
    } else {
        push_scalar(reader, out, u32::from(unit))
    }
}

fn push_scalar<S: ByteSource>(
    reader: &mut Reader<S>,
    out: &mut String,
    value: u32,
) -> Result<(), ParseError> {
    match char::from_u32(value) {
        Some(ch) => {
            out.push(ch);
            Ok(())
        }
        // A lone low surrogate, or any unit with no scalar mapping.
        None => Err(ParseError::CouldNotCreateScalarFromSurrogateValue {
            partial: mem::take(out),
            value,
            location: reader.location(),
        }),
    }
}

/// Reads exactly four hex digits into one UTF-16 code unit.
fn read_hex_unit<S: ByteSource>(reader: &mut Reader<S>) -> Result<u16, ParseError> {
    let mut buf = HexEscapeBuffer::new();
    loop {
        let location = reader.location();
        let Some(byte) = reader.next() else {
            return Err(ParseError::UnexpectedEndOfFile { location });
        };
        match buf.feed(byte) {
            Ok(Some(unit)) => return Ok(unit),
            Ok(None) => {}
            Err(text) => return Err(ParseError::InvalidHexDigitSequence { text, location }),
        }
    }
}

/// Decodes one multi-byte UTF-8 sequence whose lead byte has been consumed.
fn push_multibyte<S: ByteSource>(reader: &mut Reader<S>, lead: u8, out: &mut String) {
    let mut window = [lead, 0, 0, 0];
    let mut len = 1;
    while len < 4 {
        let Some(byte) = reader.peek(len - 1) else {
            break;
        };
        window[len] = byte;
        len += 1;
    }
    let (ch, consumed) = bstr::decode_utf8(&window[..len]);
    out.push(ch.unwrap_or('\u{FFFD}'));
    for _ in 1..consumed {
        reader.next();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::lex_string;
    use crate::error::ParseError;
    use crate::reader::Reader;

    fn lex(input: &[u8]) -> Result<String, ParseError> {
        let mut reader = Reader::new(input.iter().copied());
        assert_eq!(reader.next(), Some(b'"'));
        lex_string(&mut reader)
    }

    #[test]
    fn plain_and_escaped_content() {
        assert_eq!(lex(b"\"\"").unwrap(), "");
        assert_eq!(lex(b"\"hello\"").unwrap(), "hello");
        assert_eq!(lex(br#""a\"b\\c\/d\b\f\n\r\t""#).unwrap(), "a\"b\\c/d\u{8}\u{c}\n\r\t");
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(lex(br#""\u0041""#).unwrap(), "A");
        assert_eq!(lex(br#""\u00E9""#).unwrap(), "\u{E9}");
        assert_eq!(lex(br#""\uD834\uDD1E""#).unwrap(), "\u{1D11E}");
    }

    #[test]
    fn multibyte_utf8_passthrough() {
        assert_eq!(lex("\"h\u{E9}llo \u{1D11E}\"".as_bytes()).unwrap(), "h\u{E9}llo \u{1D11E}");
    }

    #[test]
    fn lone_high_surrogate() {
        let err = lex(br#""ab\uD834""#).unwrap_err();
        assert_eq!(
            err,
            ParseError::ExpectedLowSurrogateAfterHighSurrogate {
                partial: "ab".into(),
                location: crate::Location {
                    line: 1,
                    column: 9,
                    index: 9
                }
            }
        );
    }

    #[test]
    fn high_surrogate_with_out_of_range_low() {
        assert!(matches!(
            lex(br#""\uD834A""#).unwrap_err(),
            ParseError::ExpectedLowSurrogateAfterHighSurrogate { .. }
        ));
    }

    #[test]
    fn lone_low_surrogate_carries_the_value() {
        assert!(matches!(
            lex(br#""\uDC00""#).unwrap_err(),
            ParseError::CouldNotCreateScalarFromSurrogateValue { value: 0xDC00, .. }
        ));
    }

    #[test]
    fn invalid_hex_digit_carries_text_read() {
        let err = lex(br#""\u12G4""#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidHexDigitSequence { ref text, .. } if text == "12G"
        ));
    }

    #[test]
    fn unknown_escape_preserves_partial() {
        let err = lex(br#""so far\q""#).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEscapedCharacter {
                byte: b'q',
                partial: "so far".into(),
                location: crate::Location {
                    line: 1,
                    column: 8,
                    index: 8
                }
            }
        );
    }

    #[test]
    fn raw_control_byte_preserves_partial() {
        let err = lex(b"\"ab\x01cd\"").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnescapedControlCharacterInString {
                byte: 0x01,
                partial: "ab".into(),
                location: crate::Location {
                    line: 1,
                    column: 3,
                    index: 3
                }
            }
        );
    }

    #[test]
    fn unterminated_string() {
        assert!(matches!(
            lex(b"\"abc").unwrap_err(),
            ParseError::UnexpectedEndOfFile { .. }
        ));
    }
}
