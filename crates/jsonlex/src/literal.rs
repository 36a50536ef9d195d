//! Matching of the `true`, `false`, and `null` literals.

use crate::error::ParseError;
use crate::reader::{ByteSource, Reader};
use crate::token::Token;

/// Completes a literal whose first byte (`t`, `f`, or `n`) has already been
/// consumed. The remaining bytes must match exactly; the first diverging
/// byte raises [`ParseError::CorruptedLiteral`] naming the literal the first
/// byte committed to.
pub(crate) fn lex_literal<S: ByteSource>(
    reader: &mut Reader<S>,
    first: u8,
) -> Result<Token, ParseError> {
    let (rest, expected, token): (&[u8], _, _) = match first {
        b't' => (b"rue", "true", Token::True),
        b'f' => (b"alse", "false", Token::False),
        _ => (b"ull", "null", Token::Null),
    };

    for want in rest {
        let location = reader.location();
        let Some(byte) = reader.next() else {
            return Err(ParseError::UnexpectedEndOfFile { location });
        };
        if byte != *want {
            return Err(ParseError::CorruptedLiteral { expected, location });
        }
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::lex_literal;
    use crate::error::ParseError;
    use crate::reader::Reader;
    use crate::token::Token;

    fn lex(input: &[u8]) -> Result<Token, ParseError> {
        let mut reader = Reader::new(input.iter().copied());
        let first = reader.next().unwrap();
        lex_literal(&mut reader, first)
    }

    #[test]
    fn matches_all_three_literals() {
        assert_eq!(lex(b"true").unwrap(), Token::True);
        assert_eq!(lex(b"false").unwrap(), Token::False);
        assert_eq!(lex(b"null").unwrap(), Token::Null);
    }

    #[test]
    fn diverging_byte_names_the_expected_literal() {
        let err = lex(b"nuXl").unwrap_err();
        assert_eq!(
            err,
            ParseError::CorruptedLiteral {
                expected: "null",
                location: crate::Location {
                    line: 1,
                    column: 2,
                    index: 2
                }
            }
        );
    }

    #[test]
    fn truncated_literal_is_end_of_file() {
        assert!(matches!(
            lex(b"tru").unwrap_err(),
            ParseError::UnexpectedEndOfFile { .. }
        ));
    }
}
