use alloc::vec::Vec;

use crate::{Location, ParseError, ParserOptions, Token, Tokenizer};

fn walk(input: &str, options: ParserOptions) -> Vec<Result<Token, ParseError>> {
    Tokenizer::from_str(input, options).collect()
}

fn final_error(input: &str, options: ParserOptions) -> ParseError {
    walk(input, options)
        .pop()
        .expect("token sequence is not empty")
        .expect_err("tokenization should have failed")
}

fn at(line: usize, column: usize, index: usize) -> Location {
    Location {
        line,
        column,
        index,
    }
}

#[test]
fn unquoted_key_names_the_exact_byte() {
    let produced = walk(r#"{unquoted_key: "x"}"#, ParserOptions::default());
    assert_eq!(
        produced,
        [
            Ok(Token::ObjectOpen),
            Err(ParseError::UnexpectedCharacter {
                byte: b'u',
                location: at(1, 1, 1)
            }),
        ]
    );
}

#[test]
fn strict_mode_rejects_fragments_at_the_first_byte() {
    for doc in [r#""hello""#, "42", "-1", "true", "null"] {
        assert_eq!(
            final_error(doc, ParserOptions::default()),
            ParseError::JsonFragmentDisallowed {
                location: at(1, 0, 0)
            },
            "document: {doc}"
        );
    }
}

#[test]
fn strict_mode_rejects_trailing_array_comma_at_the_close() {
    assert_eq!(
        final_error("[1,2,3,]", ParserOptions::default()),
        ParseError::UnexpectedCharacter {
            byte: b']',
            location: at(1, 7, 7)
        }
    );
}

#[test]
fn strict_mode_rejects_trailing_object_comma_at_the_close() {
    assert_eq!(
        final_error(r#"{"a":1,}"#, ParserOptions::default()),
        ParseError::UnexpectedCharacter {
            byte: b'}',
            location: at(1, 7, 7)
        }
    );
}

#[test]
fn leading_zero_is_rejected_at_the_second_digit() {
    assert_eq!(
        final_error("013", ParserOptions::lenient()),
        ParseError::NumberWithLeadingZero {
            location: at(1, 1, 1)
        }
    );
    assert_eq!(
        final_error("[013]", ParserOptions::default()),
        ParseError::NumberWithLeadingZero {
            location: at(1, 2, 2)
        }
    );
    // A lone zero before a decimal point stays legal.
    assert!(
        walk("[0.5]", ParserOptions::default())
            .iter()
            .all(Result::is_ok)
    );
}

#[test]
fn missing_object_value() {
    assert_eq!(
        final_error(r#"{"a":}"#, ParserOptions::default()),
        ParseError::MissingObjectValue {
            location: at(1, 5, 5)
        }
    );
    assert_eq!(
        final_error(r#"{"a":,"b":1}"#, ParserOptions::default()),
        ParseError::MissingObjectValue {
            location: at(1, 5, 5)
        }
    );
}

#[test]
fn missing_object_key() {
    assert_eq!(
        final_error("{:1}", ParserOptions::default()),
        ParseError::MissingKey {
            location: at(1, 1, 1)
        }
    );
}

#[test]
fn corrupted_literal_names_the_expected_word() {
    assert_eq!(
        final_error("[nule]", ParserOptions::default()),
        ParseError::CorruptedLiteral {
            expected: "null",
            location: at(1, 4, 4)
        }
    );
    assert_eq!(
        final_error("[trye]", ParserOptions::default()),
        ParseError::CorruptedLiteral {
            expected: "true",
            location: at(1, 3, 3)
        }
    );
}

#[test]
fn truncated_documents_report_end_of_file() {
    assert_eq!(
        final_error(r#"{"a": "#, ParserOptions::default()),
        ParseError::UnexpectedEndOfFile {
            location: at(1, 6, 6)
        }
    );
    assert_eq!(
        final_error("[1,", ParserOptions::default()),
        ParseError::UnexpectedEndOfFile {
            location: at(1, 3, 3)
        }
    );
    assert_eq!(
        final_error(r#""abc"#, ParserOptions::lenient()),
        ParseError::UnexpectedEndOfFile {
            location: at(1, 4, 4)
        }
    );
}

#[test]
fn mismatched_closes_are_unexpected_characters() {
    assert!(matches!(
        final_error("[}", ParserOptions::default()),
        ParseError::UnexpectedCharacter { byte: b'}', .. }
    ));
    assert!(matches!(
        final_error(r#"{"a":1]"#, ParserOptions::default()),
        ParseError::UnexpectedCharacter { byte: b']', .. }
    ));
}

#[test]
fn open_exponent_at_end_of_input() {
    assert_eq!(
        final_error("1e", ParserOptions::lenient()),
        ParseError::MissingExponent {
            location: at(1, 2, 2)
        }
    );
}

#[test]
fn locations_cross_line_breaks() {
    let error = final_error("{\n \"a\": x}", ParserOptions::default());
    assert_eq!(
        error,
        ParseError::UnexpectedCharacter {
            byte: b'x',
            location: at(2, 6, 8)
        }
    );
}

#[test]
fn depth_guard_fires_before_end_of_input() {
    let input: Vec<u8> = core::iter::repeat_n(b'[', 513).collect();
    let produced: Vec<_> = Tokenizer::from_slice(&input, ParserOptions::default()).collect();
    assert_eq!(produced.len(), 513);
    assert!(produced[..512].iter().all(Result::is_ok));
    assert!(matches!(
        produced[512],
        Err(ParseError::TooManyNestedContainers { location }) if location.index == 512
    ));
}

#[test]
fn errors_terminate_the_sequence() {
    let mut tokenizer = Tokenizer::from_str("[tru", ParserOptions::default());
    assert_eq!(tokenizer.next_token().unwrap(), Some(Token::ArrayOpen));
    assert!(tokenizer.next_token().is_err());
    // Terminal: no retry, no resumption.
    assert_eq!(tokenizer.next_token().unwrap(), None);
    assert_eq!(tokenizer.next_token().unwrap(), None);
}

#[test]
fn trailing_content_after_a_document() {
    assert!(matches!(
        final_error("{} {}", ParserOptions::default()),
        ParseError::UnexpectedCharacter {
            byte: b'{',
            location
        } if location.index == 3
    ));
    assert!(matches!(
        final_error("1 2", ParserOptions::lenient()),
        ParseError::UnexpectedCharacter { byte: b'2', .. }
    ));
}

#[test]
fn cancelled_source_reads_as_end_of_input() {
    // A source that stops producing mid-string: the tokenizer must terminate
    // with end-of-file semantics instead of retrying the read.
    let source = br#"{"a": "xy"#.iter().copied();
    let produced: Vec<_> = Tokenizer::new(source, ParserOptions::default()).collect();
    assert_eq!(
        produced.last(),
        Some(&Err(ParseError::UnexpectedEndOfFile {
            location: at(1, 9, 9)
        }))
    );
}

#[test]
fn determinism_of_errors() {
    let doc = r#"{"a": [1, 2, x]}"#;
    let first = walk(doc, ParserOptions::default());
    let second = walk(doc, ParserOptions::default());
    assert_eq!(first, second);
}
