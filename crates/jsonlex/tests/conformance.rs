//! Accept/reject fixtures for the strict document grammar, with accepted
//! documents cross-checked against a reference implementation.

use jsonlex::{ParserOptions, parse_str};
use rstest::rstest;

#[rstest]
#[case::empty_array("[]")]
#[case::empty_object("{}")]
#[case::numbers("[0, -0, 0.5, 2.5E-1, -12e-4, 1e308]")]
#[case::literals(r#"{"a":[true,false,null]}"#)]
#[case::nested(r#"{"a":{"b":{"c":[[[{"d":1}]]]}}}"#)]
#[case::empty_key(r#"{"":""}"#)]
#[case::whitespace(" \t\r\n [ 1 , 2 ] \t ")]
#[case::escapes(r#"["\" \\ \/ \b \f \n \r \t"]"#)]
#[case::hex_escapes(r#"["\u0041 \u00E9 \uD834\uDD1E"]"#)]
#[case::duplicate_keys(r#"{"k":1,"k":2}"#)]
#[case::deep_but_within_guard("[[[[[[[[[[[[[[[[[[[[]]]]]]]]]]]]]]]]]]]]")]
fn accepts(#[case] doc: &str) {
    let value = parse_str(doc, ParserOptions::default()).unwrap();
    let reference: serde_json::Value = serde_json::from_str(doc).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&value.to_string()).unwrap();
    assert_eq!(reparsed, reference, "document: {doc}");
}

#[rstest]
#[case::empty("")]
#[case::whitespace_only("   ")]
#[case::bare_scalar("123")]
#[case::bare_string(r#""hello""#)]
#[case::unterminated_array("[")]
#[case::bare_close("]")]
#[case::trailing_array_comma("[1,]")]
#[case::trailing_object_comma(r#"{"a":1,}"#)]
#[case::single_quotes("{'a':1}")]
#[case::leading_zero("[01]")]
#[case::bare_exponent("[1e]")]
#[case::plus_sign("[+1]")]
#[case::bare_decimal_point("[.5]")]
#[case::open_decimal_point("[1.]")]
#[case::bad_escape(r#"["\x"]"#)]
#[case::raw_tab_in_string("[\"a\tb\"]")]
#[case::key_without_value(r#"{"a"}"#)]
#[case::missing_comma(r#"["a" "b"]"#)]
#[case::colon_in_array("[1:2]")]
#[case::mismatched_close("[}")]
#[case::double_comma("[1,,2]")]
#[case::corrupt_literal("[nul]")]
#[case::lone_high_surrogate(r#"["\uD834"]"#)]
fn rejects(#[case] doc: &str) {
    assert!(
        parse_str(doc, ParserOptions::default()).is_err(),
        "document should have been rejected: {doc}"
    );
}

#[rstest]
#[case::bare_number("123", "123")]
#[case::bare_string(r#""hi""#, r#""hi""#)]
#[case::trailing_commas(r#"{"a":[1,2,],}"#, r#"{"a":[1,2]}"#)]
fn lenient_mode_accepts_the_documented_superset(
    #[case] doc: &str,
    #[case] normalized: &str,
) {
    let value = parse_str(doc, ParserOptions::lenient()).unwrap();
    assert_eq!(value.to_string(), normalized);
}
