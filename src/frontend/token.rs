//! Classification of Python token nodes into scalars.
//!
//! Tokens such as identifiers or number literals carry their meaning in their text and are
//! stored as values instead of nodes. Which node types count as tokens is fixed by
//! `TOKEN_CLASSES`. Keyword statements like `pass` are childless too but stay nodes.
//! Comments and line continuations are extras and never reach this table.

use phf::phf_map;

use crate::record::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Integer,
    Float,
    True,
    False,
    None,
    /// Tokens whose text is the value, e.g. identifiers and string contents.
    Text,
}

static TOKEN_CLASSES: phf::Map<&'static str, TokenClass> = phf_map! {
    "identifier" => TokenClass::Text,
    "integer" => TokenClass::Integer,
    "float" => TokenClass::Float,
    "true" => TokenClass::True,
    "false" => TokenClass::False,
    "none" => TokenClass::None,
    "ellipsis" => TokenClass::Text,
    "string_start" => TokenClass::Text,
    "string_content" => TokenClass::Text,
    "string_end" => TokenClass::Text,
    "escape_sequence" => TokenClass::Text,
    "escape_interpolation" => TokenClass::Text,
    "type_conversion" => TokenClass::Text,
    "positional_separator" => TokenClass::Text,
    "keyword_separator" => TokenClass::Text,
    "wildcard_import" => TokenClass::Text
};

/// The class of a named node type, `None` if the type is not a token.
pub fn token_class(kind: &str) -> Option<TokenClass> {
    TOKEN_CLASSES.get(kind).copied()
}

/// Turn the source text of a token into a scalar.
pub fn to_scalar(class: TokenClass, text: &str) -> Scalar {
    match class {
        TokenClass::Integer => parse_int(text).map_or_else(|| Scalar::Opaque(text.to_string()), Scalar::Int),
        TokenClass::Float => match text.replace('_', "").parse::<f64>() {
            Ok(x) => Scalar::float(x, text),
            Err(_) => Scalar::Opaque(text.to_string()),
        },
        TokenClass::True => Scalar::Bool(true),
        TokenClass::False => Scalar::Bool(false),
        TokenClass::None => Scalar::None,
        TokenClass::Text => Scalar::Str(text.to_string()),
    }
}

/// Parse a Python integer literal. Returns `None` for literals that do not fit into `i64`
/// as well as for imaginary (`1j`) and legacy long (`1L`) literals.
fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let (radix, digits) = match digits.get(..2) {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };
    i64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Scalar::Int(42))]
    #[case("1_000", Scalar::Int(1000))]
    #[case("0xFF", Scalar::Int(255))]
    #[case("0o17", Scalar::Int(15))]
    #[case("0b101", Scalar::Int(5))]
    #[case("3j", Scalar::Opaque("3j".to_string()))]
    #[case("99999999999999999999", Scalar::Opaque("99999999999999999999".to_string()))]
    fn test_integers(#[case] text: &str, #[case] expected: Scalar) {
        assert_eq!(to_scalar(TokenClass::Integer, text), expected);
    }

    #[rstest]
    #[case("2.5", Scalar::Float(2.5))]
    #[case("1e3", Scalar::Float(1000.0))]
    #[case(".5", Scalar::Float(0.5))]
    #[case("1e999", Scalar::Opaque("1e999".to_string()))]
    #[case("2.5j", Scalar::Opaque("2.5j".to_string()))]
    fn test_floats(#[case] text: &str, #[case] expected: Scalar) {
        assert_eq!(to_scalar(TokenClass::Float, text), expected);
    }

    #[test]
    fn test_token_classes() {
        assert_eq!(token_class("identifier"), Some(TokenClass::Text));
        assert_eq!(token_class("none"), Some(TokenClass::None));
        assert_eq!(token_class("keyword_separator"), Some(TokenClass::Text));
        assert_eq!(token_class("function_definition"), None);
        assert_eq!(token_class("pass_statement"), None);
        assert_eq!(token_class("comment"), None);
        assert_eq!(to_scalar(TokenClass::True, "True"), Scalar::Bool(true));
        assert_eq!(to_scalar(TokenClass::None, "None"), Scalar::None);
        assert_eq!(to_scalar(TokenClass::Text, "func"), Scalar::from("func"));
    }
}
