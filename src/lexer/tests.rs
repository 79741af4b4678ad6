//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers, floats, imaginary numbers)
//! - String literals as sub-token sequences with escapes and interpolation
//! - Operators and punctuation
//! - Comments and newline terminators
//! - Error cases that must not abort the scan

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, _) = tokenize(source.to_string(), Some("test.morpho".to_string()));
    tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "var print if else while for in do return break continue import as try catch with is fn class".to_string();
    let (tokens, errors) = tokenize(source, Some("test.morpho".to_string()));

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[1].kind, TokenKind::Print);
    assert_eq!(tokens[2].kind, TokenKind::If);
    assert_eq!(tokens[3].kind, TokenKind::Else);
    assert_eq!(tokens[4].kind, TokenKind::While);
    assert_eq!(tokens[5].kind, TokenKind::For);
    assert_eq!(tokens[6].kind, TokenKind::In);
    assert_eq!(tokens[7].kind, TokenKind::Do);
    assert_eq!(tokens[8].kind, TokenKind::Return);
    assert_eq!(tokens[9].kind, TokenKind::Break);
    assert_eq!(tokens[10].kind, TokenKind::Continue);
    assert_eq!(tokens[11].kind, TokenKind::Import);
    assert_eq!(tokens[12].kind, TokenKind::As);
    assert_eq!(tokens[13].kind, TokenKind::Try);
    assert_eq!(tokens[14].kind, TokenKind::Catch);
    assert_eq!(tokens[15].kind, TokenKind::With);
    assert_eq!(tokens[16].kind, TokenKind::Is);
    assert_eq!(tokens[17].kind, TokenKind::Fn);
    assert_eq!(tokens[18].kind, TokenKind::Class);
    assert_eq!(tokens[19].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_literal_keywords() {
    let (tokens, _) = tokenize(
        "true false nil self super".to_string(),
        Some("test.morpho".to_string()),
    );

    assert_eq!(tokens[0].kind, TokenKind::True);
    assert_eq!(tokens[1].kind, TokenKind::False);
    assert_eq!(tokens[2].kind, TokenKind::Nil);
    assert_eq!(tokens[3].kind, TokenKind::SelfKw);
    assert_eq!(tokens[4].kind, TokenKind::Super);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let (tokens, _) = tokenize(
        "foo bar baz_123 _underscore CamelCase".to_string(),
        Some("test.morpho".to_string()),
    );

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "bar");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "CamelCase");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let (tokens, errors) = tokenize(
        "42 3.14 0 100.5 1.5e10 2.5e-3".to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::Float);
    assert_eq!(tokens[4].value, "1.5e10");
    assert_eq!(tokens[5].kind, TokenKind::Float);
    assert_eq!(tokens[5].value, "2.5e-3");
}

#[test]
fn test_tokenize_imaginary_numbers() {
    let (tokens, errors) = tokenize(
        "2im 3.5im 4i".to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Imaginary);
    assert_eq!(tokens[0].value, "2im");
    assert_eq!(tokens[1].kind, TokenKind::Imaginary);
    assert_eq!(tokens[1].value, "3.5im");
    assert_eq!(tokens[2].kind, TokenKind::Imaginary);
    assert_eq!(tokens[2].value, "4i");
}

#[test]
fn test_tokenize_invalid_numeric_suffix() {
    let (tokens, errors) = tokenize("1e5".to_string(), Some("test.morpho".to_string()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "InvalidNumericSuffix");
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_simple_string() {
    let (tokens, errors) = tokenize(r#""hello""#.to_string(), Some("test.morpho".to_string()));

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::StringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringFragment);
    assert_eq!(tokens[1].value, "hello");
    assert_eq!(tokens[2].kind, TokenKind::StringEnd);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_empty_string() {
    let (tokens, errors) = tokenize(r#""""#.to_string(), Some("test.morpho".to_string()));

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::StringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringEnd);
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let (tokens, errors) = tokenize(
        r#""a\nb\t\\\"""#.to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::StringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringFragment);
    assert_eq!(tokens[1].value, "a");
    assert_eq!(tokens[2].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[2].value, "\n");
    assert_eq!(tokens[3].kind, TokenKind::StringFragment);
    assert_eq!(tokens[3].value, "b");
    assert_eq!(tokens[4].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[4].value, "\t");
    assert_eq!(tokens[5].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[5].value, "\\");
    assert_eq!(tokens[6].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[6].value, "\"");
    assert_eq!(tokens[7].kind, TokenKind::StringEnd);
}

#[test]
fn test_tokenize_hex_and_unicode_escapes() {
    let (tokens, errors) = tokenize(
        r#""\x41B\U00000043""#.to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[1].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[1].value, "A");
    assert_eq!(tokens[2].kind, TokenKind::StringFragment);
    assert_eq!(tokens[2].value, "B");
    assert_eq!(tokens[3].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[3].value, "C");
}

#[test]
fn test_tokenize_invalid_escape() {
    let (_, errors) = tokenize(r#""\q""#.to_string(), Some("test.morpho".to_string()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "InvalidEscape");
}

#[test]
fn test_tokenize_string_interpolation() {
    let (tokens, errors) = tokenize(
        r#""a${1+2}b""#.to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::StringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringFragment);
    assert_eq!(tokens[1].value, "a");
    assert_eq!(tokens[2].kind, TokenKind::InterpolationStart);
    assert_eq!(tokens[3].kind, TokenKind::Integer);
    assert_eq!(tokens[4].kind, TokenKind::Plus);
    assert_eq!(tokens[5].kind, TokenKind::Integer);
    assert_eq!(tokens[6].kind, TokenKind::InterpolationEnd);
    assert_eq!(tokens[7].kind, TokenKind::StringFragment);
    assert_eq!(tokens[7].value, "b");
    assert_eq!(tokens[8].kind, TokenKind::StringEnd);
}

#[test]
fn test_tokenize_interpolation_with_nested_braces() {
    // the `}` closing the dictionary must not end the interpolation
    let (tokens, errors) = tokenize(
        r#""${ {1: 2}[1] }""#.to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::StringStart,
            TokenKind::InterpolationStart,
            TokenKind::OpenCurly,
            TokenKind::Integer,
            TokenKind::Colon,
            TokenKind::Integer,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::Integer,
            TokenKind::CloseBracket,
            TokenKind::InterpolationEnd,
            TokenKind::StringEnd,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_nested_string_in_interpolation() {
    let (tokens, errors) = tokenize(
        r#""${ "x" }""#.to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::StringStart);
    assert_eq!(tokens[1].kind, TokenKind::InterpolationStart);
    assert_eq!(tokens[2].kind, TokenKind::StringStart);
    assert_eq!(tokens[3].kind, TokenKind::StringFragment);
    assert_eq!(tokens[3].value, "x");
    assert_eq!(tokens[4].kind, TokenKind::StringEnd);
    assert_eq!(tokens[5].kind, TokenKind::InterpolationEnd);
    assert_eq!(tokens[6].kind, TokenKind::StringEnd);
}

#[test]
fn test_tokenize_lone_dollar_is_text() {
    let (tokens, errors) = tokenize(r#""a$b""#.to_string(), Some("test.morpho".to_string()));

    assert!(errors.is_empty());
    assert_eq!(tokens[1].kind, TokenKind::StringFragment);
    assert_eq!(tokens[1].value, "a$b");
}

#[test]
fn test_tokenize_unterminated_string() {
    let (tokens, errors) = tokenize(
        "\"abc\nvar".to_string(),
        Some("test.morpho".to_string()),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnterminatedString");
    // the scan resumes on the next line
    assert_eq!(tokens[0].kind, TokenKind::StringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringFragment);
    assert_eq!(tokens[2].kind, TokenKind::Error);
    assert_eq!(tokens[3].kind, TokenKind::Newline);
    assert_eq!(tokens[4].kind, TokenKind::Var);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / ^ @ == != < > <= >= = && ||"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Caret,
            TokenKind::At,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_word_operators() {
    let (tokens, _) = tokenize("a and b or c".to_string(), Some("test.morpho".to_string()));

    assert_eq!(tokens[1].kind, TokenKind::And);
    assert_eq!(tokens[1].value, "and");
    assert_eq!(tokens[3].kind, TokenKind::Or);
    assert_eq!(tokens[3].value, "or");
}

#[test]
fn test_tokenize_compound_assignment_operators() {
    assert_eq!(
        kinds("+= -= *= /="),
        vec![
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_range_operators() {
    assert_eq!(
        kinds("1..10 1...10"),
        vec![
            TokenKind::Integer,
            TokenKind::DotDot,
            TokenKind::Integer,
            TokenKind::Integer,
            TokenKind::Ellipsis,
            TokenKind::Integer,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] . , ; : ?"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Question,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_newline_token() {
    assert_eq!(
        kinds("a\nb"),
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_line_comment() {
    let (tokens, _) = tokenize(
        "var x = 5 // this is a comment\nvar y = 10".to_string(),
        Some("test.morpho".to_string()),
    );

    // comments are trivia; only the newline survives
    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Assignment);
    assert_eq!(tokens[3].kind, TokenKind::Integer);
    assert_eq!(tokens[4].kind, TokenKind::Newline);
    assert_eq!(tokens[5].kind, TokenKind::Var);
}

#[test]
fn test_tokenize_block_comment() {
    let (tokens, errors) = tokenize(
        "a /* comment\nacross lines */ b".to_string(),
        Some("test.morpho".to_string()),
    );

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "b");
    // the newline inside the comment is part of the comment
    assert_eq!(tokens[1].span.start.line, 2);
}

#[test]
fn test_tokenize_unterminated_block_comment() {
    let (_, errors) = tokenize("a /* no end".to_string(), Some("test.morpho".to_string()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnterminatedBlockComment");
}

#[test]
fn test_tokenize_unrecognised_character() {
    let (tokens, errors) = tokenize("var x = #".to_string(), Some("test.morpho".to_string()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnrecognisedToken");
    assert_eq!(tokens[3].kind, TokenKind::Error);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_spans() {
    let (tokens, _) = tokenize("var x\ny".to_string(), Some("test.morpho".to_string()));

    assert_eq!(tokens[0].span.start.offset, 0);
    assert_eq!(tokens[0].span.end.offset, 3);
    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);
    assert_eq!(tokens[1].span.start.column, 5);
    // `y` sits on the second line
    assert_eq!(tokens[3].span.start.line, 2);
    assert_eq!(tokens[3].span.start.column, 1);
}

#[test]
fn test_tokenize_whitespace_handling() {
    let (tokens, _) = tokenize(
        "  var   x   =   42  ".to_string(),
        Some("test.morpho".to_string()),
    );

    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Assignment);
    assert_eq!(tokens[3].kind, TokenKind::Integer);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_empty_source() {
    let (tokens, errors) = tokenize("".to_string(), Some("test.morpho".to_string()));

    assert!(errors.is_empty());
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
}
