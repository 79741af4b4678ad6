//! Unit tests for error handling.
//!
//! This module contains tests for error types, categories and reporting.

use crate::errors::errors::{Error, ErrorCategory, ErrorImpl, ErrorTip};
use crate::{Position, Span};
use std::rc::Rc;

fn span_at(offset: u32) -> Span {
    let position = Position {
        offset,
        line: 1,
        column: offset + 1,
        file: Rc::new("test.morpho".to_string()),
    };
    Span {
        start: position.clone(),
        end: position,
    }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "#".to_string(),
        },
        span_at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_span() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        span_at(42),
    );

    assert_eq!(error.get_span().start.offset, 42);
}

#[test]
fn test_unexpected_token_error() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        span_at(0),
    );

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_category(), ErrorCategory::Syntax);
}

#[test]
fn test_unterminated_string_error() {
    let error = Error::new(ErrorImpl::UnterminatedString, span_at(0));

    assert_eq!(error.get_error_name(), "UnterminatedString");
    assert_eq!(error.get_category(), ErrorCategory::Lex);
}

#[test]
fn test_invalid_escape_error() {
    let error = Error::new(
        ErrorImpl::InvalidEscape {
            escape: "q".to_string(),
        },
        span_at(0),
    );

    assert_eq!(error.get_error_name(), "InvalidEscape");
    assert_eq!(error.get_category(), ErrorCategory::Lex);
}

#[test]
fn test_invalid_numeric_suffix_error() {
    let error = Error::new(
        ErrorImpl::InvalidNumericSuffix {
            literal: "1e5".to_string(),
        },
        span_at(0),
    );

    assert_eq!(error.get_error_name(), "InvalidNumericSuffix");
    assert_eq!(error.get_category(), ErrorCategory::Lex);
}

#[test]
fn test_expected_expression_error() {
    let error = Error::new(
        ErrorImpl::ExpectedExpression {
            token: "}".to_string(),
        },
        span_at(0),
    );

    assert_eq!(error.get_error_name(), "ExpectedExpression");
    assert_eq!(error.get_category(), ErrorCategory::Syntax);
}

#[test]
fn test_number_parse_error() {
    let error = Error::new(
        ErrorImpl::NumberParseError {
            token: "99999999999999999999".to_string(),
        },
        span_at(0),
    );

    assert_eq!(error.get_error_name(), "NumberParseError");
    assert_eq!(error.get_category(), ErrorCategory::Syntax);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "#".to_string(),
        },
        span_at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        span_at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_detailed_error_message() {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: "=".to_string(),
            message: "expected identifier during variable declaration".to_string(),
        },
        span_at(4),
    );

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    match error.get_tip() {
        ErrorTip::Suggestion(text) => assert!(text.contains("expected identifier")),
        _ => panic!("Expected suggestion tip"),
    }
}
