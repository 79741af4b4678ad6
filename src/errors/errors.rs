use std::fmt::Display;

use thiserror::Error as ThisError;

use crate::Span;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedInterpolation => "UnterminatedInterpolation",
            ErrorImpl::UnterminatedBlockComment => "UnterminatedBlockComment",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::InvalidNumericSuffix { .. } => "InvalidNumericSuffix",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
        }
    }

    /// Which family the diagnostic belongs to: malformed lexemes are lex
    /// errors, everything discovered while matching productions is a syntax
    /// error.
    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedInterpolation
            | ErrorImpl::UnterminatedBlockComment
            | ErrorImpl::InvalidEscape { .. }
            | ErrorImpl::InvalidNumericSuffix { .. } => ErrorCategory::Lex,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::ExpectedExpression { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorCategory::Syntax,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String is missing its closing `\"` before the end of the line",
            )),
            ErrorImpl::UnterminatedInterpolation => ErrorTip::Suggestion(String::from(
                "Interpolation `${` is missing its closing `}`",
            )),
            ErrorImpl::UnterminatedBlockComment => ErrorTip::Suggestion(String::from(
                "Block comment is missing its closing `*/`",
            )),
            ErrorImpl::InvalidEscape { escape } => ErrorTip::Suggestion(format!(
                "Unknown escape sequence `\\{}` in string literal",
                escape
            )),
            ErrorImpl::InvalidNumericSuffix { literal } => ErrorTip::Suggestion(format!(
                "Invalid suffix on number `{}`, only `im` or `i` may follow a numeric literal",
                literal
            )),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedExpression { token } => ErrorTip::Suggestion(format!(
                "Expected an expression, found `{}`",
                token
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Syntax,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(ThisError, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated interpolation")]
    UnterminatedInterpolation,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("invalid escape sequence: \\{escape}")]
    InvalidEscape { escape: String },
    #[error("invalid numeric suffix: {literal:?}")]
    InvalidNumericSuffix { literal: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected expression, found {token:?}")]
    ExpectedExpression { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
}
