use crate::{
    ast::{
        ast::{Expr, ExprWrapper, Parameter},
        expressions::{
            AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, DictEntry, DictExpr, ErrorExpr,
            FloatExpr, FnExpr, IdentifierExpr, ImaginaryExpr, IndexExpr, IntegerExpr, ListExpr,
            MemberExpr, NilExpr, ParenExpr, PrefixExpr, SelfExpr, StringExpr, StringSegment,
            SuperExpr, SymbolExpr, TernaryExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block};

/// The precedence-climbing loop: parse a prefix/primary expression through
/// its NUD handler, then keep consuming infix/postfix operators while their
/// binding power is strictly above `bp`.
///
/// A newline stops the loop at statement level; inside a bracketed
/// construct it is skipped, and in operand position (right here, before the
/// NUD) it can never terminate anything, so it is skipped too.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    parser.skip_newlines();

    let token_kind = parser.current_token_kind();
    if !parser.get_nud_lookup().contains_key(&token_kind) {
        let token = parser.current_token();
        return Err(Error::new(
            ErrorImpl::ExpectedExpression {
                token: token.value.clone(),
            },
            token.span.clone(),
        ));
    }

    let mut left = parser.get_nud_lookup().get(&token_kind).unwrap()(parser)?;

    loop {
        while parser.current_token_kind() == TokenKind::Newline && parser.in_group() {
            parser.advance();
        }
        if parser.current_token_kind() == TokenKind::Newline {
            // Statement level: the newline is a terminator, not an
            // expression separator.
            break;
        }

        let next_bp = *parser
            .get_bp_lookup()
            .get(&parser.current_token_kind())
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        if !parser.get_led_lookup().contains_key(&token_kind) {
            let token = parser.current_token();
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.value.clone(),
                },
                token.span.clone(),
            ));
        }

        left = parser.get_led_lookup().get(&token_kind).unwrap()(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    match parser.current_token_kind() {
        TokenKind::Integer => {
            let token = parser.advance().clone();
            match token.value.parse::<i64>() {
                Ok(value) => Ok(ExprWrapper::new(IntegerExpr {
                    value,
                    span: token.span,
                })),
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span,
                )),
            }
        }
        TokenKind::Float => {
            let token = parser.advance().clone();
            match token.value.parse::<f64>() {
                Ok(value) => Ok(ExprWrapper::new(FloatExpr {
                    value,
                    span: token.span,
                })),
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span,
                )),
            }
        }
        TokenKind::Imaginary => {
            let token = parser.advance().clone();
            let digits = if token.value.ends_with("im") {
                &token.value[..token.value.len() - 2]
            } else {
                &token.value[..token.value.len() - 1]
            };
            match digits.parse::<f64>() {
                Ok(value) => Ok(ExprWrapper::new(ImaginaryExpr {
                    value,
                    span: token.span,
                })),
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span,
                )),
            }
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(ExprWrapper::new(IdentifierExpr {
                name: token.value,
                span: token.span,
            }))
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance().clone();
            Ok(ExprWrapper::new(BooleanExpr {
                value: token.kind == TokenKind::True,
                span: token.span,
            }))
        }
        TokenKind::Nil => {
            let token = parser.advance().clone();
            Ok(ExprWrapper::new(NilExpr { span: token.span }))
        }
        TokenKind::SelfKw => {
            let token = parser.advance().clone();
            Ok(ExprWrapper::new(SelfExpr { span: token.span }))
        }
        _ => {
            let token = parser.current_token();
            Err(Error::new(
                ErrorImpl::ExpectedExpression {
                    token: token.value.clone(),
                },
                token.span.clone(),
            ))
        }
    }
}

/// Reassembles a string literal from its sub-tokens. An interpolation
/// region hands control back to `parse_expr` until the matching `}`.
pub fn parse_string_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone(); // StringStart
    let mut segments = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::StringFragment => {
                segments.push(StringSegment::Text(parser.advance().value.clone()));
            }
            TokenKind::EscapeSequence => {
                let value = parser.advance().value.clone();
                segments.push(StringSegment::Escape(value.chars().next().unwrap_or('\0')));
            }
            TokenKind::InterpolationStart => {
                parser.advance();
                parser.begin_group();
                let result = parse_expr(parser, BindingPower::Default);
                parser.end_group();
                segments.push(StringSegment::Interpolation(result?));
                parser.expect(TokenKind::InterpolationEnd)?;
            }
            TokenKind::StringEnd => {
                parser.advance();
                break;
            }
            // A lexical error ended the literal early; it is already in the
            // diagnostics, so just close the string here.
            TokenKind::Error => {
                parser.advance();
                break;
            }
            _ => break,
        }
    }

    Ok(ExprWrapper::new(StringExpr {
        segments,
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
    }))
}

pub fn parse_super_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone();

    // Bare `super` is invalid; the member access is part of the form.
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("`super` must be followed by `.member`"),
        },
        parser.current_token().span.clone(),
    );
    parser.expect_error(TokenKind::Dot, Some(error))?;
    let member = parser.expect(TokenKind::Identifier)?;

    Ok(ExprWrapper::new(SuperExpr {
        member: member.value,
        span: Span {
            start: start_token.span.start,
            end: member.span.end,
        },
    }))
}

pub fn parse_symbol_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone(); // `:`
    let name = parser.expect(TokenKind::Identifier)?;

    Ok(ExprWrapper::new(SymbolExpr {
        name: name.value,
        span: Span {
            start: start_token.span.start,
            end: name.span.end,
        },
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(ExprWrapper::new(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: operand.get_span().end.clone(),
        },
        operator: operator_token,
        operand,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone(); // `(`
    parser.begin_group();
    let result = parse_expr(parser, BindingPower::Default);
    parser.end_group();
    let inner = result?;
    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(ExprWrapper::new(ParenExpr {
        inner,
        span: Span {
            start: start_token.span.start,
            end: close.span.end,
        },
    }))
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone(); // `[`
    parser.begin_group();

    let mut elements = vec![];
    let result = (|parser: &mut Parser| {
        loop {
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::CloseBracket {
                break;
            }
            elements.push(parse_expr(parser, BindingPower::Default)?);
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
        Ok::<(), Error>(())
    })(parser);
    parser.end_group();
    result?;

    let close = parser.expect(TokenKind::CloseBracket)?;

    Ok(ExprWrapper::new(ListExpr {
        elements,
        span: Span {
            start: start_token.span.start,
            end: close.span.end,
        },
    }))
}

pub fn parse_dict_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone(); // `{`
    parser.begin_group();

    let mut entries = vec![];
    let result = (|parser: &mut Parser| {
        loop {
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::CloseCurly {
                break;
            }
            let key = parse_expr(parser, BindingPower::Default)?;
            parser.skip_newlines();
            parser.expect(TokenKind::Colon)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            entries.push(DictEntry {
                span: Span {
                    start: key.get_span().start.clone(),
                    end: value.get_span().end.clone(),
                },
                key,
                value,
            });
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
        Ok::<(), Error>(())
    })(parser);
    parser.end_group();
    result?;

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(ExprWrapper::new(DictExpr {
        entries,
        span: Span {
            start: start_token.span.start,
            end: close.span.end,
        },
    }))
}

/// An `fn` in expression position; the optional name is recorded but the
/// node stays an expression regardless.
pub fn parse_fn_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start_token = parser.advance().clone(); // `fn`

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.advance().value.clone())
    } else {
        None
    };

    let parameters = parse_parameters(parser)?;
    parser.skip_newlines();
    let body = parse_block(parser)?;

    Ok(ExprWrapper::new(FnExpr {
        span: Span {
            start: start_token.span.start,
            end: body.span.end.clone(),
        },
        name,
        parameters,
        body,
    }))
}

/// Consumes a zero-width `Error` token left by the lexer. The defect is
/// already in the diagnostics, so the placeholder is produced silently.
pub fn parse_error_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let token = parser.advance().clone();
    Ok(ExprWrapper::new(ErrorExpr { span: token.span }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    // Parsing the right side at the operator's own tier makes equal-power
    // operators stop the recursion, which is left association.
    let right = parse_expr(parser, bp)?;

    Ok(ExprWrapper::new(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left,
        operator: operator_token,
        right,
    }))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    // One tier lower on the right side keeps assignment right-associative.
    let value = parse_expr(parser, bp.one_below())?;

    Ok(ExprWrapper::new(AssignmentExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: value.get_span().end.clone(),
        },
        assignee: left,
        operator: operator_token,
        value,
    }))
}

pub fn parse_ternary_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    parser.advance(); // `?`

    let then_branch = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    // Same power on the right side (one tier below the `?`): the else
    // branch may itself be a ternary, nesting rightward.
    let else_branch = parse_expr(parser, bp.one_below())?;

    Ok(ExprWrapper::new(TernaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: else_branch.get_span().end.clone(),
        },
        condition: left,
        then_branch,
        else_branch,
    }))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    parser.advance(); // `(`
    parser.begin_group();

    let mut arguments = vec![];
    let result = (|parser: &mut Parser| {
        loop {
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::CloseParen {
                break;
            }
            arguments.push(parse_expr(parser, BindingPower::Default)?);
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
        Ok::<(), Error>(())
    })(parser);
    parser.end_group();
    result?;

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(ExprWrapper::new(CallExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: close.span.end,
        },
        callee: left,
        arguments,
    }))
}

pub fn parse_index_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    parser.advance(); // `[`
    parser.begin_group();
    let result = parse_expr(parser, BindingPower::Default);
    parser.end_group();
    let index = result?;
    let close = parser.expect(TokenKind::CloseBracket)?;

    Ok(ExprWrapper::new(IndexExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: close.span.end,
        },
        target: left,
        index,
    }))
}

pub fn parse_member_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    parser.advance(); // `.`
    parser.skip_newlines();
    let member = parser.expect(TokenKind::Identifier)?;

    Ok(ExprWrapper::new(MemberExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: member.span.end,
        },
        target: left,
        member: member.value,
    }))
}

/// Parses a parenthesized parameter list: `(` already current, consumed
/// here. Each parameter is `[...][Type] name [= default]`; the capitalized
/// type hint is kept as an opaque annotation.
pub fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;
    parser.begin_group();

    let mut parameters = vec![];
    let result = (|parser: &mut Parser| {
        loop {
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::CloseParen {
                break;
            }

            let start = parser.current_token().span.start.clone();
            let variadic = if parser.current_token_kind() == TokenKind::Ellipsis {
                parser.advance();
                true
            } else {
                false
            };

            let first = parser.expect(TokenKind::Identifier)?;
            // Two identifiers in a row: the first is the type hint.
            let (type_hint, name_token) = if parser.current_token_kind() == TokenKind::Identifier {
                (Some(first.value), parser.advance().clone())
            } else {
                (None, first)
            };

            let default = if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                Some(parse_expr(parser, BindingPower::Default)?)
            } else {
                None
            };

            parameters.push(Parameter {
                variadic,
                type_hint,
                name: name_token.value,
                span: Span {
                    start,
                    end: parser.previous_token_end(),
                },
                default,
            });

            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
        Ok::<(), Error>(())
    })(parser);
    parser.end_group();
    result?;

    parser.expect(TokenKind::CloseParen)?;

    Ok(parameters)
}
