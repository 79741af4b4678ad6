use crate::{
    ast::{
        ast::{Expr, ExprType, StmtWrapper},
        expressions::{IdentifierExpr, StringExpr, StringSegment},
        statements::{
            BlockStmt, BreakStmt, CatchHandler, ClassDeclStmt, ContinueStmt, DoWhileStmt,
            ErrorStmt, ExpressionStmt, FnDeclStmt, ForInStmt, ForStmt, IfStmt, ImportStmt,
            MethodDeclStmt, PrintStmt, ReturnStmt, TryStmt, VarDeclStmt, VariableDeclarator,
            WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    ambiguity::{brace_starts_dictionary, fn_starts_definition},
    expr::{parse_expr, parse_parameters, parse_string_expr},
    lookups::BindingPower,
    parser::Parser,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    if parser.get_stmt_lookup().contains_key(&parser.current_token_kind()) {
        return parser.get_stmt_lookup().get(&parser.current_token_kind()).unwrap()(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect_terminator()?;

    Ok(StmtWrapper::new(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone(); // `var`

    let mut declarations = vec![];
    loop {
        let error = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected identifier during variable declaration"),
            },
            parser.current_token().span.clone(),
        );
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

        let initializer = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        declarations.push(VariableDeclarator {
            span: Span {
                start: name.span.start.clone(),
                end: parser.previous_token_end(),
            },
            name: name.value,
            initializer,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            parser.skip_newlines();
        } else {
            break;
        }
    }

    parser.expect_terminator()?;

    Ok(StmtWrapper::new(VarDeclStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        declarations,
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_terminator()?;

    Ok(StmtWrapper::new(PrintStmt {
        span: Span {
            start: start_token.span.start,
            end: value.get_span().end.clone(),
        },
        value,
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    parser.begin_group();
    let result = parse_expr(parser, BindingPower::Default);
    parser.end_group();
    let condition = result?;
    parser.expect(TokenKind::CloseParen)?;

    parser.skip_newlines();
    let then_body = parse_stmt(parser)?;

    // `else` binds to the nearest `if`: the innermost call claims it first.
    parser.skip_newlines();
    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        parser.skip_newlines();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    Ok(StmtWrapper::new(IfStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        condition,
        then_body,
        else_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    parser.begin_group();
    let result = parse_expr(parser, BindingPower::Default);
    parser.end_group();
    let condition = result?;
    parser.expect(TokenKind::CloseParen)?;

    parser.skip_newlines();
    let body = parse_stmt(parser)?;

    Ok(StmtWrapper::new(WhileStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        condition,
        body,
    }))
}

/// Both `for` forms share the header parenthesis. Two tokens of lookahead
/// pick the for-in form; anything else is the three-clause C-style form
/// with every clause optional.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    parser.begin_group();
    parser.skip_newlines();

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::In
    {
        let binding = parser.advance().value.clone();
        parser.advance(); // `in`
        let result = parse_expr(parser, BindingPower::Default);
        parser.end_group();
        let iterable = result?;
        parser.expect(TokenKind::CloseParen)?;

        parser.skip_newlines();
        let body = parse_stmt(parser)?;

        return Ok(StmtWrapper::new(ForInStmt {
            span: Span {
                start: start_token.span.start,
                end: parser.previous_token_end(),
            },
            binding,
            iterable,
            body,
        }));
    }

    let header = (|parser: &mut Parser| {
        let init = if parser.current_token_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(parse_expr(parser, BindingPower::Default)?)
        };
        parser.expect(TokenKind::Semicolon)?;
        parser.skip_newlines();

        let condition = if parser.current_token_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(parse_expr(parser, BindingPower::Default)?)
        };
        parser.expect(TokenKind::Semicolon)?;
        parser.skip_newlines();

        let update = if parser.current_token_kind() == TokenKind::CloseParen {
            None
        } else {
            Some(parse_expr(parser, BindingPower::Default)?)
        };

        Ok::<_, Error>((init, condition, update))
    })(parser);
    parser.end_group();
    let (init, condition, update) = header?;
    parser.expect(TokenKind::CloseParen)?;

    parser.skip_newlines();
    let body = parse_stmt(parser)?;

    Ok(StmtWrapper::new(ForStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        init,
        condition,
        update,
        body,
    }))
}

pub fn parse_do_while_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone(); // `do`

    parser.skip_newlines();
    let body = parse_stmt(parser)?;

    parser.skip_newlines();
    parser.expect(TokenKind::While)?;
    parser.expect(TokenKind::OpenParen)?;
    parser.begin_group();
    let result = parse_expr(parser, BindingPower::Default);
    parser.end_group();
    let condition = result?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect_terminator()?;

    Ok(StmtWrapper::new(DoWhileStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        body,
        condition,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone();

    let value = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::Newline | TokenKind::EOF | TokenKind::CloseCurly => None,
        _ => Some(parse_expr(parser, BindingPower::Default)?),
    };

    parser.expect_terminator()?;

    Ok(StmtWrapper::new(ReturnStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        value,
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let token = parser.advance().clone();
    parser.expect_terminator()?;

    Ok(StmtWrapper::new(BreakStmt { span: token.span }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let token = parser.advance().clone();
    parser.expect_terminator()?;

    Ok(StmtWrapper::new(ContinueStmt { span: token.span }))
}

/// `import <string|identifier> [for a, b, ...] [as alias]`. Only the
/// surface syntax is parsed; nothing is resolved.
pub fn parse_import_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone();

    let module = match parser.current_token_kind() {
        TokenKind::StringStart => parse_string_expr(parser)?,
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            crate::ast::ast::ExprWrapper::new(IdentifierExpr {
                name: token.value,
                span: token.span,
            })
        }
        _ => {
            let token = parser.current_token();
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.value.clone(),
                    message: String::from("expected a module name or path after `import`"),
                },
                token.span.clone(),
            ));
        }
    };

    let mut members = vec![];
    if parser.current_token_kind() == TokenKind::For {
        parser.advance();
        loop {
            members.push(parser.expect(TokenKind::Identifier)?.value);
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                // trailing comma before `as` or the terminator
                if parser.current_token_kind() != TokenKind::Identifier {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let alias = if parser.current_token_kind() == TokenKind::As {
        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    parser.expect_terminator()?;

    Ok(StmtWrapper::new(ImportStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        module,
        members,
        alias,
    }))
}

/// `try stmt catch { (pattern [with name] stmt)* }`. Each handler matches
/// by the literal text of its pattern string.
pub fn parse_try_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone(); // `try`

    parser.skip_newlines();
    let body = parse_stmt(parser)?;

    parser.skip_newlines();
    parser.expect(TokenKind::Catch)?;
    parser.skip_newlines();
    parser.expect(TokenKind::OpenCurly)?;

    let mut handlers = vec![];
    loop {
        parser.skip_newlines();
        if matches!(
            parser.current_token_kind(),
            TokenKind::CloseCurly | TokenKind::EOF
        ) {
            break;
        }

        let handler_start = parser.current_token().span.start.clone();
        let pattern = parse_catch_pattern(parser)?;

        let binding = if parser.current_token_kind() == TokenKind::With {
            parser.advance();
            Some(parser.expect(TokenKind::Identifier)?.value)
        } else {
            None
        };

        parser.skip_newlines();
        let handler_body = parse_stmt(parser)?;

        handlers.push(CatchHandler {
            span: Span {
                start: handler_start,
                end: parser.previous_token_end(),
            },
            pattern,
            binding,
            body: handler_body,
        });
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(StmtWrapper::new(TryStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        body,
        handlers,
    }))
}

/// A catch pattern is a plain string literal; interpolation makes no sense
/// in an error tag and is rejected.
fn parse_catch_pattern(parser: &mut Parser) -> Result<String, Error> {
    if parser.current_token_kind() != TokenKind::StringStart {
        let token = parser.current_token();
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("expected a string pattern in catch block"),
            },
            token.span.clone(),
        ));
    }

    let pattern = parse_string_expr(parser)?;
    if pattern.get_expr_type() == ExprType::String {
        if let Some(string) = pattern.as_any().downcast_ref::<StringExpr>() {
            let interpolated = string
                .segments
                .iter()
                .any(|segment| matches!(segment, StringSegment::Interpolation(_)));
            if interpolated {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: String::from("${"),
                        message: String::from("interpolation is not allowed in a catch pattern"),
                    },
                    string.span.clone(),
                ));
            }
            return Ok(string.literal_text());
        }
    }

    Ok(String::new())
}

/// Statement-position `{`: a bounded scan decides between a block and an
/// expression statement that begins with a dictionary literal.
pub fn parse_block_or_dict_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    if brace_starts_dictionary(parser) {
        parse_expression_stmt(parser)
    } else {
        parse_block_stmt(parser)
    }
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    Ok(StmtWrapper::new(parse_block(parser)?))
}

/// Parses a brace-delimited block, recovering inside it: a malformed
/// statement becomes a diagnostic plus an error marker, and the scan
/// resumes at the next boundary so the rest of the block still parses.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start_token = parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    loop {
        parser.skip_newlines();
        if matches!(
            parser.current_token_kind(),
            TokenKind::CloseCurly | TokenKind::EOF
        ) {
            break;
        }

        let before = parser.position();
        match parse_stmt(parser) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                let error_start = error.get_span().start.clone();
                parser.record_error(error);
                parser.synchronize();
                if parser.position() == before {
                    parser.advance();
                }
                statements.push(StmtWrapper::new(ErrorStmt {
                    span: Span {
                        start: error_start,
                        end: parser.previous_token_end(),
                    },
                }));
            }
        }
    }

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body: statements,
        span: Span {
            start: start_token.span.start,
            end: close.span.end,
        },
    })
}

/// `fn` at statement position: a named definition when an identifier
/// follows, otherwise the expression grammar owns the token.
pub fn parse_fn_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    if !fn_starts_definition(parser) {
        return parse_expression_stmt(parser);
    }

    let start_token = parser.advance().clone(); // `fn`
    let name = parser.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(parser)?;
    parser.skip_newlines();
    let body = parse_block(parser)?;

    Ok(StmtWrapper::new(FnDeclStmt {
        span: Span {
            start: start_token.span.start,
            end: body.span.end.clone(),
        },
        name,
        parameters,
        body,
    }))
}

/// `class Name [is Super] [with Mixin, ...] { members }`. Inside the body,
/// `var` opens a field declaration and any other identifier-led member is a
/// method.
pub fn parse_class_decl_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start_token = parser.advance().clone(); // `class`
    let name = parser.expect(TokenKind::Identifier)?.value;

    let superclass = if parser.current_token_kind() == TokenKind::Is {
        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    let mut mixins = vec![];
    if parser.current_token_kind() == TokenKind::With {
        parser.advance();
        loop {
            mixins.push(parser.expect(TokenKind::Identifier)?.value);
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                if parser.current_token_kind() != TokenKind::Identifier {
                    break;
                }
            } else {
                break;
            }
        }
    }

    parser.skip_newlines();
    parser.expect(TokenKind::OpenCurly)?;

    let mut members = vec![];
    loop {
        parser.skip_newlines();
        match parser.current_token_kind() {
            TokenKind::CloseCurly | TokenKind::EOF => break,
            TokenKind::Var => members.push(parse_var_decl_stmt(parser)?),
            TokenKind::Identifier => {
                let method_start = parser.advance().clone();
                let parameters = parse_parameters(parser)?;
                parser.skip_newlines();
                let body = parse_block(parser)?;
                members.push(StmtWrapper::new(MethodDeclStmt {
                    span: Span {
                        start: method_start.span.start,
                        end: body.span.end.clone(),
                    },
                    name: method_start.value,
                    parameters,
                    body,
                }));
            }
            _ => {
                let token = parser.current_token();
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: String::from(
                            "expected a method or field declaration in class body",
                        ),
                    },
                    token.span.clone(),
                ));
            }
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(StmtWrapper::new(ClassDeclStmt {
        span: Span {
            start: start_token.span.start,
            end: parser.previous_token_end(),
        },
        name,
        superclass,
        mixins,
        members,
    }))
}
