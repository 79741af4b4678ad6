//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parse entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! A parse never fails as a whole: statement-level errors are collected in
//! the diagnostics sink and recovery resumes at the next statement boundary.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::Program,
        ast::StmtWrapper,
        statements::ErrorStmt,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream, the handler lookup tables, the
/// diagnostics sink and the bracket-nesting depth that drives the newline
/// termination policy.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Diagnostics collected so far; parsing continues past them
    errors: Vec<Error>,
    /// How many bracketed constructs enclose the cursor. Newlines only
    /// terminate statements when this is zero.
    group_depth: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            errors: Vec::new(),
            group_depth: 0,
        }
    }

    /// Returns the current token without advancing. Once the cursor reaches
    /// the end of the stream this keeps returning the EOF token.
    pub fn current_token(&self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Looks `offset` tokens past the cursor without advancing.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    /// Advances to the next token and returns the consumed token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// End position of the most recently consumed token; used to close
    /// node spans.
    pub fn previous_token_end(&self) -> Position {
        if self.pos == 0 {
            self.tokens[0].span.start.clone()
        } else {
            let index = (self.pos - 1).min(self.tokens.len() - 1);
            self.tokens[index].span.end.clone()
        }
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        let kind = token.kind;
        if kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes a statement terminator: `;` and newline are interchangeable
    /// and consumed; EOF and a closing `}` end the statement without being
    /// consumed.
    pub fn expect_terminator(&mut self) -> Result<(), Error> {
        match self.current_token_kind() {
            TokenKind::Semicolon | TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::EOF | TokenKind::CloseCurly => Ok(()),
            _ => {
                let token = self.current_token();
                Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: String::from("expected `;` or a newline to end the statement"),
                    },
                    token.span.clone(),
                ))
            }
        }
    }

    /// Skips newline tokens. Used wherever a newline cannot terminate
    /// anything: between statements, inside bracketed constructs and where
    /// an operand is still required.
    pub fn skip_newlines(&mut self) {
        while self.current_token_kind() == TokenKind::Newline {
            self.advance();
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.pos < self.tokens.len() && self.current_token_kind() != TokenKind::EOF
    }

    pub fn begin_group(&mut self) {
        self.group_depth += 1;
    }

    pub fn end_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
    }

    pub fn in_group(&self) -> bool {
        self.group_depth > 0
    }

    pub fn record_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Returns the name of the source file being parsed.
    pub fn get_file(&self) -> &Rc<String> {
        &self.file
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token. Only LED
    /// registration assigns a binding power; a NUD token that never
    /// continues an expression must not trip the continuation loop.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Discards tokens until a statement boundary: past the next terminator,
    /// or up to (not past) a closing brace or a token that can begin a
    /// statement. Resets the group depth a failed construct left behind.
    pub fn synchronize(&mut self) {
        self.group_depth = 0;

        if !matches!(
            self.current_token_kind(),
            TokenKind::CloseCurly | TokenKind::EOF
        ) {
            self.advance(); // skip the token that caused the error
        }

        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::Semicolon | TokenKind::Newline => {
                    self.advance();
                    return;
                }
                TokenKind::CloseCurly
                | TokenKind::Var
                | TokenKind::Print
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Do
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Import
                | TokenKind::Try
                | TokenKind::Fn
                | TokenKind::Class => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }
}

/// Parses a stream of tokens into a Program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, and parses statements until EOF. A
/// malformed statement is recorded as a diagnostic and replaced by an
/// error-marker node; the statements around it still parse.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let start = parser.tokens[0].span.start.clone();
    let mut body = vec![];

    while parser.has_tokens() {
        parser.skip_newlines();
        if !parser.has_tokens() {
            break;
        }

        let before = parser.position();
        match parse_stmt(&mut parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => {
                let error_start = error.get_span().start.clone();
                parser.record_error(error);
                parser.synchronize();
                if parser.position() == before {
                    // The offending token begins no statement; step over it
                    // so recovery always makes progress.
                    parser.advance();
                }
                body.push(StmtWrapper::new(ErrorStmt {
                    span: Span {
                        start: error_start,
                        end: parser.previous_token_end(),
                    },
                }));
            }
        }
    }

    let end = parser
        .tokens
        .last()
        .map(|token| token.span.end.clone())
        .unwrap_or_else(|| start.clone());

    let program = Program {
        body,
        span: Span { start, end },
    };

    (program, parser.errors)
}
