use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

/// String literals switch the lexer into a dedicated scanning mode; an
/// interpolation opener `${` stacks a second mode on top so the region up to
/// the matching `}` is lexed with the ordinary pattern table again.
#[derive(Debug, Clone, Copy)]
enum Mode {
    Str,
    Interp { depth: u32 },
}

pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    errors: Vec<Error>,
    modes: Vec<Mode>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            line: 1,
            column: 1,
            tokens: vec![],
            errors: vec![],
            modes: vec![],
            patterns: vec![
                RegexPattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
                RegexPattern { regex: Regex::new(r"[0-9]+(\.[0-9]+([eE][+-]?[0-9]+)?)?(im|i)?").unwrap(), handler: number_handler },
                RegexPattern { regex: Regex::new("[ \t\r]+").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("\n").unwrap(), handler: newline_handler },
                RegexPattern { regex: Regex::new("//[^\n]*").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new(r"/\*").unwrap(), handler: block_comment_handler },
                RegexPattern { regex: Regex::new("\"").unwrap(), handler: string_open_handler },
                RegexPattern { regex: Regex::new(r"\{").unwrap(), handler: open_curly_handler },
                RegexPattern { regex: Regex::new(r"\}").unwrap(), handler: close_curly_handler },
                RegexPattern { regex: Regex::new(r"\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
                RegexPattern { regex: Regex::new(r"\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
                RegexPattern { regex: Regex::new(r"\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
                RegexPattern { regex: Regex::new(r"\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
                RegexPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
                RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
                RegexPattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
                RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
                RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
                RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
                RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
                RegexPattern { regex: Regex::new(r"\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
                RegexPattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
                RegexPattern { regex: Regex::new(r"\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=") },
                RegexPattern { regex: Regex::new("-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=") },
                RegexPattern { regex: Regex::new(r"\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=") },
                RegexPattern { regex: Regex::new("/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=") },
                RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
                RegexPattern { regex: Regex::new(r"\.\.\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...") },
                RegexPattern { regex: Regex::new(r"\.\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..") },
                RegexPattern { regex: Regex::new(r"\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
                RegexPattern { regex: Regex::new(";").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
                RegexPattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
                RegexPattern { regex: Regex::new(r"\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question, "?") },
                RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
                RegexPattern { regex: Regex::new("@").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::At, "@") },
                RegexPattern { regex: Regex::new(r"\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret, "^") },
                RegexPattern { regex: Regex::new(r"\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
                RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
                RegexPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
                RegexPattern { regex: Regex::new(r"\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
            ],
            source,
            file: file_name,
        }
    }

    pub fn position_at_cursor(&self) -> Position {
        Position {
            offset: self.pos as u32,
            line: self.line,
            column: self.column,
            file: Rc::clone(&self.file),
        }
    }

    /// Advances the cursor over `text`, keeping line and column in step.
    pub fn advance_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Records a diagnostic covering `span` and leaves a zero-width `Error`
    /// token at its end so the parser sees the defect in the stream.
    fn report_spanned(&mut self, error: ErrorImpl, span: Span) {
        let marker = Span {
            start: span.end.clone(),
            end: span.end.clone(),
        };
        self.errors.push(Error::new(error, span));
        self.push(MK_TOKEN!(TokenKind::Error, String::new(), marker));
    }

    fn report_here(&mut self, error: ErrorImpl) {
        let here = self.position_at_cursor();
        self.report_spanned(
            error,
            Span {
                start: here.clone(),
                end: here,
            },
        );
    }

    /// One step of string-mode scanning: a fragment, an escape, an
    /// interpolation opener or the closing quote.
    fn scan_string_part(&mut self) {
        let rem = self.remainder();
        let first = match rem.chars().next() {
            Some(c) => c,
            None => return,
        };

        match first {
            '"' => {
                let start = self.position_at_cursor();
                self.advance_str("\"");
                let span = Span {
                    start,
                    end: self.position_at_cursor(),
                };
                self.push(MK_TOKEN!(TokenKind::StringEnd, String::from("\""), span));
                self.modes.pop();
            }
            '\n' => {
                // The string never closed on this line; the caller
                // resynchronizes at the newline, which is lexed normally.
                self.report_here(ErrorImpl::UnterminatedString);
                self.modes.pop();
            }
            '\\' => self.scan_escape(),
            '$' if rem[first.len_utf8()..].starts_with('{') => {
                let start = self.position_at_cursor();
                self.advance_str("${");
                let span = Span {
                    start,
                    end: self.position_at_cursor(),
                };
                self.push(MK_TOKEN!(
                    TokenKind::InterpolationStart,
                    String::from("${"),
                    span
                ));
                self.modes.push(Mode::Interp { depth: 0 });
            }
            _ => {
                let mut text = String::new();
                let mut chars = rem.chars().peekable();
                while let Some(&c) = chars.peek() {
                    if c == '"' || c == '\\' || c == '\n' {
                        break;
                    }
                    if c == '$' {
                        let mut ahead = chars.clone();
                        ahead.next();
                        if ahead.peek() == Some(&'{') {
                            break;
                        }
                        // a lone `$` is ordinary text
                    }
                    text.push(c);
                    chars.next();
                }

                let start = self.position_at_cursor();
                self.advance_str(&text);
                let span = Span {
                    start,
                    end: self.position_at_cursor(),
                };
                self.push(MK_TOKEN!(TokenKind::StringFragment, text, span));
            }
        }
    }

    fn scan_escape(&mut self) {
        let start = self.position_at_cursor();
        let mut chars = self.remainder().chars();
        chars.next(); // backslash

        let designator = match chars.next() {
            Some(c) => c,
            None => {
                // Backslash at end of input; the unterminated-string report
                // happens when the mode stack unwinds.
                self.advance_str("\\");
                return;
            }
        };

        let decoded = match designator {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'x' | 'u' | 'U' => {
                let want = match designator {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(want).collect();
                if digits.len() == want && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    for _ in 0..want {
                        chars.next();
                    }
                    u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
            _ => None,
        };

        // Everything consumed so far, raw
        let consumed_len = self.remainder().len() - chars.as_str().len();
        let raw = self.remainder()[..consumed_len].to_string();
        self.advance_str(&raw);

        match decoded {
            Some(c) => {
                let span = Span {
                    start,
                    end: self.position_at_cursor(),
                };
                self.push(MK_TOKEN!(TokenKind::EscapeSequence, c.to_string(), span));
            }
            None => {
                let span = Span {
                    start,
                    end: self.position_at_cursor(),
                };
                self.report_spanned(
                    ErrorImpl::InvalidEscape {
                        escape: raw[1..].to_string(),
                    },
                    span,
                );
            }
        }
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.position_at_cursor();
    lexer.advance_str(&value);
    let span = Span {
        start,
        end: lexer.position_at_cursor(),
    };

    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        lexer.push(MK_TOKEN!(*kind, value, span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value, span));
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();

    // A letter run glued to the number that is not the imaginary suffix is a
    // malformed literal, e.g. `1e5` or `3.0q`.
    let tail: String = lexer.remainder()[matched.len()..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if !tail.is_empty() {
        let start = lexer.position_at_cursor();
        let literal = format!("{}{}", matched, tail);
        lexer.advance_str(&literal);
        let span = Span {
            start,
            end: lexer.position_at_cursor(),
        };
        lexer.report_spanned(ErrorImpl::InvalidNumericSuffix { literal }, span);
        return;
    }

    let kind = if matched.ends_with("im") || matched.ends_with('i') {
        TokenKind::Imaginary
    } else if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    let start = lexer.position_at_cursor();
    lexer.advance_str(&matched);
    let span = Span {
        start,
        end: lexer.position_at_cursor(),
    };
    lexer.push(MK_TOKEN!(kind, matched, span));
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    lexer.advance_str(&matched);
}

fn newline_handler(lexer: &mut Lexer, _regex: &Regex) {
    let start = lexer.position_at_cursor();
    lexer.advance_str("\n");
    let span = Span {
        start,
        end: lexer.position_at_cursor(),
    };
    lexer.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), span));
}

fn block_comment_handler(lexer: &mut Lexer, _regex: &Regex) {
    match lexer.remainder().find("*/") {
        Some(end) => {
            let text = lexer.remainder()[..end + 2].to_string();
            lexer.advance_str(&text);
        }
        None => {
            let text = lexer.remainder().to_string();
            let start = lexer.position_at_cursor();
            lexer.advance_str(&text);
            let span = Span {
                start,
                end: lexer.position_at_cursor(),
            };
            lexer.report_spanned(ErrorImpl::UnterminatedBlockComment, span);
        }
    }
}

fn string_open_handler(lexer: &mut Lexer, _regex: &Regex) {
    let start = lexer.position_at_cursor();
    lexer.advance_str("\"");
    let span = Span {
        start,
        end: lexer.position_at_cursor(),
    };
    lexer.push(MK_TOKEN!(TokenKind::StringStart, String::from("\""), span));
    lexer.modes.push(Mode::Str);
}

fn open_curly_handler(lexer: &mut Lexer, _regex: &Regex) {
    if let Some(Mode::Interp { depth }) = lexer.modes.last_mut() {
        *depth += 1;
    }
    let start = lexer.position_at_cursor();
    lexer.advance_str("{");
    let span = Span {
        start,
        end: lexer.position_at_cursor(),
    };
    lexer.push(MK_TOKEN!(TokenKind::OpenCurly, String::from("{"), span));
}

fn close_curly_handler(lexer: &mut Lexer, _regex: &Regex) {
    if let Some(Mode::Interp { depth }) = lexer.modes.last_mut() {
        if *depth == 0 {
            let start = lexer.position_at_cursor();
            lexer.advance_str("}");
            let span = Span {
                start,
                end: lexer.position_at_cursor(),
            };
            lexer.push(MK_TOKEN!(
                TokenKind::InterpolationEnd,
                String::from("}"),
                span
            ));
            lexer.modes.pop();
            return;
        }
        *depth -= 1;
    }

    let start = lexer.position_at_cursor();
    lexer.advance_str("}");
    let span = Span {
        start,
        end: lexer.position_at_cursor(),
    };
    lexer.push(MK_TOKEN!(TokenKind::CloseCurly, String::from("}"), span));
}

/// Tokenizes a whole source string.
///
/// Lexical errors never abort the scan: each is recorded as a diagnostic and
/// surfaced in the token stream as a zero-width `Error` token, so the caller
/// always receives a complete, EOF-terminated stream.
pub fn tokenize(source: String, file: Option<String>) -> (Vec<Token>, Vec<Error>) {
    let mut lex = Lexer::new(source, file);
    let patterns = lex.patterns.clone();

    while !lex.at_eof() {
        if let Some(Mode::Str) = lex.modes.last() {
            lex.scan_string_part();
            continue;
        }

        let mut matched = false;

        for pattern in patterns.iter() {
            let match_here = pattern.regex.find(lex.remainder());

            if let Some(found) = match_here {
                if found.start() == 0 {
                    (pattern.handler)(&mut lex, &pattern.regex);
                    matched = true;
                    break;
                }
            }
        }

        if !matched {
            let offending = match lex.remainder().chars().next() {
                Some(c) => c.to_string(),
                None => break,
            };
            let start = lex.position_at_cursor();
            lex.advance_str(&offending);
            let span = Span {
                start,
                end: lex.position_at_cursor(),
            };
            lex.report_spanned(ErrorImpl::UnrecognisedToken { token: offending }, span);
        }
    }

    // Anything still on the mode stack never found its closing delimiter.
    while let Some(mode) = lex.modes.pop() {
        match mode {
            Mode::Str => lex.report_here(ErrorImpl::UnterminatedString),
            Mode::Interp { .. } => lex.report_here(ErrorImpl::UnterminatedInterpolation),
        }
    }

    let eof = lex.position_at_cursor();
    lex.push(MK_TOKEN!(
        TokenKind::EOF,
        String::from("EOF"),
        Span {
            start: eof.clone(),
            end: eof
        }
    ));

    (lex.tokens, lex.errors)
}
