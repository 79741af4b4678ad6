use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("print", TokenKind::Print);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("do", TokenKind::Do);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("import", TokenKind::Import);
        map.insert("as", TokenKind::As);
        map.insert("try", TokenKind::Try);
        map.insert("catch", TokenKind::Catch);
        map.insert("with", TokenKind::With);
        map.insert("is", TokenKind::Is);
        map.insert("fn", TokenKind::Fn);
        map.insert("class", TokenKind::Class);
        // `and`/`or` are spellings of `&&`/`||`; the token value keeps
        // the spelling the author wrote.
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("nil", TokenKind::Nil);
        map.insert("self", TokenKind::SelfKw);
        map.insert("super", TokenKind::Super);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    /// Zero-width marker left behind by a lexical error.
    Error,

    Integer,
    Float,
    Imaginary,
    Identifier,

    // String literals are lexed as a sub-token sequence so interpolation
    // can hand the region between `${` and `}` to the expression parser.
    StringStart,
    StringFragment,
    EscapeSequence,
    InterpolationStart,
    InterpolationEnd,
    StringEnd,

    /// Statement terminator, interchangeable with `;` at statement level.
    Newline,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    DotDot,
    Ellipsis,
    Semicolon,
    Colon,
    Question,
    Comma,
    At,
    Caret,

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Var,
    Print,
    If,
    Else,
    While,
    For,
    In,
    Do,
    Return,
    Break,
    Continue,
    Import,
    As,
    Try,
    Catch,
    With,
    Is,
    Fn,
    Class,
    True,
    False,
    Nil,
    SelfKw,
    Super,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: Vec<TokenKind>) -> bool {
        for token in tokens {
            if token == self.kind {
                return true;
            }
        }

        false
    }

    pub fn debug(&self) {
        if self.is_one_of_many(vec![
            TokenKind::StringFragment,
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::Imaginary,
        ]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}
