use std::collections::HashMap;

use crate::{
    ast::ast::{ExprWrapper, StmtWrapper},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator tiers, loosest to tightest. The Pratt loop continues while the
/// next operator's power is strictly greater than the floor it was called
/// with, so left association falls out of parsing the right side at the
/// operator's own tier and right association out of parsing one tier lower.
///
/// `Power` (`^`) is the tightest binary operator but still looser than the
/// postfix forms (call, index, member).
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Ternary,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Range,
    Additive,
    Multiplicative,
    Unary,
    Power,
    Postfix,
    Primary,
}

impl BindingPower {
    /// The tier right below this one; right-associative operators parse
    /// their right-hand side at this floor so an equal-power operator still
    /// continues the recursion.
    pub fn one_below(self) -> BindingPower {
        match self {
            BindingPower::Default => BindingPower::Default,
            BindingPower::Assignment => BindingPower::Default,
            BindingPower::Ternary => BindingPower::Assignment,
            BindingPower::LogicalOr => BindingPower::Ternary,
            BindingPower::LogicalAnd => BindingPower::LogicalOr,
            BindingPower::Equality => BindingPower::LogicalAnd,
            BindingPower::Relational => BindingPower::Equality,
            BindingPower::Range => BindingPower::Relational,
            BindingPower::Additive => BindingPower::Range,
            BindingPower::Multiplicative => BindingPower::Additive,
            BindingPower::Unary => BindingPower::Multiplicative,
            BindingPower::Power => BindingPower::Unary,
            BindingPower::Postfix => BindingPower::Power,
            BindingPower::Primary => BindingPower::Postfix,
        }
    }
}

pub type StmtHandler = fn(&mut Parser) -> Result<StmtWrapper, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<ExprWrapper, Error>;
pub type LEDHandler = fn(&mut Parser, ExprWrapper, BindingPower) -> Result<ExprWrapper, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Assignment, right-associative
    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::PlusEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::MinusEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::StarEquals, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::SlashEquals, BindingPower::Assignment, parse_assignment_expr);

    // Ternary, right-associative
    parser.led(TokenKind::Question, BindingPower::Ternary, parse_ternary_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Equality and relational
    parser.led(TokenKind::Equals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);

    // Ranges
    parser.led(TokenKind::DotDot, BindingPower::Range, parse_binary_expr);
    parser.led(TokenKind::Ellipsis, BindingPower::Range, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);

    // Power binds tighter than any other binary operator
    parser.led(TokenKind::Caret, BindingPower::Power, parse_binary_expr);

    // Postfix forms
    parser.led(TokenKind::OpenParen, BindingPower::Postfix, parse_call_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Postfix, parse_index_expr);
    parser.led(TokenKind::Dot, BindingPower::Postfix, parse_member_expr);

    // Literals and primaries
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::Imaginary, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Nil, parse_primary_expr);
    parser.nud(TokenKind::SelfKw, parse_primary_expr);
    parser.nud(TokenKind::StringStart, parse_string_expr);
    parser.nud(TokenKind::Super, parse_super_expr);
    parser.nud(TokenKind::Colon, parse_symbol_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::At, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_list_expr);
    // At expression position a brace can only open a dictionary
    parser.nud(TokenKind::OpenCurly, parse_dict_expr);
    parser.nud(TokenKind::Fn, parse_fn_expr);
    parser.nud(TokenKind::Error, parse_error_expr);

    // Statements
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::Print, parse_print_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Do, parse_do_while_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::Import, parse_import_stmt);
    parser.stmt(TokenKind::Try, parse_try_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_or_dict_stmt);
    parser.stmt(TokenKind::Fn, parse_fn_stmt);
    parser.stmt(TokenKind::Class, parse_class_decl_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
