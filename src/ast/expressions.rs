use std::any::Any;

use crate::{lexer::tokens::Token, Span};

use super::{
    ast::{unparse_parameters, Expr, ExprType, ExprWrapper, Parameter},
    statements::BlockStmt,
};

fn unparse_float(value: f64) -> String {
    let mut out = format!("{:?}", value);
    // A float literal always carries a decimal point in source form.
    if !out.contains('.') {
        match out.find(['e', 'E']) {
            Some(idx) => out.insert_str(idx, ".0"),
            None => out.push_str(".0"),
        }
    }
    out
}

fn unparse_escape(c: char) -> String {
    match c {
        '\\' => String::from("\\\\"),
        '\'' => String::from("\\'"),
        '"' => String::from("\\\""),
        '\n' => String::from("\\n"),
        '\r' => String::from("\\r"),
        '\t' => String::from("\\t"),
        c if (c as u32) <= 0xFFFF => format!("\\u{:04x}", c as u32),
        c => format!("\\U{:08x}", c as u32),
    }
}

fn unparse_list(expressions: &[ExprWrapper]) -> String {
    expressions
        .iter()
        .map(|expr| expr.unparse())
        .collect::<Vec<String>>()
        .join(", ")
}

// LITERALS

/// Identifier Expression
/// Represents a plain name reference in the AST.
#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

impl Expr for IdentifierExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Identifier
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        self.name.clone()
    }
}

/// Integer Expression
/// Represents an integer literal in the AST.
#[derive(Debug, Clone)]
pub struct IntegerExpr {
    pub value: i64,
    pub span: Span,
}

impl Expr for IntegerExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Integer
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        self.value.to_string()
    }
}

/// Float Expression
/// Represents a floating-point literal in the AST.
#[derive(Debug, Clone)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
}

impl Expr for FloatExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Float
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        unparse_float(self.value)
    }
}

/// Imaginary Expression
/// Represents an imaginary-number literal, a numeric literal glued to an
/// `im` (or `i`) suffix.
#[derive(Debug, Clone)]
pub struct ImaginaryExpr {
    pub value: f64,
    pub span: Span,
}

impl Expr for ImaginaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Imaginary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        if self.value.fract() == 0.0 {
            format!("{}im", self.value as i64)
        } else {
            format!("{}im", unparse_float(self.value))
        }
    }
}

/// One piece of a string literal: plain text, a decoded escape, or a full
/// expression embedded through `${...}`.
#[derive(Debug, Clone)]
pub enum StringSegment {
    Text(String),
    Escape(char),
    Interpolation(ExprWrapper),
}

/// String Expression
/// Represents a string literal as its ordered segments.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub segments: Vec<StringSegment>,
    pub span: Span,
}

impl StringExpr {
    /// The literal text of the string with escapes decoded, ignoring any
    /// interpolated expressions.
    pub fn literal_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                StringSegment::Text(text) => out.push_str(text),
                StringSegment::Escape(c) => out.push(*c),
                StringSegment::Interpolation(_) => {}
            }
        }
        out
    }
}

impl Expr for StringExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::String
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let mut out = String::from("\"");
        for segment in &self.segments {
            match segment {
                StringSegment::Text(text) => out.push_str(text),
                StringSegment::Escape(c) => out.push_str(&unparse_escape(*c)),
                StringSegment::Interpolation(expr) => {
                    out.push_str("${");
                    out.push_str(&expr.unparse());
                    out.push('}');
                }
            }
        }
        out.push('"');
        out
    }
}

/// Boolean Expression
#[derive(Debug, Clone)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

impl Expr for BooleanExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Boolean
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        if self.value {
            String::from("true")
        } else {
            String::from("false")
        }
    }
}

/// Nil Expression
#[derive(Debug, Clone)]
pub struct NilExpr {
    pub span: Span,
}

impl Expr for NilExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Nil
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        String::from("nil")
    }
}

/// Self Expression
/// Represents the receiver reference inside a method body.
#[derive(Debug, Clone)]
pub struct SelfExpr {
    pub span: Span,
}

impl Expr for SelfExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::SelfRef
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        String::from("self")
    }
}

/// Super Expression
/// Always carries the accessed member; bare `super` is not a valid
/// expression.
#[derive(Debug, Clone)]
pub struct SuperExpr {
    pub member: String,
    pub span: Span,
}

impl Expr for SuperExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::SuperRef
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("super.{}", self.member)
    }
}

/// List Expression
#[derive(Debug, Clone)]
pub struct ListExpr {
    pub elements: Vec<ExprWrapper>,
    pub span: Span,
}

impl Expr for ListExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::List
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("[{}]", unparse_list(&self.elements))
    }
}

/// A key/value pair of a dictionary literal; both sides are full
/// expressions.
#[derive(Debug, Clone)]
pub struct DictEntry {
    pub key: ExprWrapper,
    pub value: ExprWrapper,
    pub span: Span,
}

/// Dictionary Expression
#[derive(Debug, Clone)]
pub struct DictExpr {
    pub entries: Vec<DictEntry>,
    pub span: Span,
}

impl Expr for DictExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Dictionary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let entries = self
            .entries
            .iter()
            .map(|entry| format!("{}: {}", entry.key.unparse(), entry.value.unparse()))
            .collect::<Vec<String>>()
            .join(", ");
        format!("{{ {} }}", entries)
    }
}

/// Symbol Expression
/// Represents a `:name` literal.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub name: String,
    pub span: Span,
}

impl Expr for SymbolExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Symbol
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(":{}", self.name)
    }
}

/// Parenthesized Expression
/// The explicit node keeps the author's grouping, which is what makes the
/// canonical rendering re-parse to the same shape.
#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub inner: ExprWrapper,
    pub span: Span,
}

impl Expr for ParenExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Paren
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("({})", self.inner.unparse())
    }
}

// COMPLEX

/// Prefix Expression
/// Represents a prefix operation (`-`, `!` or `@`) on an expression.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub operand: ExprWrapper,
    pub span: Span,
}

impl Expr for PrefixExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Prefix
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("{}{}", self.operator.value, self.operand.unparse())
    }
}

/// Binary Expression
/// Represents a binary operation between two expressions.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: ExprWrapper,
    pub operator: Token,
    pub right: ExprWrapper,
    pub span: Span,
}

impl Expr for BinaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Binary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "{} {} {}",
            self.left.unparse(),
            self.operator.value,
            self.right.unparse()
        )
    }
}

/// Ternary Expression
/// Represents the `condition ? then : else` conditional.
#[derive(Debug, Clone)]
pub struct TernaryExpr {
    pub condition: ExprWrapper,
    pub then_branch: ExprWrapper,
    pub else_branch: ExprWrapper,
    pub span: Span,
}

impl Expr for TernaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Ternary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "{} ? {} : {}",
            self.condition.unparse(),
            self.then_branch.unparse(),
            self.else_branch.unparse()
        )
    }
}

/// Assignment Expression
/// Represents plain and compound assignment.
#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: ExprWrapper,
    pub operator: Token,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Expr for AssignmentExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Assignment
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "{} {} {}",
            self.assignee.unparse(),
            self.operator.value,
            self.value.unparse()
        )
    }
}

/// Call Expression
/// Represents a function or method call.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: ExprWrapper,
    pub arguments: Vec<ExprWrapper>,
    pub span: Span,
}

impl Expr for CallExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Call
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("{}({})", self.callee.unparse(), unparse_list(&self.arguments))
    }
}

/// Index Expression
/// Represents subscripting, `target[index]`.
#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub target: ExprWrapper,
    pub index: ExprWrapper,
    pub span: Span,
}

impl Expr for IndexExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Index
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("{}[{}]", self.target.unparse(), self.index.unparse())
    }
}

/// Member Expression
/// Represents member access by name, `target.member`.
#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub target: ExprWrapper,
    pub member: String,
    pub span: Span,
}

impl Expr for MemberExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Member
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("{}.{}", self.target.unparse(), self.member)
    }
}

/// Function Expression
/// An `fn` used in expression position; the name is optional and purely
/// decorative there.
#[derive(Debug, Clone)]
pub struct FnExpr {
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

impl Expr for FnExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Function
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        use crate::ast::ast::Stmt;
        match &self.name {
            Some(name) => format!(
                "fn {}({}) {}",
                name,
                unparse_parameters(&self.parameters),
                self.body.unparse()
            ),
            None => format!(
                "fn ({}) {}",
                unparse_parameters(&self.parameters),
                self.body.unparse()
            ),
        }
    }
}

/// Error Expression
/// Placeholder left where no valid expression could be produced.
#[derive(Debug, Clone)]
pub struct ErrorExpr {
    pub span: Span,
}

impl Expr for ErrorExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Error
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        String::from("nil")
    }
}
