use std::{
    any::Any,
    slice::{Iter, IterMut},
};

use crate::Span;

use super::ast::{unparse_parameters, Expr, ExprWrapper, Parameter, Stmt, StmtType, StmtWrapper};

/// Renders a catch-handler pattern back to a plain string literal. `$` is
/// escaped so the rendering can never re-lex as an interpolation opener.
fn quote_pattern(text: &str) -> String {
    let mut out = String::from("\"");
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' => out.push_str("\\u0024"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, StmtWrapper> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, StmtWrapper> {
        self.body.iter_mut()
    }
}

impl Stmt for BlockStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::BlockStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        if self.body.is_empty() {
            return String::from("{ }");
        }
        let body = self
            .body
            .iter()
            .map(|stmt| stmt.unparse())
            .collect::<Vec<String>>()
            .join(" ");
        format!("{{ {} }}", body)
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: ExprWrapper,
    pub span: Span,
}

impl Stmt for ExpressionStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ExpressionStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("{};", self.expression.unparse())
    }
}

/// One `name [= initializer]` unit of a `var` statement or class field.
#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub name: String,
    pub initializer: Option<ExprWrapper>,
    pub span: Span,
}

impl VariableDeclarator {
    fn unparse(&self) -> String {
        match &self.initializer {
            Some(init) => format!("{} = {}", self.name, init.unparse()),
            None => self.name.clone(),
        }
    }
}

/// A `var` statement: an ordered list of declarators.
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

impl Stmt for VarDeclStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::VarDeclStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let declarations = self
            .declarations
            .iter()
            .map(|declarator| declarator.unparse())
            .collect::<Vec<String>>()
            .join(", ");
        format!("var {};", declarations)
    }
}

#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub value: ExprWrapper,
    pub span: Span,
}

impl Stmt for PrintStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::PrintStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("print {};", self.value.unparse())
    }
}

/// `else` binds to the nearest `if`.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: ExprWrapper,
    pub then_body: StmtWrapper,
    pub else_body: Option<StmtWrapper>,
    pub span: Span,
}

impl Stmt for IfStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::IfStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        match &self.else_body {
            Some(else_body) => format!(
                "if ({}) {} else {}",
                self.condition.unparse(),
                self.then_body.unparse(),
                else_body.unparse()
            ),
            None => format!(
                "if ({}) {}",
                self.condition.unparse(),
                self.then_body.unparse()
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: ExprWrapper,
    pub body: StmtWrapper,
    pub span: Span,
}

impl Stmt for WhileStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::WhileStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!("while ({}) {}", self.condition.unparse(), self.body.unparse())
    }
}

/// The three-clause C-style `for`; every clause is optional.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<ExprWrapper>,
    pub condition: Option<ExprWrapper>,
    pub update: Option<ExprWrapper>,
    pub body: StmtWrapper,
    pub span: Span,
}

impl Stmt for ForStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ForStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let clause = |clause: &Option<ExprWrapper>| match clause {
            Some(expr) => expr.unparse(),
            None => String::new(),
        };
        format!(
            "for ({}; {}; {}) {}",
            clause(&self.init),
            clause(&self.condition),
            clause(&self.update),
            self.body.unparse()
        )
    }
}

/// The `for (binding in iterable)` form.
#[derive(Debug, Clone)]
pub struct ForInStmt {
    pub binding: String,
    pub iterable: ExprWrapper,
    pub body: StmtWrapper,
    pub span: Span,
}

impl Stmt for ForInStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ForInStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "for ({} in {}) {}",
            self.binding,
            self.iterable.unparse(),
            self.body.unparse()
        )
    }
}

#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub body: StmtWrapper,
    pub condition: ExprWrapper,
    pub span: Span,
}

impl Stmt for DoWhileStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::DoWhileStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "do {} while ({});",
            self.body.unparse(),
            self.condition.unparse()
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<ExprWrapper>,
    pub span: Span,
}

impl Stmt for ReturnStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ReturnStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        match &self.value {
            Some(value) => format!("return {};", value.unparse()),
            None => String::from("return;"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

impl Stmt for BreakStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::BreakStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        String::from("break;")
    }
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub span: Span,
}

impl Stmt for ContinueStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ContinueStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        String::from("continue;")
    }
}

/// `import <string|identifier> [for a, b] [as alias]`. Only the surface
/// syntax is recorded; module resolution happens elsewhere.
#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub module: ExprWrapper,
    pub members: Vec<String>,
    pub alias: Option<String>,
    pub span: Span,
}

impl Stmt for ImportStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ImportStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let mut out = format!("import {}", self.module.unparse());
        if !self.members.is_empty() {
            out.push_str(" for ");
            out.push_str(&self.members.join(", "));
        }
        if let Some(alias) = &self.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
        out.push(';');
        out
    }
}

/// One arm of a `catch` block: a literal error-tag pattern, an optional
/// bound name for the caught value, and the handler body.
#[derive(Debug, Clone)]
pub struct CatchHandler {
    pub pattern: String,
    pub binding: Option<String>,
    pub body: StmtWrapper,
    pub span: Span,
}

impl CatchHandler {
    fn unparse(&self) -> String {
        match &self.binding {
            Some(binding) => format!(
                "{} with {} {}",
                quote_pattern(&self.pattern),
                binding,
                self.body.unparse()
            ),
            None => format!("{} {}", quote_pattern(&self.pattern), self.body.unparse()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TryStmt {
    pub body: StmtWrapper,
    pub handlers: Vec<CatchHandler>,
    pub span: Span,
}

impl Stmt for TryStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::TryStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let handlers = self
            .handlers
            .iter()
            .map(|handler| handler.unparse())
            .collect::<Vec<String>>()
            .join(" ");
        format!("try {} catch {{ {} }}", self.body.unparse(), handlers)
    }
}

/// A named `fn` definition at statement position.
#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

impl Stmt for FnDeclStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::FnDeclStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "fn {}({}) {}",
            self.name,
            unparse_parameters(&self.parameters),
            self.body.unparse()
        )
    }
}

/// A method inside a class body: `name(params) block`, no leading keyword.
#[derive(Debug, Clone)]
pub struct MethodDeclStmt {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

impl Stmt for MethodDeclStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::MethodDeclStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        format!(
            "{}({}) {}",
            self.name,
            unparse_parameters(&self.parameters),
            self.body.unparse()
        )
    }
}

/// `class Name [is Super] [with Mixin, ...] { members }`. Members are
/// method declarations and `var` field declarations, in source order.
#[derive(Debug, Clone)]
pub struct ClassDeclStmt {
    pub name: String,
    pub superclass: Option<String>,
    pub mixins: Vec<String>,
    pub members: Vec<StmtWrapper>,
    pub span: Span,
}

impl Stmt for ClassDeclStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ClassDeclStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        let mut out = format!("class {}", self.name);
        if let Some(superclass) = &self.superclass {
            out.push_str(" is ");
            out.push_str(superclass);
        }
        if !self.mixins.is_empty() {
            out.push_str(" with ");
            out.push_str(&self.mixins.join(", "));
        }
        if self.members.is_empty() {
            out.push_str(" { }");
        } else {
            let members = self
                .members
                .iter()
                .map(|member| member.unparse())
                .collect::<Vec<String>>()
                .join(" ");
            out.push_str(&format!(" {{ {} }}", members));
        }
        out
    }
}

/// Error Statement
/// Placeholder left by recovery where a statement failed to parse.
#[derive(Debug, Clone)]
pub struct ErrorStmt {
    pub span: Span,
}

impl Stmt for ErrorStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ErrorStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn unparse(&self) -> String {
        String::from(";")
    }
}
