use std::{any::Any, fmt::Debug, ops::Deref};

use crate::Span;

/// Statement Types
#[derive(PartialEq, Debug)]
pub enum StmtType {
    ExpressionStmt,
    VarDeclStmt,
    PrintStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    ForInStmt,
    DoWhileStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    BlockStmt,
    ImportStmt,
    TryStmt,
    FnDeclStmt,
    ClassDeclStmt,
    MethodDeclStmt,
    ErrorStmt,
}

/// Statement Trait
///
/// Defines the behavior of all statement types in the AST.
pub trait Stmt: Debug {
    /// Returns the type of the statement.
    fn get_stmt_type(&self) -> StmtType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Clones the statement into a StmtWrapper.
    /// Clone cannot be derived for trait objects, so this method is necessary.
    fn clone_wrapper(&self) -> StmtWrapper;
    /// Returns the span of the statement.
    fn get_span(&self) -> &Span;
    /// Renders the statement back to canonical source text. Re-parsing the
    /// rendering yields a structurally identical tree (spans aside).
    fn unparse(&self) -> String;
}

/// Statement Wrapper
///
/// A wrapper that allows for any statement kind to be stored with helper methods
#[derive(Debug)]
pub struct StmtWrapper(Box<dyn Stmt>);

impl StmtWrapper {
    pub fn new<T: Stmt + 'static>(stmt: T) -> Self {
        StmtWrapper(Box::new(stmt))
    }
}

impl Deref for StmtWrapper {
    type Target = Box<dyn Stmt>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Stmt for StmtWrapper {
    fn get_stmt_type(&self) -> StmtType {
        self.0.get_stmt_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &Span {
        self.0.get_span()
    }
    fn unparse(&self) -> String {
        self.0.unparse()
    }
}

impl Clone for StmtWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

/// Expression Types
///
/// Defines the various kinds of expressions in the AST.
#[derive(PartialEq, Clone, Debug)]
pub enum ExprType {
    Identifier,
    Integer,
    Float,
    Imaginary,
    String,
    Boolean,
    Nil,
    SelfRef,
    SuperRef,
    List,
    Dictionary,
    Symbol,
    Paren,
    Prefix,
    Binary,
    Ternary,
    Assignment,
    Call,
    Index,
    Member,
    Function,
    Error,
}

pub trait Expr: Debug {
    /// Returns the expression type of the expression.
    fn get_expr_type(&self) -> ExprType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Clones the expression into an ExprWrapper.
    /// Clone cannot be derived for trait objects, so this method is necessary.
    fn clone_wrapper(&self) -> ExprWrapper;
    /// Returns the span of the expression.
    fn get_span(&self) -> &Span;
    /// Renders the expression back to canonical source text.
    fn unparse(&self) -> String;
}

/// Expression Wrapper
///
/// A wrapper that allows for any expression kind to be stored with helper methods
#[derive(Debug)]
pub struct ExprWrapper(Box<dyn Expr>);

impl ExprWrapper {
    pub fn new<T: Expr + 'static>(expression: T) -> Self {
        ExprWrapper(Box::new(expression))
    }
}

impl Expr for ExprWrapper {
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn get_expr_type(&self) -> ExprType {
        self.0.get_expr_type()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &Span {
        self.0.get_span()
    }
    fn unparse(&self) -> String {
        self.0.unparse()
    }
}

impl Clone for ExprWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

/// Program
///
/// The root of a parse: the ordered top-level statements of one source
/// text. A Program owns its whole subtree exclusively; dropping it frees
/// the tree as a unit.
#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl Program {
    pub fn iter(&self) -> std::slice::Iter<'_, StmtWrapper> {
        self.body.iter()
    }

    pub fn unparse(&self) -> String {
        self.body
            .iter()
            .map(|stmt| stmt.unparse())
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// A single formal parameter of a function, method or function expression.
///
/// The type hint is an opaque annotation recorded verbatim; by convention it
/// is capitalized, and it is never resolved or validated here.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub variadic: bool,
    pub type_hint: Option<String>,
    pub name: String,
    pub default: Option<ExprWrapper>,
    pub span: Span,
}

impl Parameter {
    pub fn unparse(&self) -> String {
        let mut out = String::new();
        if self.variadic {
            out.push_str("...");
        }
        if let Some(hint) = &self.type_hint {
            out.push_str(hint);
            out.push(' ');
        }
        out.push_str(&self.name);
        if let Some(default) = &self.default {
            out.push_str(" = ");
            out.push_str(&default.unparse());
        }
        out
    }
}

pub fn unparse_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|param| param.unparse())
        .collect::<Vec<String>>()
        .join(", ")
}
