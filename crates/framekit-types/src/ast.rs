//! AST of the emitted method language.
//!
//! This is what the backend front end parses generated source back into.
//! Every node carries a [`Span`] for diagnostics; nodes keep source order.

use crate::catalog::TypeName;
use crate::literal::Literal;
use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers & Types
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A dotted type reference as written in source: `Demo.Widget`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: TypeName,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Method
// ══════════════════════════════════════════════════════════════════════════════

/// `public <Result|void> Name(T1 p1, ...) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: Ident,
    /// `None` for `void`.
    pub result: Option<TypeRef>,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// A method parameter: `Demo.Consumer consumer`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Ident,
    pub span: Span,
}

/// `{ stmts... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var n = expr;` or `D n = expr;`
    Declare(DeclareStmt),
    /// `using (var n = expr) { ... }`
    Using(UsingStmt),
    /// `target.Member = expr;`
    Assign(AssignStmt),
    /// `return expr;`
    Return(ReturnStmt),
    /// `expr;`
    Expr(ExprStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Declare(s) => s.span,
            Stmt::Using(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

/// A local declaration. `declared_type` is `None` for `var`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclareStmt {
    pub declared_type: Option<TypeRef>,
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// A disposal scope: the declared resource is released when the body exits.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingStmt {
    pub resource: DeclareStmt,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Ident,
    pub member: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A local or parameter reference.
    Variable(Ident),
    /// `new T(args) { Member = value, ... }`
    New(NewExpr),
    /// `target.Method(args)`
    Call {
        target: Ident,
        method: Ident,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub ty: TypeRef,
    pub args: Vec<Expr>,
    /// Object-initializer assignments, applied in order after construction.
    pub initializers: Vec<MemberInit>,
}

/// `Member = value` inside an object initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInit {
    pub member: Ident,
    pub value: Expr,
    pub span: Span,
}
