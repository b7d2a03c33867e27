//! Static checker: walks a parsed method against the type catalog.
//!
//! Entry point: [`Checker::check`].
//!
//! Error codes emitted:
//! - E200: unknown type
//! - E201: type mismatch (assignments, arguments, returns, `var = null`)
//! - E202: no matching constructor
//! - E203: unknown member
//! - E204: unknown method
//! - E205: `using` on a non-disposable type
//! - E300: undefined variable
//! - E301: duplicate variable
//! - E302: missing return
//! - E303: unreachable code
//! - E304: return in a `void` method
//! - E400: method does not match the requested entry point

use framekit_eval::Overloads;
use framekit_types::ast::*;
use framekit_types::{
    ConstructorDescriptor, Diagnostic, Diagnostics, ErrorCode, ParameterDescriptor, SourceFile,
    Span, TypeCatalog, TypeName,
};

use crate::entry::EntryPoint;
use crate::env::TypeEnv;
use crate::ty::Type;

// ══════════════════════════════════════════════════════════════════════════════
// Checker
// ══════════════════════════════════════════════════════════════════════════════

pub struct Checker<'a> {
    catalog: &'a TypeCatalog,
    source: &'a SourceFile,
    errors: &'a mut Diagnostics,
    env: TypeEnv,
    /// The declared result type; `None` for `void` or an unknown result.
    result: Option<TypeName>,
    is_void: bool,
    overloads: Overloads,
}

impl<'a> Checker<'a> {
    pub fn new(
        catalog: &'a TypeCatalog,
        source: &'a SourceFile,
        errors: &'a mut Diagnostics,
    ) -> Self {
        Self {
            catalog,
            source,
            errors,
            env: TypeEnv::new(),
            result: None,
            is_void: true,
            overloads: Overloads::new(),
        }
    }

    /// Check a complete method and its fit for `entry`.
    ///
    /// Returns the constructor overload chosen for every `new` expression
    /// that resolved to one.
    pub fn check(&mut self, method: &MethodDecl, entry: &EntryPoint) -> Overloads {
        self.check_entry(method, entry);

        self.is_void = method.result.is_none();
        self.result = method.result.as_ref().and_then(|r| self.resolve(r));

        for param in &method.params {
            let ty = match self.resolve(&param.ty) {
                Some(name) => Type::Named(name),
                None => Type::Unknown,
            };
            self.define(&param.name, ty);
        }

        let returns = self.check_block(&method.body);
        if !self.is_void && !returns {
            self.error(
                ErrorCode::MISSING_RETURN,
                format!("'{}' does not return a value on every path", method.name.name),
                method.name.span,
            );
        }
        std::mem::take(&mut self.overloads)
    }

    fn check_entry(&mut self, method: &MethodDecl, entry: &EntryPoint) {
        if method.name.name != entry.method_name {
            self.error(
                ErrorCode::ENTRY_POINT_MISMATCH,
                format!(
                    "expected entry point '{}', found method '{}'",
                    entry.method_name, method.name.name
                ),
                method.name.span,
            );
        } else if !entry.accepts(method.params.len(), method.result.is_some()) {
            let found = if method.result.is_some() { "returns a value" } else { "is void" };
            self.error(
                ErrorCode::ENTRY_POINT_MISMATCH,
                format!(
                    "'{}' takes {} parameter(s) and {found}, which does not fit a {} entry point",
                    method.name.name,
                    method.params.len(),
                    entry.shape
                ),
                method.name.span,
            );
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Returns whether the block returns on every path.
    fn check_block(&mut self, block: &Block) -> bool {
        self.env.push_scope();
        let mut returned = false;
        for stmt in &block.stmts {
            if returned {
                self.error(
                    ErrorCode::UNREACHABLE_CODE,
                    "unreachable statement after return".to_string(),
                    stmt.span(),
                );
                break;
            }
            returned = self.check_stmt(stmt);
        }
        self.env.pop_scope();
        returned
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Declare(decl) => {
                self.check_declaration(decl);
                false
            }
            Stmt::Using(using) => self.check_using(using),
            Stmt::Assign(assign) => {
                self.check_assign(assign);
                false
            }
            Stmt::Return(ret) => {
                self.check_return(ret);
                true
            }
            Stmt::Expr(expr) => {
                self.check_expr(&expr.expr);
                false
            }
        }
    }

    /// Checks the initializer and binds the name; returns the bound type.
    fn check_declaration(&mut self, decl: &DeclareStmt) -> Type {
        let value = self.check_expr(&decl.value);
        let ty = match &decl.declared_type {
            Some(declared) => match self.resolve(declared) {
                Some(name) => {
                    self.expect_assignable(&value, &name, decl.value.span, || {
                        format!("cannot initialize '{}'", decl.name.name)
                    });
                    Type::Named(name)
                }
                None => Type::Unknown,
            },
            None => match value {
                Type::Null | Type::Void => {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("cannot infer the type of '{}' from {value}", decl.name.name),
                        decl.value.span,
                    );
                    Type::Unknown
                }
                other => other,
            },
        };
        self.define(&decl.name, ty.clone());
        ty
    }

    fn check_using(&mut self, using: &UsingStmt) -> bool {
        self.env.push_scope();
        let ty = self.check_declaration(&using.resource);
        if let Some(name) = ty.name() {
            let disposable = self.catalog.hierarchy(name).iter().any(|d| d.disposable);
            if !disposable {
                self.error(
                    ErrorCode::NOT_DISPOSABLE,
                    format!("'{name}' cannot be used in a disposal scope"),
                    using.resource.span,
                );
            }
        }
        let returns = self.check_block(&using.body);
        self.env.pop_scope();
        returns
    }

    fn check_assign(&mut self, assign: &AssignStmt) {
        let target = self.check_variable(&assign.target);
        let value = self.check_expr(&assign.value);
        let Some(owner) = self.object_type(&target, &assign.target) else {
            return;
        };
        match self.catalog.member_of(&owner, &assign.member.name) {
            Some(member) => {
                let member_ty = member.ty.clone();
                self.expect_assignable(&value, &member_ty, assign.value.span, || {
                    format!("cannot assign to '{}.{}'", assign.target.name, assign.member.name)
                });
            }
            None => self.error(
                ErrorCode::UNKNOWN_MEMBER,
                format!("'{owner}' has no member '{}'", assign.member.name),
                assign.member.span,
            ),
        }
    }

    fn check_return(&mut self, ret: &ReturnStmt) {
        let value = self.check_expr(&ret.value);
        if self.is_void {
            self.error(
                ErrorCode::RETURN_IN_VOID,
                "cannot return a value from a void method".to_string(),
                ret.span,
            );
            return;
        }
        if let Some(result) = self.result.clone() {
            self.expect_assignable(&value, &result, ret.value.span, || {
                "cannot return this value".to_string()
            });
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    fn check_expr(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::Literal(literal) => Type::of_literal(literal),
            ExprKind::Variable(name) => self.check_variable(name),
            ExprKind::New(new) => self.check_new(new, expr.span),
            ExprKind::Call {
                target,
                method,
                args,
            } => self.check_call(target, method, args),
        }
    }

    fn check_variable(&mut self, name: &Ident) -> Type {
        match self.env.lookup(&name.name) {
            Some(ty) => ty.clone(),
            None => {
                self.error(
                    ErrorCode::UNDEFINED_VARIABLE,
                    format!("undefined variable '{}'", name.name),
                    name.span,
                );
                Type::Unknown
            }
        }
    }

    fn check_new(&mut self, new: &NewExpr, span: Span) -> Type {
        let args: Vec<Type> = new.args.iter().map(|a| self.check_expr(a)).collect();
        let Some(name) = self.resolve(&new.ty) else {
            for init in &new.initializers {
                self.check_expr(&init.value);
            }
            return Type::Unknown;
        };

        let catalog = self.catalog;
        let constructors = catalog
            .get(&name)
            .map(|d| d.constructors.as_slice())
            .unwrap_or_default();
        match self.select_constructor(constructors, &args) {
            Some(index) => self.overloads.record(span, index),
            None => self.error(
                ErrorCode::NO_MATCHING_CONSTRUCTOR,
                format!("no constructor of '{name}' accepts ({})", type_list(&args)),
                span,
            ),
        }

        for init in &new.initializers {
            let value = self.check_expr(&init.value);
            match catalog.member_of(&name, &init.member.name) {
                Some(member) => self.expect_assignable(&value, &member.ty, init.value.span, || {
                    format!("cannot initialize '{}'", init.member.name)
                }),
                None => self.error(
                    ErrorCode::UNKNOWN_MEMBER,
                    format!("'{name}' has no member '{}'", init.member.name),
                    init.member.span,
                ),
            }
        }
        Type::Named(name)
    }

    fn check_call(&mut self, target: &Ident, method: &Ident, args: &[Expr]) -> Type {
        let target_ty = self.check_variable(target);
        let arg_types: Vec<Type> = args.iter().map(|a| self.check_expr(a)).collect();
        let Some(owner) = self.object_type(&target_ty, target) else {
            return Type::Unknown;
        };

        let catalog = self.catalog;
        let Some((_, descriptor)) = catalog.method_of(&owner, &method.name) else {
            self.error(
                ErrorCode::UNKNOWN_METHOD,
                format!("'{owner}' has no method '{}'", method.name),
                method.span,
            );
            return Type::Unknown;
        };
        if !self.arguments_fit(&descriptor.params, &arg_types) {
            let expected: Vec<Type> = descriptor
                .params
                .iter()
                .map(|p| Type::Named(p.ty.clone()))
                .collect();
            self.error(
                ErrorCode::TYPE_MISMATCH,
                format!(
                    "'{owner}.{}' expects ({}), found ({})",
                    method.name,
                    type_list(&expected),
                    type_list(&arg_types)
                ),
                method.span,
            );
        }
        match &descriptor.returns {
            Some(ty) => Type::Named(ty.clone()),
            None => Type::Void,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Helpers
    // ══════════════════════════════════════════════════════════════════════

    fn resolve(&mut self, ty: &TypeRef) -> Option<TypeName> {
        if self.catalog.contains(&ty.name) {
            Some(ty.name.clone())
        } else {
            self.error(
                ErrorCode::UNKNOWN_TYPE,
                format!("unknown type '{}'", ty.name),
                ty.span,
            );
            None
        }
    }

    fn define(&mut self, name: &Ident, ty: Type) {
        if !self.env.define(&name.name, ty) {
            self.error(
                ErrorCode::DUPLICATE_VARIABLE,
                format!("'{}' is already declared in this scope", name.name),
                name.span,
            );
        }
    }

    /// The catalog type of a member-access target, reporting primitives
    /// and `null`. `None` when nothing more can be checked.
    fn object_type(&mut self, ty: &Type, target: &Ident) -> Option<TypeName> {
        match ty {
            Type::Named(name) if !name.is_primitive() => Some(name.clone()),
            Type::Unknown => None,
            other => {
                self.error(
                    ErrorCode::TYPE_MISMATCH,
                    format!("'{}' of type {other} has no members", target.name),
                    target.span,
                );
                None
            }
        }
    }

    /// The overload whose parameter types equal the argument types, else
    /// the first one the arguments are assignable to.
    fn select_constructor(
        &self,
        constructors: &[ConstructorDescriptor],
        args: &[Type],
    ) -> Option<usize> {
        let exact = |c: &ConstructorDescriptor| {
            c.arity() == args.len()
                && c.params
                    .iter()
                    .zip(args)
                    .all(|(p, a)| a.name() == Some(&p.ty))
        };
        constructors
            .iter()
            .position(exact)
            .or_else(|| {
                constructors
                    .iter()
                    .position(|c| self.arguments_fit(&c.params, args))
            })
    }

    fn arguments_fit(&self, params: &[ParameterDescriptor], args: &[Type]) -> bool {
        params.len() == args.len()
            && params
                .iter()
                .zip(args)
                .all(|(p, a)| a.is_assignable_to(&p.ty, self.catalog))
    }

    fn expect_assignable(
        &mut self,
        value: &Type,
        target: &TypeName,
        span: Span,
        context: impl FnOnce() -> String,
    ) {
        if !value.is_assignable_to(target, self.catalog) {
            self.error(
                ErrorCode::TYPE_MISMATCH,
                format!("{}: expected {target}, found {value}", context()),
                span,
            );
        }
    }

    fn error(&mut self, code: ErrorCode, message: String, span: Span) {
        let source_line = self.source.line(span.start_line).unwrap_or("").to_string();
        self.errors.push(Diagnostic::new(
            &self.source.name,
            code,
            message,
            span,
            source_line,
        ));
    }
}

fn type_list(types: &[Type]) -> String {
    types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
