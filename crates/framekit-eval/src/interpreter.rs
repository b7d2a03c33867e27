//! Tree-walking interpreter over a parsed method.
//!
//! One [`Interpreter`] serves one invocation: it owns the variable
//! environment and borrows the shared [`Runtime`]. Artifacts create a fresh
//! interpreter per call, so concurrent calls never share locals.

use framekit_types::ast::*;
use framekit_types::Span;

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::overloads::Overloads;
use crate::runtime::Runtime;
use crate::value::{ObjectRef, Value};

/// Statement outcome.
#[derive(Debug)]
enum Flow {
    Continue,
    Return(Value),
}

/// Releases a disposal-scope resource exactly once.
///
/// The normal path calls [`ScopeGuard::release`] to observe the disposal
/// result. If the scope unwinds first, `Drop` releases the resource and can
/// only log a failing hook.
struct ScopeGuard<'rt> {
    runtime: &'rt Runtime,
    resource: Option<ObjectRef>,
}

impl<'rt> ScopeGuard<'rt> {
    fn new(runtime: &'rt Runtime, resource: Option<ObjectRef>) -> Self {
        Self { runtime, resource }
    }

    fn release(mut self) -> EvalResult<()> {
        match self.resource.take() {
            Some(resource) => self.runtime.dispose(&resource),
            None => Ok(()),
        }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            if let Err(err) = self.runtime.dispose(&resource) {
                tracing::warn!(ty = %resource.type_name(), error = %err, "dispose failed during unwind");
            }
        }
    }
}

pub struct Interpreter<'rt> {
    runtime: &'rt Runtime,
    overloads: Option<&'rt Overloads>,
    env: Environment,
}

impl<'rt> Interpreter<'rt> {
    pub fn new(runtime: &'rt Runtime) -> Self {
        Self {
            runtime,
            overloads: None,
            env: Environment::new(),
        }
    }

    /// Construct through the overloads recorded in `overloads`. A `new`
    /// with no recorded choice falls back to [`Runtime::construct`].
    pub fn with_overloads(mut self, overloads: &'rt Overloads) -> Self {
        self.overloads = Some(overloads);
        self
    }

    /// Execute `method` with positional `args`.
    ///
    /// Returns the returned value, or `Value::Null` for a `void` method.
    #[tracing::instrument(level = "debug", skip_all, fields(method = %method.name.name))]
    pub fn invoke(&mut self, method: &MethodDecl, args: &[Value]) -> EvalResult<Value> {
        if method.params.len() != args.len() {
            return Err(EvalError::ArgumentMismatch {
                method: method.name.name.clone(),
                expected: method.params.len(),
                found: args.len(),
            });
        }
        self.env = Environment::new();
        for (param, arg) in method.params.iter().zip(args) {
            if !self.runtime.fits(arg, &param.ty.name) {
                return Err(EvalError::TypeMismatch(format!(
                    "parameter '{}' expects {}, got {arg}",
                    param.name.name, param.ty.name
                )));
            }
            self.env.define(&param.name.name, arg.clone());
        }

        match (self.exec_block(&method.body)?, &method.result) {
            (Flow::Return(value), _) => Ok(value),
            (Flow::Continue, None) => Ok(Value::Null),
            (Flow::Continue, Some(ty)) => Err(EvalError::TypeMismatch(format!(
                "'{}' ended without returning {}",
                method.name.name, ty.name
            ))),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn exec_block(&mut self, block: &Block) -> EvalResult<Flow> {
        self.env.push_scope();
        let result = self.exec_stmts(&block.stmts);
        self.env.pop_scope();
        result
    }

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Continue)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Declare(decl) => {
                let value = self.eval_declaration(decl)?;
                self.env.define(&decl.name.name, value);
                Ok(Flow::Continue)
            }
            Stmt::Using(using) => {
                self.env.push_scope();
                let result = self.exec_using(using);
                self.env.pop_scope();
                result
            }
            Stmt::Assign(assign) => {
                let target = self.object(&assign.target)?;
                let value = self.eval_expr(&assign.value)?;
                self.runtime.set_member(&target, &assign.member.name, value)?;
                Ok(Flow::Continue)
            }
            Stmt::Return(ret) => Ok(Flow::Return(self.eval_expr(&ret.value)?)),
            Stmt::Expr(expr) => {
                self.eval_expr(&expr.expr)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn eval_declaration(&mut self, decl: &DeclareStmt) -> EvalResult<Value> {
        let value = self.eval_expr(&decl.value)?;
        if let Some(declared) = &decl.declared_type {
            if !self.runtime.fits(&value, &declared.name) {
                return Err(EvalError::TypeMismatch(format!(
                    "'{}' is declared {}, got {value}",
                    decl.name.name, declared.name
                )));
            }
        }
        Ok(value)
    }

    /// Run a disposal scope. The body's error wins over a disposal error.
    fn exec_using(&mut self, using: &UsingStmt) -> EvalResult<Flow> {
        let resource = self.eval_declaration(&using.resource)?;
        let guard = ScopeGuard::new(self.runtime, resource.as_object().cloned());
        self.env.define(&using.resource.name.name, resource);

        let body = self.exec_block(&using.body);
        let released = guard.release();
        tracing::debug!(
            resource = %using.resource.name.name,
            ok = body.is_ok(),
            "disposal scope released"
        );
        match body {
            Ok(flow) => released.map(|()| flow),
            Err(err) => {
                if let Err(dispose_err) = released {
                    tracing::warn!(error = %dispose_err, "dispose failed after body error");
                }
                Err(err)
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Value::from(literal)),
            ExprKind::Variable(name) => self.lookup(name),
            ExprKind::New(new) => self.eval_new(new, expr.span),
            ExprKind::Call {
                target,
                method,
                args,
            } => {
                let target = self.object(target)?;
                let args = self.eval_args(args)?;
                self.runtime.call(&target, &method.name, &args)
            }
        }
    }

    fn eval_new(&mut self, new: &NewExpr, span: Span) -> EvalResult<Value> {
        let args = self.eval_args(&new.args)?;
        let object = match self.overloads.and_then(|table| table.get(span)) {
            Some(index) => self.runtime.construct_with(&new.ty.name, index, &args)?,
            None => self.runtime.construct(&new.ty.name, &args)?,
        };
        for init in &new.initializers {
            let value = self.eval_expr(&init.value)?;
            self.runtime.set_member(&object, &init.member.name, value)?;
        }
        Ok(Value::Object(object))
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    fn lookup(&self, name: &Ident) -> EvalResult<Value> {
        self.env
            .get(&name.name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.name.clone()))
    }

    fn object(&self, name: &Ident) -> EvalResult<ObjectRef> {
        match self.lookup(name)? {
            Value::Object(obj) => Ok(obj),
            Value::Null => Err(EvalError::NullReference(name.name.clone())),
            other => Err(EvalError::TypeMismatch(format!(
                "'{}' holds {other}, not an object",
                name.name
            ))),
        }
    }
}
