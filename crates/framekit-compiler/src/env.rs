//! Type environment with lexically scoped bindings.

use std::collections::HashMap;

use crate::ty::Type;

/// A stack of scopes for name resolution and type tracking.
///
/// Locals may not shadow a name bound anywhere in the enclosing chain,
/// parameters included.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<HashMap<String, Type>>,
}

impl TypeEnv {
    /// Create an environment whose root scope holds the parameters.
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the root scope");
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define a binding in the innermost scope.
    /// Returns `false` if the name is already visible.
    pub fn define(&mut self, name: &str, ty: Type) -> bool {
        if self.lookup(name).is_some() {
            return false;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
