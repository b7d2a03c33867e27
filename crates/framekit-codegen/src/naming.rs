//! Variable naming with scope-chain collision avoidance.

use framekit_types::{is_keyword, TypeName};

/// Per-assembly naming state: one set of taken names per open scope.
///
/// A name is free when no scope on the active chain holds it. Closing a scope
/// releases its names for sibling scopes.
#[derive(Debug)]
pub struct NamingContext {
    scopes: Vec<Vec<String>>,
    suffix_start: u32,
}

impl NamingContext {
    pub fn new(suffix_start: u32) -> Self {
        Self {
            scopes: vec![Vec::new()],
            suffix_start,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_taken(&self, name: &str) -> bool {
        is_keyword(name) || self.scopes.iter().flatten().any(|n| n == name)
    }

    /// Assign a fresh name for a value of type `ty` in the innermost scope.
    pub fn declare(&mut self, ty: &TypeName) -> String {
        let base = base_name(ty);
        let name = if self.is_taken(&base) {
            (self.suffix_start..)
                .map(|n| format!("{base}{n}"))
                .find(|candidate| !self.is_taken(candidate))
                .unwrap_or_else(|| format!("{base}_"))
        } else {
            base
        };
        tracing::trace!(%ty, %name, depth = self.depth(), "declared variable");
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(name.clone());
        }
        name
    }
}

/// Short type name with its first letter lower-cased: `Demo.Widget` → `widget`.
pub fn base_name(ty: &TypeName) -> String {
    let short = ty.short_name();
    let mut chars = short.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => "value".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str) -> TypeName {
        TypeName::from(name)
    }

    #[test]
    fn base_name_lowercases_first_letter_of_short_name() {
        assert_eq!(base_name(&ty("Demo.Widget")), "widget");
        assert_eq!(base_name(&ty("System.Int32")), "int32");
        assert_eq!(base_name(&ty("HTTPClient")), "hTTPClient");
    }

    #[test]
    fn collisions_get_numeric_suffix() {
        let mut names = NamingContext::new(2);
        assert_eq!(names.declare(&ty("Demo.Widget")), "widget");
        assert_eq!(names.declare(&ty("Other.Widget")), "widget2");
        assert_eq!(names.declare(&ty("Demo.Widget")), "widget3");
    }

    #[test]
    fn suffix_start_is_configurable() {
        let mut names = NamingContext::new(1);
        names.declare(&ty("Demo.Widget"));
        assert_eq!(names.declare(&ty("Demo.Widget")), "widget1");
    }

    #[test]
    fn outer_scopes_are_part_of_the_chain() {
        let mut names = NamingContext::new(2);
        names.declare(&ty("Demo.Widget"));
        names.push_scope();
        assert_eq!(names.declare(&ty("Demo.Widget")), "widget2");
        names.pop_scope();
        names.push_scope();
        // the sibling scope does not see `widget2`
        assert_eq!(names.declare(&ty("Demo.Widget")), "widget2");
    }

    #[test]
    fn keywords_are_never_assigned() {
        let mut names = NamingContext::new(2);
        assert_eq!(names.declare(&ty("Demo.Var")), "var2");
        assert_eq!(names.declare(&ty("Demo.New")), "new2");
    }

    #[test]
    fn root_scope_is_never_popped() {
        let mut names = NamingContext::new(2);
        names.pop_scope();
        assert_eq!(names.depth(), 1);
    }
}
