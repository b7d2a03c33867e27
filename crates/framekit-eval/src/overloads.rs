//! Constructor overloads fixed before execution.

use std::collections::HashMap;

use framekit_types::Span;

/// The constructor overload each `new` expression runs, keyed by the span
/// of the expression and indexing the type's constructor list.
///
/// A static checker fills the table once; every invocation of the checked
/// method reads it instead of matching arguments again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overloads {
    chosen: HashMap<Span, usize>,
}

impl Overloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, at: Span, index: usize) {
        self.chosen.insert(at, index);
    }

    pub fn get(&self, at: Span) -> Option<usize> {
        self.chosen.get(&at).copied()
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}
