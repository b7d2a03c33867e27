//! Qualified type name parsing.

use framekit_lexer::token::TokenKind;
use framekit_types::ast::TypeRef;
use framekit_types::TypeName;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// `Type = Identifier { "." Identifier } ;`
    pub(crate) fn parse_type_ref(&mut self) -> Option<TypeRef> {
        let first = self.expect_identifier()?;
        let mut name = first.name;
        let mut span = first.span;
        while self.check_exact(&TokenKind::Dot) {
            self.advance();
            let segment = self.expect_identifier()?;
            name.push('.');
            name.push_str(&segment.name);
            span = span.merge(segment.span);
        }
        Some(TypeRef {
            name: TypeName::new(name),
            span,
        })
    }

    /// Whether the tokens ahead read `Type Identifier`, the start of a typed
    /// declaration such as `Demo.Widget widget = ...`.
    pub(crate) fn typed_declaration_ahead(&self) -> bool {
        if !matches!(self.look_ahead(0), TokenKind::Identifier(_)) {
            return false;
        }
        let mut i = 0;
        while matches!(self.look_ahead(i + 1), TokenKind::Dot)
            && matches!(self.look_ahead(i + 2), TokenKind::Identifier(_))
        {
            i += 2;
        }
        matches!(self.look_ahead(i + 1), TokenKind::Identifier(_))
    }
}
