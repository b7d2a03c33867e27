//! Method declaration parsing.

use framekit_lexer::token::TokenKind;
use framekit_types::ast::*;
use framekit_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a complete method followed by end of file.
    ///
    /// ```ebnf
    /// Method = "public" ( Type | "void" ) Identifier "(" [ Params ] ")" Block ;
    /// Params = Param { "," Param } ;
    /// Param  = Type Identifier ;
    /// ```
    pub(crate) fn parse_method(&mut self) -> Option<MethodDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Public)?;

        let result = if self.eat(&TokenKind::Void) {
            None
        } else {
            Some(self.parse_type_ref()?)
        };

        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;

        if !self.at_end() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected end of file, got '{}'", self.peek_kind()),
            );
        }

        let span = start.merge(body.span);
        Some(MethodDecl {
            name,
            result,
            params,
            body,
            span,
        })
    }

    fn parse_params(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Some(params);
        }
        loop {
            let ty = self.parse_type_ref()?;
            let name = self.expect_identifier()?;
            let span = ty.span.merge(name.span);
            params.push(Param { ty, name, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Some(params)
    }
}
