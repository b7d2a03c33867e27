//! Statement parsing.

use crate::parser::Parser;
use framekit_lexer::token::TokenKind;
use framekit_types::ast::*;

impl<'src> Parser<'src> {
    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            } else {
                self.synchronize();
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Var => {
                let decl = self.parse_declaration()?;
                self.expect(&TokenKind::Semicolon)?;
                Some(Stmt::Declare(decl))
            }
            TokenKind::Using => self.parse_using_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Identifier(_) if self.typed_declaration_ahead() => {
                let decl = self.parse_declaration()?;
                self.expect(&TokenKind::Semicolon)?;
                Some(Stmt::Declare(decl))
            }
            TokenKind::Identifier(_)
                if matches!(self.look_ahead(1), TokenKind::Dot)
                    && matches!(self.look_ahead(2), TokenKind::Identifier(_))
                    && matches!(self.look_ahead(3), TokenKind::Eq) =>
            {
                self.parse_assign_stmt()
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                let span = expr.span.merge(self.previous_span());
                Some(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// `( "var" | Type ) Identifier "=" Expr`, without the terminator.
    fn parse_declaration(&mut self) -> Option<DeclareStmt> {
        let start = self.current_span();
        let declared_type = if self.eat(&TokenKind::Var) {
            None
        } else {
            Some(self.parse_type_ref()?)
        };
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        Some(DeclareStmt {
            declared_type,
            name,
            value,
            span,
        })
    }

    /// `using ( Declaration ) Block`
    fn parse_using_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `using`
        self.expect(&TokenKind::LParen)?;
        let resource = self.parse_declaration()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(Stmt::Using(UsingStmt {
            resource,
            body,
            span,
        }))
    }

    /// `return Expr ;`
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `return`
        let value = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon)?;
        let span = start.merge(self.previous_span());
        Some(Stmt::Return(ReturnStmt { value, span }))
    }

    /// `Identifier "." Identifier "=" Expr ;`
    fn parse_assign_stmt(&mut self) -> Option<Stmt> {
        let target = self.expect_identifier()?;
        self.expect(&TokenKind::Dot)?;
        let member = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon)?;
        let span = target.span.merge(self.previous_span());
        Some(Stmt::Assign(AssignStmt {
            target,
            member,
            value,
            span,
        }))
    }
}
