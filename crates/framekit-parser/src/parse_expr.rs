//! Expression parsing.
//!
//! The emitted language has no operators beyond a leading `-` on numeric
//! literals, so an expression is one of:
//! 1. a literal (`42`, `-1.5`, `"Kent"`, `true`, `null`)
//! 2. `new Type(args) [ { Member = value, ... } ]`
//! 3. `target.Method(args)`
//! 4. a variable reference

use framekit_lexer::token::TokenKind;
use framekit_types::ast::*;
use framekit_types::{ErrorCode, Literal, Span};

use crate::parser::{Parser, MAX_EXPR_DEPTH};

impl<'src> Parser<'src> {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}"),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_primary();
        self.expr_depth -= 1;
        result
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::IntLit(value) => {
                self.advance();
                let value = self.int_in_range(value, start)?;
                Some(Expr::new(ExprKind::Literal(Literal::Int(value)), start))
            }
            TokenKind::DoubleLit(value) => {
                self.advance();
                Some(Expr::new(ExprKind::Literal(Literal::Double(value)), start))
            }
            TokenKind::Minus => self.parse_negative_literal(),
            TokenKind::StringLit(s) => {
                self.advance();
                Some(Expr::new(ExprKind::Literal(Literal::Str(s)), start))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::Literal(Literal::Bool(true)), start))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::Literal(Literal::Bool(false)), start))
            }
            TokenKind::Null => {
                self.advance();
                Some(Expr::new(ExprKind::Literal(Literal::Null), start))
            }
            TokenKind::New => self.parse_new_expr(),
            TokenKind::Identifier(_) => {
                let target = self.expect_identifier()?;
                if self.check_exact(&TokenKind::Dot) {
                    self.parse_call(target)
                } else {
                    let span = target.span;
                    Some(Expr::new(ExprKind::Variable(target), span))
                }
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// `"-" ( IntLit | DoubleLit )`
    fn parse_negative_literal(&mut self) -> Option<Expr> {
        let start = self.advance().span; // eat `-`
        let literal = match self.peek_kind().clone() {
            TokenKind::IntLit(value) => {
                let span = start.merge(self.advance().span);
                Literal::Int(self.int_in_range(-value, span)?)
            }
            TokenKind::DoubleLit(value) => {
                self.advance();
                Literal::Double(-value)
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected number after '-', got '{}'", self.peek_kind()),
                );
                return None;
            }
        };
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Literal(literal), span))
    }

    fn int_in_range(&mut self, value: i64, span: Span) -> Option<i32> {
        match i32::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.error_at(
                    ErrorCode::INVALID_NUMBER,
                    format!("integer literal {value} does not fit System.Int32"),
                    span,
                );
                None
            }
        }
    }

    /// `"new" Type "(" [ Args ] ")" [ "{" MemberInit { "," MemberInit } "}" ]`
    fn parse_new_expr(&mut self) -> Option<Expr> {
        let start = self.advance().span; // eat `new`
        let ty = self.parse_type_ref()?;
        let args = self.parse_args()?;

        let mut initializers = Vec::new();
        if self.eat(&TokenKind::LBrace) {
            while !self.check_exact(&TokenKind::RBrace) {
                let member = self.expect_identifier()?;
                self.expect(&TokenKind::Eq)?;
                let value = self.parse_expression()?;
                let span = member.span.merge(value.span);
                initializers.push(MemberInit {
                    member,
                    value,
                    span,
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBrace)?;
        }

        let span = start.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::New(NewExpr {
                ty,
                args,
                initializers,
            }),
            span,
        ))
    }

    /// `target "." Identifier "(" [ Args ] ")"`
    fn parse_call(&mut self, target: Ident) -> Option<Expr> {
        self.expect(&TokenKind::Dot)?;
        let method = self.expect_identifier()?;
        let args = self.parse_args()?;
        let span = target.span.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::Call {
                target,
                method,
                args,
            },
            span,
        ))
    }

    /// `"(" [ Expr { "," Expr } ] ")"`
    fn parse_args(&mut self) -> Option<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Some(args)
    }
}
