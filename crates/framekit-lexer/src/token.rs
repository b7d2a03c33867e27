//! Token types for the emitted method language.

use framekit_types::Span;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Integer literal without sign. Kept wide so `-2147483648` can be
    /// range-checked after negation.
    IntLit(i64),
    /// Literal with a decimal point or exponent: `1.23`, `1e-7`
    DoubleLit(f64),
    StringLit(String),
    True,
    False,
    Null,

    Identifier(String),

    // ── Keywords ──────────────────────────────────────────────
    Public,
    Void,
    Var,
    New,
    Return,
    Using,

    // ── Punctuation ───────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,
    Eq,
    Minus,

    Eof,
}

impl TokenKind {
    /// Map reserved words to their keyword token.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "public" => TokenKind::Public,
            "void" => TokenKind::Void,
            "var" => TokenKind::Var,
            "new" => TokenKind::New,
            "return" => TokenKind::Return,
            "using" => TokenKind::Using,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Void
                | TokenKind::Var
                | TokenKind::New
                | TokenKind::Return
                | TokenKind::Using
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLit(n) => write!(f, "{n}"),
            TokenKind::DoubleLit(n) => write!(f, "{n:?}"),
            TokenKind::StringLit(s) => write!(f, "\"{s}\""),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Null => f.write_str("null"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Public => f.write_str("public"),
            TokenKind::Void => f.write_str("void"),
            TokenKind::Var => f.write_str("var"),
            TokenKind::New => f.write_str("new"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::Using => f.write_str("using"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reserved_word_has_a_keyword_token() {
        for word in framekit_types::KEYWORDS {
            let kind = TokenKind::from_keyword(word)
                .unwrap_or_else(|| panic!("'{word}' is not mapped to a keyword"));
            assert!(kind.is_keyword());
            assert_eq!(kind.to_string(), *word);
        }
    }

    #[test]
    fn identifiers_are_not_keywords() {
        assert_eq!(TokenKind::from_keyword("widget"), None);
        assert!(!TokenKind::Identifier("var1".into()).is_keyword());
    }
}
