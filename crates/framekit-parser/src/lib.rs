//! framekit parser: converts a token stream into a method AST.

mod parse_decl;
mod parse_expr;
mod parse_stmt;
mod parse_type;
mod parser;

pub use parser::{ParseResult, Parser};

use framekit_lexer::Lexer;
use framekit_types::SourceFile;

/// Lex and parse `source` in one step.
///
/// Lexer diagnostics come first in the combined list. The method is only
/// returned when neither stage reported an error.
pub fn parse_source(source: &SourceFile) -> ParseResult {
    let lexed = Lexer::new(source).lex();
    let mut errors = lexed.errors;
    let parsed = Parser::new(lexed.tokens, source).parse();
    errors.extend(parsed.errors);
    let method = if errors.has_errors() {
        None
    } else {
        parsed.method
    };
    ParseResult { method, errors }
}
