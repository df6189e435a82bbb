pub mod lexer;
pub mod parser;

use crate::error::CompileResult;
use crate::ir::ast::Ast;

/// Source text to AST: scanning followed by parsing.
pub fn parse(source: &str) -> CompileResult<Ast> {
    let tokens = lexer::tokenize(source)?;
    let ast = parser::parse_tokens(tokens)?;
    Ok(ast)
}
