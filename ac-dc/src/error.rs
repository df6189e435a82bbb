use thiserror::Error;

use crate::ir::types::DataType;
use crate::parser::lexer::{Token, TokenKind};
use crate::span::Span;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexical error at {span}: unexpected character '{ch}'")]
    Lexical { ch: char, span: Span },

    #[error("Lexical error at {span}: integer literal {text} is out of range")]
    IntegerOverflow { text: String, span: Span },

    #[error("Lexical error at {span}: float literal {text} is out of range")]
    FloatOverflow { text: String, span: Span },

    #[error("Syntax error at {}: expected {}, found {}", .found.span, format_expected(.expected), .found)]
    Syntax { expected: Vec<TokenKind>, found: Token },

    #[error("Symbol error: {0}")]
    Symbol(#[from] SymbolError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Unknown target: {name}")]
    UnknownTarget { name: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("duplicate declaration of symbol '{0}'")]
    Duplicate(char),

    #[error("no symbol found matching '{0}'")]
    Undeclared(char),

    #[error("'{0}' is an invalid identifier")]
    InvalidIdentifier(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("illegal conversion from {from} to {to}")]
    IllegalConversion { from: DataType, to: DataType },

    #[error("expected a constant node")]
    NotAConstant,

    #[error("expected a {expected} node")]
    UnexpectedNode { expected: &'static str },
}

fn format_expected(expected: &[TokenKind]) -> String {
    match expected {
        [single] => single.to_string(),
        _ => {
            let names: Vec<String> = expected.iter().map(|k| k.to_string()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}
