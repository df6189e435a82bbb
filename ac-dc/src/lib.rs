//! Compiler from the `ac` adding-calculator language to `dc`.
//!
//! The pipeline runs four stages strictly in order:
//! scanning ([`parser::lexer`]), parsing ([`parser::parser`]), semantic
//! analysis ([`semantic`]) and code generation ([`backends`]). Every stage
//! fails fast with a [`CompileError`].

pub mod backends;
pub mod error;
pub mod ir;
pub mod parser;
pub mod semantic;
pub mod span;

pub use backends::{Backend, BackendType};
pub use error::{CompileError, CompileResult};

/// Compiles ac source into dc instructions.
pub fn compile(source: &str) -> CompileResult<Vec<String>> {
    compile_for(source, BackendType::Dc)
}

pub fn compile_for(source: &str, target: BackendType) -> CompileResult<Vec<String>> {
    let ast = parser::parse(source)?;
    let (ast, _) = semantic::analyse(ast)?;
    target.create().compile(&ast)
}
