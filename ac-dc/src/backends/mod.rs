pub mod dc;

use crate::error::CompileResult;
use crate::ir::ast::Ast;

/// Turns a type-annotated AST into target instructions.
pub trait Backend {
    fn compile(&mut self, ast: &Ast) -> CompileResult<Vec<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Dc,
}

impl BackendType {
    pub fn all() -> Vec<Self> {
        vec![Self::Dc]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|b| b.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dc => "dc",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Dc => "Unix dc stack calculator",
        }
    }

    pub fn create(&self) -> Box<dyn Backend> {
        match self {
            Self::Dc => Box::new(dc::DcBackend::new()),
        }
    }
}
