use tracing::{debug, trace};

use super::Backend;
use crate::error::{CompileResult, SemanticError};
use crate::ir::ast::{Ast, BinaryOperator, NodeId, NodeKind};

/// Precision reset emitted after every store.
const RESET_PRECISION: &str = "0 k";
/// Precision set after promoting an integer to a float.
const FLOAT_PRECISION: &str = "5 k";

/// Emits dc instructions by a post-order walk: operands are pushed
/// before the operator or store that consumes them.
#[derive(Debug, Default)]
pub struct DcBackend {
    code: Vec<String>,
}

impl Backend for DcBackend {
    fn compile(&mut self, ast: &Ast) -> CompileResult<Vec<String>> {
        self.code.clear();
        self.generate(ast, ast.root())?;
        debug!(instructions = self.code.len(), "dc generation finished");
        Ok(std::mem::take(&mut self.code))
    }
}

impl DcBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate(&mut self, ast: &Ast, id: NodeId) -> CompileResult<()> {
        match &ast.node(id).kind {
            NodeKind::Program { children } => {
                for child in children {
                    self.generate(ast, *child)?;
                }
            }
            // declarations only feed the symbol table
            NodeKind::Declaration { .. } => {}
            NodeKind::Assign { target, value } => {
                self.generate(ast, *value)?;
                let name = match ast.node(*target).kind {
                    NodeKind::Reference { name } => name,
                    _ => return Err(SemanticError::UnexpectedNode { expected: "reference" }.into()),
                };
                self.emit(format!("s{}", name));
                self.emit(RESET_PRECISION);
            }
            NodeKind::Compute { op, left, right } => {
                self.generate(ast, *left)?;
                self.generate(ast, *right)?;
                self.emit(match op {
                    BinaryOperator::Add => "+",
                    BinaryOperator::Subtract => "-",
                });
            }
            NodeKind::Reference { name } => self.emit(format!("l{}", name)),
            NodeKind::Print { name } => {
                self.emit(format!("l{}", name));
                self.emit("p");
                self.emit("si");
            }
            NodeKind::Convert { child } => {
                self.generate(ast, *child)?;
                self.emit(FLOAT_PRECISION);
            }
            NodeKind::Constant(literal) => self.emit(literal.to_string()),
        }
        Ok(())
    }

    fn emit(&mut self, instruction: impl Into<String>) {
        let instruction = instruction.into();
        trace!(%instruction, "emit");
        self.code.push(instruction);
    }
}
