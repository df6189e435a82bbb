use std::collections::VecDeque;

use tracing::{debug, trace};

use super::symbol_table::SymbolTable;
use crate::error::{CompileResult, SemanticError, SymbolError};
use crate::ir::ast::{Ast, NodeId, NodeKind};
use crate::ir::types::DataType;
use crate::parser::lexer::is_identifier;

/// Runs both semantic passes over a parsed tree.
pub fn analyse(ast: Ast) -> CompileResult<(Ast, SymbolTable)> {
    let mut analyser = SemanticAnalyser::new(ast);
    analyser.populate_symbol_table()?;
    analyser.analyse()?;
    Ok(analyser.into_parts())
}

/// Builds the symbol table and annotates every node with its data type,
/// inserting int -> float conversions where operands disagree.
pub struct SemanticAnalyser {
    ast: Ast,
    symbols: SymbolTable,
}

impl SemanticAnalyser {
    pub fn new(ast: Ast) -> Self {
        Self {
            ast,
            symbols: SymbolTable::new(),
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_parts(self) -> (Ast, SymbolTable) {
        (self.ast, self.symbols)
    }

    /// First pass: enter every declaration and check that every used name
    /// was declared.
    pub fn populate_symbol_table(&mut self) -> CompileResult<&SymbolTable> {
        let mut queue = VecDeque::from([self.ast.root()]);

        while let Some(id) = queue.pop_front() {
            queue.extend(self.ast.children(id));

            match &self.ast.node(id).kind {
                NodeKind::Declaration { declared, target } => {
                    let declared = *declared;
                    let name = self.reference_name(*target)?;
                    if !is_identifier(name) {
                        return Err(SymbolError::InvalidIdentifier(name).into());
                    }
                    self.symbols.enter(name, declared)?;
                    trace!(%name, %declared, "declared");
                }
                NodeKind::Reference { name } | NodeKind::Print { name } => {
                    self.symbols.lookup(*name)?;
                }
                NodeKind::Program { .. }
                | NodeKind::Assign { .. }
                | NodeKind::Compute { .. }
                | NodeKind::Constant(_)
                | NodeKind::Convert { .. } => {}
            }
        }

        debug!(symbols = self.symbols.len(), "symbol table populated");
        Ok(&self.symbols)
    }

    /// Second pass: post-order type inference and unification.
    pub fn analyse(&mut self) -> CompileResult<()> {
        self.visit(self.ast.root())?;
        debug!("type analysis finished");
        Ok(())
    }

    fn visit(&mut self, id: NodeId) -> CompileResult<Option<DataType>> {
        let datatype = match self.ast.node(id).kind.clone() {
            NodeKind::Program { children } => {
                for child in children {
                    self.visit(child)?;
                }
                return Ok(None);
            }
            NodeKind::Declaration { declared, target } => {
                self.visit_value(target)?;
                declared
            }
            NodeKind::Assign { target, value } => {
                let declared = self.visit_value(target)?;
                self.visit_value(value)?;
                // computations below are unified first, so this sees the final type
                self.convert(value, declared)?;
                declared
            }
            NodeKind::Compute { left, right, .. } => {
                let general = self.visit_value(left)?.generalize(self.visit_value(right)?);
                self.convert(left, general)?;
                self.convert(right, general)?;
                general
            }
            NodeKind::Reference { name } | NodeKind::Print { name } => self.symbols.lookup(name)?,
            NodeKind::Constant(literal) => literal.datatype(),
            NodeKind::Convert { child } => {
                self.visit_value(child)?;
                DataType::Float
            }
        };

        self.ast.set_datatype(id, datatype);
        Ok(Some(datatype))
    }

    fn visit_value(&mut self, id: NodeId) -> CompileResult<DataType> {
        self.visit(id)?
            .ok_or_else(|| SemanticError::UnexpectedNode { expected: "value" }.into())
    }

    /// Converts an already typed node to `to` in place.
    ///
    /// Widening retags constants, pushes the conversion into both operands
    /// of a computation and wraps anything else in a `Convert` node.
    fn convert(&mut self, id: NodeId, to: DataType) -> CompileResult<()> {
        let from = self
            .ast
            .datatype(id)
            .ok_or(SemanticError::UnexpectedNode { expected: "typed" })?;
        if from == to {
            return Ok(());
        }
        if !from.can_convert_to(to) {
            return Err(SemanticError::IllegalConversion { from, to }.into());
        }

        trace!(node = ?id, %from, %to, "widening");
        match self.ast.node(id).kind.clone() {
            NodeKind::Constant(_) => self.ast.widen_constant(id)?,
            NodeKind::Compute { left, right, .. } => {
                self.convert(left, to)?;
                self.convert(right, to)?;
                self.ast.set_datatype(id, to);
            }
            NodeKind::Reference { .. } | NodeKind::Convert { .. } => {
                self.ast.wrap_in_convert(id);
            }
            NodeKind::Program { .. }
            | NodeKind::Declaration { .. }
            | NodeKind::Assign { .. }
            | NodeKind::Print { .. } => {
                return Err(SemanticError::UnexpectedNode { expected: "value" }.into());
            }
        }
        Ok(())
    }

    fn reference_name(&self, id: NodeId) -> CompileResult<char> {
        match self.ast.node(id).kind {
            NodeKind::Reference { name } => Ok(name),
            _ => Err(SemanticError::UnexpectedNode { expected: "reference" }.into()),
        }
    }
}
