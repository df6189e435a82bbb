//! Test helpers: a tiny dc machine and a direct ac interpreter, used to
//! check that generated code behaves like the source program.

use std::collections::HashMap;

use ac_dc::ir::ast::{Ast, BinaryOperator, NodeId, NodeKind};
use ac_dc::ir::types::Literal;

#[derive(Debug, Default)]
pub struct Run {
    pub registers: HashMap<char, f64>,
    pub printed: Vec<f64>,
}

/// Executes dc instructions; supports the subset the compiler emits.
pub fn run_dc(code: &[String]) -> Run {
    let mut run = Run::default();
    let mut stack: Vec<f64> = Vec::new();

    for word in code.iter().flat_map(|instruction| instruction.split_whitespace()) {
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some('+'), None) => {
                let (b, a) = (stack.pop().unwrap(), stack.pop().unwrap());
                stack.push(a + b);
            }
            (Some('-'), None) => {
                let (b, a) = (stack.pop().unwrap(), stack.pop().unwrap());
                stack.push(a - b);
            }
            (Some('p'), None) => run.printed.push(*stack.last().unwrap()),
            (Some('k'), None) => {
                stack.pop().unwrap();
            }
            (Some('s'), Some(register)) => {
                run.registers.insert(register, stack.pop().unwrap());
            }
            (Some('l'), Some(register)) => stack.push(run.registers[&register]),
            _ => stack.push(word.parse().unwrap_or_else(|_| panic!("not dc: {word}"))),
        }
    }
    run
}

/// Evaluates the program straight from its AST, top to bottom.
pub fn interpret(ast: &Ast) -> Run {
    let mut run = Run::default();
    for id in ast.top_level() {
        match ast.node(*id).kind {
            NodeKind::Assign { target, value } => {
                let NodeKind::Reference { name } = ast.node(target).kind else {
                    panic!("assignment without target");
                };
                let result = evaluate(ast, value, &run.registers);
                run.registers.insert(name, result);
            }
            NodeKind::Print { name } => run.printed.push(run.registers[&name]),
            _ => {}
        }
    }
    run
}

fn evaluate(ast: &Ast, id: NodeId, registers: &HashMap<char, f64>) -> f64 {
    match ast.node(id).kind {
        NodeKind::Constant(Literal::Int(n)) => n as f64,
        NodeKind::Constant(Literal::Float(ref x)) => x.value(),
        NodeKind::Reference { name } => registers[&name],
        NodeKind::Convert { child } => evaluate(ast, child, registers),
        NodeKind::Compute { op, left, right } => {
            let (l, r) = (evaluate(ast, left, registers), evaluate(ast, right, registers));
            match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
            }
        }
        ref other => panic!("not a value: {other:?}"),
    }
}
