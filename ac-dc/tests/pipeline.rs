mod common;

use ac_dc::error::{CompileError, SemanticError, SymbolError};
use ac_dc::ir::types::DataType;
use ac_dc::{compile, parser, semantic};

use common::{interpret, run_dc};

const SAMPLE: &str = include_str!("../samples/sample.ac");
const MIXED: &str = include_str!("../samples/mixed.ac");

#[test]
fn integer_sum() {
    assert_eq!(compile("i a a=2+3$").unwrap(), vec!["2", "3", "+", "sa", "0 k"]);
}

#[test]
fn int_operand_promoted_for_float_target() {
    let code = compile("f a i b a=b+2$").unwrap();
    let promote = code.iter().position(|i| i == "5 k").unwrap();
    let add = code.iter().position(|i| i == "+").unwrap();
    assert_eq!(code[promote - 1], "lb");
    assert!(promote < add);
    assert_eq!(&code[add + 1..], ["sa", "0 k"]);
}

#[test]
fn print_after_dollar_segment() {
    let code = compile("i a a=1$p a$").unwrap();
    assert_eq!(&code[3..], ["la", "p", "si"]);
    assert_eq!(run_dc(&code).printed, vec![1.0]);
}

#[test]
fn duplicate_declaration_fails_before_generation() {
    let err = compile("i a i a a=5$").unwrap_err();
    assert!(matches!(err, CompileError::Symbol(SymbolError::Duplicate('a'))));
    assert_eq!(err.to_string(), "Symbol error: duplicate declaration of symbol 'a'");
}

#[test]
fn each_stage_reports_its_own_error_kind() {
    assert!(matches!(compile("i a a = 2 * 2"), Err(CompileError::Lexical { ch: '*', .. })));
    assert!(matches!(compile("i a a = = 2"), Err(CompileError::Syntax { .. })));
    assert!(matches!(
        compile("i a p b"),
        Err(CompileError::Symbol(SymbolError::Undeclared('b')))
    ));
    assert!(matches!(
        compile("i a a = 0.5"),
        Err(CompileError::Semantic(SemanticError::IllegalConversion { .. }))
    ));
}

#[test]
fn oversized_float_literal_is_a_lexical_error() {
    let source = format!("f a a = {}.0 p a$", "9".repeat(400));
    assert!(matches!(compile(&source), Err(CompileError::FloatOverflow { .. })));
}

#[test]
fn widened_assignments_keep_their_values() {
    let code = compile("f a i b b=3 a=b p a$").unwrap();
    assert_eq!(&code[3..7], ["lb", "5 k", "sa", "0 k"]);
    assert_eq!(run_dc(&code).printed, vec![3.0]);

    let code = compile("f a a=5 p a$").unwrap();
    assert_eq!(&code[..3], ["5.0", "sa", "0 k"]);
    assert_eq!(run_dc(&code).printed, vec![5.0]);
}

#[test]
fn compiling_twice_gives_identical_output() {
    for source in [SAMPLE, MIXED, "f a i b a=b+2$"] {
        assert_eq!(compile(source).unwrap(), compile(source).unwrap());
    }
}

#[test]
fn sample_program() {
    let code = compile(SAMPLE).unwrap();
    insta::assert_snapshot!(code.join(" "), @"5 sa 0 k la 5 k 3.2 + sb 0 k lb p si");
    assert_eq!(run_dc(&code).printed, vec![8.2]);
}

#[test]
fn generated_code_matches_direct_interpretation() {
    for source in [SAMPLE, MIXED, "i a i b a = 7 b = a - 2 - 2 p b p a"] {
        let (ast, _) = semantic::analyse(parser::parse(source).unwrap()).unwrap();
        let expected = interpret(&ast);
        let mut actual = run_dc(&compile(source).unwrap());
        // `si` discards each printed value into the scratch register
        actual.registers.remove(&'i');
        assert_eq!(actual.printed, expected.printed, "printed values for {source:?}");
        assert_eq!(actual.registers, expected.registers, "registers for {source:?}");
    }
}

#[test]
fn mixed_program_symbols_and_output() {
    let (_, symbols) = semantic::analyse(parser::parse(MIXED).unwrap()).unwrap();
    assert_eq!(symbols.lookup('b'), Ok(DataType::Int));
    assert_eq!(symbols.lookup('d'), Ok(DataType::Float));

    let printed = run_dc(&compile(MIXED).unwrap()).printed;
    assert_eq!(printed, vec![10.0, 8.0, 8.25, -2.75]);
}
