pub mod analyser;
pub mod symbol_table;

pub use analyser::{SemanticAnalyser, analyse};
pub use symbol_table::SymbolTable;
