use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{Level, error, info};

use ac_dc::backends::BackendType;
use ac_dc::error::{CompileError, CompileResult};
use ac_dc::parser::{self, lexer};
use ac_dc::semantic::SemanticAnalyser;

#[derive(Parser)]
#[command(name = "ac-dc")]
#[command(about = "Compiler from the ac calculator language to dc", version)]
struct Cli {
    /// Logging verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an ac program
    Compile {
        /// Source file
        input: String,

        /// Target language
        #[arg(short, long, default_value = "dc")]
        target: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Print the annotated AST to stderr
        #[arg(long)]
        show_ast: bool,

        /// Text placed between emitted instructions
        #[arg(long, default_value = "\n")]
        separator: String,
    },

    /// Scan and parse, then print tokens and AST
    Parse {
        /// Source file
        input: String,
    },

    /// Run semantic analysis and print the symbol table
    Check {
        /// Source file
        input: String,
    },

    /// List supported targets
    Targets,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(level_for(cli.verbose))
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "compilation failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn run(command: Commands) -> CompileResult<()> {
    match command {
        Commands::Compile { input, target, output, show_ast, separator } => {
            info!(%input, %target, "compiling");
            let backend_type = BackendType::from_name(&target)
                .ok_or_else(|| CompileError::UnknownTarget { name: target.clone() })?;

            let source = fs::read_to_string(&input)?;
            let mut analyser = SemanticAnalyser::new(parser::parse(&source)?);
            analyser.populate_symbol_table()?;
            analyser.analyse()?;

            if show_ast {
                eprintln!("=== AST ===");
                eprint!("{}", analyser.ast());
            }

            let mut backend = backend_type.create();
            let code = backend.compile(analyser.ast())?;
            let mut text = code.join(&separator);
            text.push('\n');

            match output {
                Some(path) => {
                    fs::write(&path, &text)?;
                    info!(%path, instructions = code.len(), "written");
                }
                None => io::stdout().write_all(text.as_bytes())?,
            }
        }
        Commands::Parse { input } => {
            let source = fs::read_to_string(&input)?;

            println!("=== TOKENS ===");
            for token in lexer::tokenize(&source)? {
                println!("{}", token);
            }

            println!("=== AST ===");
            print!("{}", parser::parse(&source)?);
        }
        Commands::Check { input } => {
            let source = fs::read_to_string(&input)?;
            let mut analyser = SemanticAnalyser::new(parser::parse(&source)?);
            analyser.populate_symbol_table()?;
            analyser.analyse()?;
            print!("{}", analyser.symbol_table());
        }
        Commands::Targets => {
            println!("Supported targets:");
            for backend in BackendType::all() {
                println!("  {:8} - {}", backend.name(), backend.description());
            }
        }
    }

    Ok(())
}
