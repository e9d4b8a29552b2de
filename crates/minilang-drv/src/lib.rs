//! minilang-drv - Compiler Driver
//!
//! Orchestrates the pipeline: read the source file, run
//! lex -> parse -> analyze -> generate, print each phase's output, and
//! report the collected diagnostics.
//!
//! Data flows strictly forward. Each phase consumes the previous phase's
//! output plus the shared diagnostics [`Handler`]; no phase modifies its
//! input. A run is considered failed when any phase reported an error, but
//! TAC is still emitted on a best-effort basis from whatever AST the parser
//! produced.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::debug;

use minilang_lex::Token;
use minilang_par::Program;
use minilang_sem::SymbolTableStack;
use minilang_tac::Instr;
use minilang_util::{Handler, Phase};

/// Everything one compilation run produced.
pub struct CompileOutput {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub symbols: SymbolTableStack,
    pub tac: Vec<Instr>,
}

/// Run the full pipeline over one source text.
///
/// Diagnostics from every phase accumulate in the handler; the pipeline
/// itself never fails.
pub fn compile(source: &str, handler: &Handler) -> CompileOutput {
    let started = Instant::now();
    let tokens = minilang_lex::tokenize(source, handler);
    debug!(
        "lexer: {} tokens in {:?}",
        tokens.len(),
        started.elapsed()
    );

    let started = Instant::now();
    let program = minilang_par::parse(tokens.clone(), handler);
    debug!(
        "parser: {} functions in {:?}",
        program.functions.len(),
        started.elapsed()
    );

    let started = Instant::now();
    let symbols = minilang_sem::analyze(&program, handler);
    debug!("semantic analysis in {:?}", started.elapsed());

    let started = Instant::now();
    let tac = minilang_tac::generate(&program);
    debug!(
        "tac generator: {} instructions in {:?}",
        tac.len(),
        started.elapsed()
    );

    CompileOutput {
        tokens,
        program,
        symbols,
        tac,
    }
}

/// Print one phase's diagnostics under a heading, if there are any.
fn print_phase_errors(handler: &Handler, phase: Phase, heading: &str) {
    let messages = handler.phase_messages(phase);
    if !messages.is_empty() {
        println!("\n{}:", heading);
        for message in messages {
            println!("{}", message);
        }
    }
}

/// Print every phase's output the way the interactive driver does.
pub fn print_phases(output: &CompileOutput, handler: &Handler) {
    println!("==== MiniLang++ Compiler Front-End ====");

    println!("\n--- Lexical Analysis: Tokens ---");
    for token in &output.tokens {
        println!("{}", token);
    }
    print_phase_errors(handler, Phase::Lexer, "Lexical Errors");

    println!("\n--- Syntax Analysis: AST ---");
    println!("{:#?}", output.program);
    print_phase_errors(handler, Phase::Parser, "Syntax Errors");

    println!("\n--- Semantic Analysis: Symbol Tables & Errors ---");
    print!("{}", output.symbols);
    if handler.phase_messages(Phase::Semantic).is_empty() {
        println!("No semantic errors detected.");
    } else {
        print_phase_errors(handler, Phase::Semantic, "Semantic Errors");
    }

    println!("\n--- Intermediate Code Generation: Three Address Code (TAC) ---");
    for instr in &output.tac {
        println!("{}", instr);
    }
}

/// Compile a file and print all phases. Fails when the file cannot be read
/// or when any phase reported errors.
pub fn run(input: &Path) -> anyhow::Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let handler = Handler::new();
    let output = compile(&source, &handler);
    print_phases(&output, &handler);

    if handler.has_errors() {
        anyhow::bail!("compilation failed with {} error(s)", handler.error_count());
    }

    println!("\n==== Compilation pipeline completed successfully ====");
    Ok(())
}
