use std::path::PathBuf;

use clap::Parser;
use simple_logger::SimpleLogger;

/// MiniLang++ compiler front-end: lexes, parses, type-checks, and lowers a
/// source file to three-address code, printing each phase.
#[derive(Parser)]
#[command(name = "minilangc", version)]
struct Args {
    /// Source file to compile
    input: PathBuf,

    /// Log phase timings and internal progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = SimpleLogger::new().with_level(level).init();

    if let Err(err) = minilang_drv::run(&args.input) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
