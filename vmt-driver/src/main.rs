//! Hack VM Translator Driver
//!
//! Thin I/O wrapper around the pipeline: read a .vm file, parse it into
//! commands, translate them to assembly, write the .asm output. The first
//! error aborts the run with its source position; partial output is never
//! written.

use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;
use vmt_codegen::{emit_instructions, CodeGenerator, CodegenOptions};

#[derive(Parser)]
#[command(
    name = "vmt",
    about = "Translate Hack VM commands into Hack assembly",
    version
)]
struct Cli {
    /// Input .vm file
    input: PathBuf,

    /// Output assembly file (defaults to the input with extension .asm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not interleave source-command comments in the output
    #[arg(long)]
    no_comments: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&cli.input)?;
    let filename = cli.input.display().to_string();

    // Static variables are scoped to the input file stem, so two files
    // translated separately cannot collide in the static window.
    let namespace = cli
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Main")
        .to_string();

    let commands = vmt_frontend::parse_source(&filename, &source)?;

    let options = CodegenOptions {
        emit_comments: !cli.no_comments,
    };
    let mut generator = CodeGenerator::with_options(&namespace, options);

    let mut insts = Vec::new();
    for sourced in &commands {
        // Bounds and writability errors surface from codegen without a
        // position; pin them to the offending line here.
        let lowered = generator
            .translate(&sourced.command)
            .map_err(|e| format!("{}: {}", sourced.location, e))?;
        insts.extend(lowered);
    }
    insts.extend(generator.finish()?);

    info!(
        "translated {} commands from {} into {} instructions",
        commands.len(),
        filename,
        generator.counter().emitted()
    );

    let output = cli.output.clone().unwrap_or_else(|| {
        let mut path = cli.input.clone();
        path.set_extension("asm");
        path
    });
    fs::write(&output, emit_instructions(&insts))?;

    Ok(())
}
