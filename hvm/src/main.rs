//! Hack Virtual Machine - CLI entry point
//!
//! Loads an assembly file, runs it to the halt spin (or the step budget),
//! and reports the final machine state.

mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use hvm::{load, Machine, RunOutcome};
use serde::Serialize;
use std::fs;
use std::process;

#[derive(Serialize)]
struct RunReport {
    halted: bool,
    steps: u64,
    sp: i16,
    top: Option<i16>,
    stack: Vec<i16>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.program).unwrap_or_else(|e| {
        eprintln!("error reading '{}': {}", cli.program.display(), e);
        process::exit(1);
    });

    let program = load(&source).unwrap_or_else(|e| {
        eprintln!("error loading '{}': {}", cli.program.display(), e);
        process::exit(1);
    });

    let mut machine = Machine::new(program);
    let outcome = machine.run(cli.steps).unwrap_or_else(|e| {
        eprintln!("execution fault: {}", e);
        process::exit(1);
    });

    let (halted, steps) = match outcome {
        RunOutcome::Halted { steps } => (true, steps),
        RunOutcome::OutOfFuel { steps } => (false, steps),
    };

    if cli.json {
        let report = RunReport {
            halted,
            steps,
            sp: machine.sp(),
            top: machine.top(),
            stack: machine.stack().to_vec(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error serializing report: {}", e);
                process::exit(1);
            }
        }
        if !halted {
            process::exit(2);
        }
        return;
    }

    if halted {
        println!("{} after {} steps", "halted".green().bold(), steps);
    } else {
        println!(
            "{} step budget ({}) exhausted",
            "not halted:".red().bold(),
            steps
        );
    }
    println!("SP    = {}", machine.sp());
    match machine.top() {
        Some(top) => println!("top   = {}", top),
        None => println!("top   = <empty stack>"),
    }
    println!("stack = {:?}", machine.stack());

    if !halted {
        process::exit(2);
    }
}
