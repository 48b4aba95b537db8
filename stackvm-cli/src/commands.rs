//! CLI command implementations.

use std::fs;
use std::io;

use stackvm_common::Program;
use stackvm_vm::{Config, VmError, VM};

/// Check and execute a program.
pub fn run(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: stackvm run <program> [--time]");
        return Err(1);
    };

    let mut config = Config::new();
    for flag in &args[1..] {
        match flag.as_str() {
            "--time" => config = config.with_timing(true),
            other => {
                eprintln!("error: unknown option '{other}'");
                return Err(1);
            }
        }
    }

    let program = load_program(input)?;
    let mut vm = VM::new(&program, config, io::stdout().lock());
    let report = vm.execute().map_err(report_error)?;

    if let Some(elapsed) = report.elapsed {
        eprintln!(
            "elapsed: {:.3} ms ({} steps)",
            elapsed.as_secs_f64() * 1000.0,
            report.steps
        );
    }
    Ok(())
}

/// Parse and check a program without running it.
pub fn check(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: stackvm check <program>");
        return Err(1);
    };

    let program = load_program(input)?;
    println!("OK: {input} ({} instructions)", program.len());
    Ok(())
}

/// Print the canonical text of a program.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: disassemble requires an input file");
        eprintln!("Usage: stackvm disassemble <program>");
        return Err(1);
    };

    let text = read_text(input)?;
    let program = stackvm_assembler::assemble(&text).map_err(|e| {
        report_error(VmError::from_parse(&e, &text))
    })?;
    print!("{}", stackvm_assembler::disassemble(&program));
    Ok(())
}

// ---- Helpers ----

fn read_text(path: &str) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })
}

/// Read, parse and check a program file.
fn load_program(path: &str) -> Result<Program, i32> {
    let text = read_text(path)?;
    stackvm_vm::load(&text).map_err(report_error)
}

/// Print a classified error and pick the exit code for it.
fn report_error(err: VmError) -> i32 {
    eprintln!("error: {err}");
    tracing::debug!(detail = %err.message, stage = ?err.stage, "program failed");
    if err.is_static() {
        2
    } else {
        3
    }
}
