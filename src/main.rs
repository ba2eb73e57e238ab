use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tapeworm::batch::run_batch;
use tapeworm::io::{ByteSink, ReadSource, WriteSink};
use tapeworm::machine::{EofPolicy, Machine, MachineConfig, RunResult};
use tapeworm::program::Program;
use tapeworm::tape::DEFAULT_TAPE_SIZE;

#[derive(Parser)]
#[command(name = "tapeworm", about = "Interpreter for the eight-instruction tape language")]
struct Cli {
    /// Program source files. More than one runs them in parallel.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Number of tape cells.
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Abort a run after this many steps.
    #[arg(long)]
    step_limit: Option<usize>,

    /// What ',' stores once input is exhausted.
    #[arg(long, value_enum, default_value_t = Eof::Zero)]
    eof: Eof,

    /// Read program input from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Reject programs with unbalanced brackets before running them.
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Eof {
    /// Store 0.
    Zero,
    /// Leave the cell unchanged.
    Unchanged,
}

impl From<Eof> for EofPolicy {
    fn from(eof: Eof) -> Self {
        match eof {
            Eof::Zero => EofPolicy::Zero,
            Eof::Unchanged => EofPolicy::Unchanged,
        }
    }
}

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Reject flag combinations clap cannot express on its own.
fn check_args(cli: &Cli) -> Result<(), String> {
    if cli.files.len() > 1 && cli.input.is_none() {
        return Err("running several programs requires --input, stdin cannot be shared".to_string());
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = check_args(&cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let config = MachineConfig {
        tape_size: cli.tape_size,
        step_limit: cli.step_limit,
        eof: cli.eof.into(),
    };

    let mut programs = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let program = match Program::from_file(path) {
            Ok(program) => program,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                std::process::exit(1);
            }
        };
        if cli.strict {
            if let Err(e) = program.check_brackets() {
                eprintln!("{}: {e}", path.display());
                std::process::exit(1);
            }
        }
        programs.push(program);
    }

    let input = match cli.input.as_ref().map(std::fs::read).transpose() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("failed to read input: {e}");
            std::process::exit(1);
        }
    };

    let ok = if programs.len() == 1 {
        run_single(&cli.files[0], &programs[0], input.as_deref(), config)
    } else {
        // check_args guarantees an input file in batch mode.
        run_many(&cli.files, &programs, input.as_deref().unwrap_or_default(), config)
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Run one program wired straight to stdout, reading stdin unless an input
/// file was given.
fn run_single(path: &Path, program: &Program, input: Option<&[u8]>, config: MachineConfig) -> bool {
    let mut machine = match Machine::new(program, config) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("{e}");
            return false;
        }
    };

    let mut output = WriteSink::new(io::stdout().lock());
    let result = match input {
        Some(mut bytes) => machine.run(&mut bytes, &mut output),
        None => machine.run(&mut ReadSource::new(io::stdin().lock()), &mut output),
    };
    // Output written before a failure still has to reach the terminal.
    if let Err(e) = output.flush() {
        eprintln!("failed to flush output: {e}");
        return false;
    }
    report(path, &result)
}

/// Run several programs in parallel and print their outputs in argument order.
fn run_many(paths: &[PathBuf], programs: &[Program], input: &[u8], config: MachineConfig) -> bool {
    let outcomes = run_batch(programs, input, config);

    let mut stdout = io::stdout().lock();
    let mut ok = true;
    for (path, outcome) in paths.iter().zip(&outcomes) {
        if let Err(e) = stdout.write_all(&outcome.output).and_then(|()| stdout.flush()) {
            eprintln!("failed to write output: {e}");
            return false;
        }
        ok &= report(path, &outcome.result);
    }
    ok
}

fn report(path: &Path, result: &RunResult) -> bool {
    match result {
        Ok(halted) => {
            tracing::info!(file = %path.display(), steps = halted.steps, "halted");
            true
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tapeworm").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_file_reads_stdin() {
        assert!(check_args(&parse(&["a.b"])).is_ok());
    }

    #[test]
    fn test_several_files_need_input() {
        let err = check_args(&parse(&["a.b", "b.b"])).unwrap_err();
        assert!(err.contains("--input"));
    }

    #[test]
    fn test_several_files_with_input() {
        assert!(check_args(&parse(&["a.b", "b.b", "--input", "in.txt"])).is_ok());
    }

    #[test]
    fn test_no_files_rejected() {
        assert!(Cli::try_parse_from(["tapeworm"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["a.b"]);
        assert_eq!(cli.tape_size, DEFAULT_TAPE_SIZE);
        assert_eq!(cli.step_limit, None);
        assert_eq!(EofPolicy::from(cli.eof), EofPolicy::Zero);
        assert!(!cli.strict);
    }
}
