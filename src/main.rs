use mojito::{Executor, ScriptError, format_stack, runtime::error};
use std::{
    env::{args, var, var_os},
    fs::read_to_string,
    io::{BufRead, Write, stdin, stdout},
    process::{ExitCode, Termination},
};
use tracing::debug;

/// The environment variable holding the log filter, for example `MOJITO_LOG=mojito=trace`.
const LOG_VARIABLE: &str = "MOJITO_LOG";

/// The environment variable naming a source file to run before anything else.
const PRELUDE_VARIABLE: &str = "MOJITO_PRELUDE";

/// Only install a subscriber when logging was asked for, so the REPL stays quiet by default.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if var_os(LOG_VARIABLE).is_some() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_env(LOG_VARIABLE))
            .init();
    }
}

/// Read a whole source file, naming the file in the error if that fails.
fn read_source(path: &str) -> error::Result<String> {
    read_to_string(path).map_err(|err| {
        ScriptError::new(
            error::ErrorKind::Io,
            None,
            format!("could not read '{}': {}", path, err),
            None,
        )
    })
}

/// Run the user's prelude file if one has been configured.
fn run_prelude(executor: &mut Executor) -> error::Result<()> {
    if let Ok(path) = var(PRELUDE_VARIABLE) {
        debug!(%path, "running prelude");

        let source = read_source(&path)?;
        executor.run(&source)?;
    }

    Ok(())
}

/// Read lines from stdin and run each one, printing the stack after every line.  Errors are
/// reported and the session carries on with the stack as the failing line left it.
fn repl(executor: &mut Executor) -> error::Result<()> {
    let mut input = stdin().lock();
    let mut line = String::new();
    let mut line_number = 1;

    loop {
        print!(">>> ");
        stdout().flush()?;

        line.clear();

        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let current_line = line_number;
        line_number += 1;

        // Only the line ending is stripped, leading blanks still count towards the columns.
        let text = line.trim_end_matches(['\n', '\r']);

        match text.trim() {
            "" => continue,
            "exit" | "quit" => break,
            _ => {}
        }

        match executor.run_from_line(text, current_line) {
            Ok(stack) => println!("{}", format_stack(stack)),
            Err(error) => println!("Error: {}", error),
        }
    }

    Ok(())
}

fn run() -> error::Result<()> {
    let args: Vec<String> = args().collect();

    if args.len() >= 2 && (args[1] == "--version" || args[1] == "-v") {
        println!("mojito {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut executor = Executor::with_standard_library();

    run_prelude(&mut executor)?;

    if args.len() >= 2 {
        let source = read_source(&args[1])?;
        executor.run(&source)?;
    } else {
        repl(&mut executor)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => error.report(),
    }
}
