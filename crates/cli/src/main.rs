mod flags;

use anyhow::Result;
use flagdecl::{Arguments, ArgumentsError};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<ExitCode> {
    init_tracing();

    match run(Arguments::from_env()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => report(err),
    }
}

fn run(args: Arguments) -> Result<()> {
    let args = flags::declare(args)?;

    // Must come before any other lookup so `--help` works with invalid values.
    args.check_help()?;

    if args.get::<bool>("print-schema")? {
        println!("{}", args.schema().to_json_pretty()?);
        return Ok(());
    }

    let values = args.get_flags()?;
    tracing::debug!(flags = values.len(), "resolved flags");

    println!("{values:#?}");
    for command in args.commands() {
        println!("command: {command}");
    }

    Ok(())
}

/// Print help and expected failures; anything else is a bug and propagates.
fn report(err: anyhow::Error) -> Result<ExitCode> {
    let printable = err
        .downcast_ref::<ArgumentsError>()
        .and_then(ArgumentsError::printable);

    if let Some(printable) = printable {
        if printable.is_success() {
            println!("{printable}");
        } else {
            eprintln!("{printable}");
        }
        return Ok(printable.exit_code());
    }

    Err(err)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
