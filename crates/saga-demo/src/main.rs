mod error;
mod scenario;
mod service;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use saga_coordinator::SagaBuilder;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{CliError, Result};
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "saga-demo")]
#[command(version)]
#[command(about = "Run a saga over demo services", long_about = None)]
struct Cli {
    /// TOML scenario describing the participants (default: built-in demo)
    #[arg(long, short = 's', value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Make the named participant fail its transaction
    #[arg(long = "fail-at", value_name = "NAME")]
    fail_at: Option<String>,

    /// Make the named participant fail its compensation (repeatable)
    #[arg(long = "fail-compensation", value_name = "NAME")]
    fail_compensation: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(name) = &cli.fail_at {
        scenario.fail_at(name)?;
    }
    for name in &cli.fail_compensation {
        scenario.fail_compensation(name)?;
    }

    let services = scenario.services();
    let saga = SagaBuilder::new().participants(&services).build();
    tracing::debug!(participants = saga.len(), "starting saga");

    match saga.execute() {
        Ok(()) => {
            for result in services.iter().filter_map(service::Service::result) {
                println!("{result}");
            }
            Ok(())
        }
        Err(err) => {
            let compensation_errors = saga
                .errors()
                .into_iter()
                .flatten()
                .map(|(name, error)| (name.clone(), error.clone()))
                .collect();
            let step = err.step().unwrap_or_default().to_owned();
            match err.into_source() {
                Some(source) => Err(CliError::SagaFailed {
                    step,
                    source,
                    compensation_errors,
                }),
                None => Err(CliError::AlreadyExecuted),
            }
        }
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }

    if let CliError::SagaFailed {
        compensation_errors,
        ..
    } = error
    {
        if compensation_errors.is_empty() {
            eprintln!("rolled back cleanly");
        } else {
            for (name, err) in compensation_errors {
                eprintln!("compensation failed for '{name}': {err}");
            }
        }
    }
}
