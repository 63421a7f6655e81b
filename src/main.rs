use anyhow::Context;
use clap::{CommandFactory, Parser};
use logtally::cli::Cli;
use logtally::logging::init_logging;
use logtally::{source, Engine, Interrupt, Termination};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // bad options and patterns are reported before any input is read
    let engine = match cli
        .to_config()
        .and_then(|config| Engine::new(&config, io::stdout().lock()))
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("logtally: {e}");
            return ExitCode::from(2);
        }
    };

    match run(engine) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("logtally: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run<W: Write>(engine: Engine<W>) -> anyhow::Result<ExitCode> {
    let interrupt = Interrupt::new();
    let handler = interrupt.clone();
    ctrlc::set_handler(move || handler.trigger()).context("installing interrupt handler")?;

    let mut input = source::stdin().context("starting input reader")?;
    let finished = engine
        .run(&mut input, &interrupt)
        .context("writing report")?;

    Ok(match finished.summary.termination {
        Termination::NoInput => {
            eprintln!("logtally: no input received on stdin\n");
            eprintln!("{}", Cli::command().render_help());
            ExitCode::FAILURE
        }
        Termination::InputError(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
