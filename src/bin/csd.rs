//! Command-line interface for inspecting transcripts
//! Runs the completion engine over a transcript file with the reference Horn engine.
//!
//! Usage:
//!   csd complete `<path>` [--config `<toml>`] [--mode `<mode>`]  - Print the pattern for the next characters
//!   csd check `<path>` [--config `<toml>`] [--mode `<mode>`]     - Print the completion verdict as JSON
//!   csd fixtures                                                - List the bundled transcript fixtures

use clap::{Arg, ArgMatches, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use peano_csd::csd::config::{CompletionConfig, Loader};
use peano_csd::csd::error::CompletionError;
use peano_csd::csd::testing::{engine_with, Transcripts};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let transcript_args = |command: Command| {
        command
            .arg(
                Arg::new("path")
                    .help("Path to the transcript file")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("config")
                    .long("config")
                    .short('c')
                    .help("TOML file layered over the built-in defaults"),
            )
            .arg(
                Arg::new("mode")
                    .long("mode")
                    .short('m')
                    .help("Grammar mode override ('free-form' or 'enumerated')"),
            )
    };

    let matches = Command::new("csd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Constrained decoding for proof transcripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(transcript_args(
            Command::new("complete").about("Print the pattern the next characters must match"),
        ))
        .subcommand(transcript_args(
            Command::new("check").about("Print whether the transcript is a finished proof"),
        ))
        .subcommand(Command::new("fixtures").about("List the bundled transcript fixtures"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("complete", sub)) => handle_complete_command(sub),
        Some(("check", sub)) => handle_check_command(sub),
        Some(("fixtures", _)) => handle_fixtures_command(),
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(matches: &ArgMatches) -> Result<CompletionConfig, CompletionError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        loader = loader.set_override("grammar.mode", mode.as_str())?;
    }
    Ok(loader.build()?)
}

fn read_transcript(matches: &ArgMatches) -> String {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the complete command
fn handle_complete_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let transcript = read_transcript(matches);
    let engine = engine_with(load_config(matches)?);

    let state = engine.state(&transcript)?;
    let pattern = engine.complete(&transcript)?;
    eprintln!("state: {:?}", state);
    println!("{}", pattern);
    Ok(())
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let transcript = read_transcript(matches);
    let engine = engine_with(load_config(matches)?);

    let verdict = engine.is_complete(&transcript)?;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

/// Handle the fixtures command
fn handle_fixtures_command() -> Result<(), Box<dyn std::error::Error>> {
    println!("Bundled transcripts ({}):\n", Transcripts::dir().display());
    for name in Transcripts::list()? {
        println!("  {}", name);
    }
    Ok(())
}
