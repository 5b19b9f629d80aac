//! Command-line interface for twee
//! This binary splits twee files into passages, tokenizes passage bodies and prints the
//! result in one of several formats.
//!
//! Usage:
//!   twee `<path>` [--format `<format>`] [--config `<file>`] [--output `<file>`] [--macro-names]
//!   twee --list-formats                                  - List all available output formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use twee::config::{Loader, TweeConfig};
use twee::processor::{available_formats, ProcessingError, Processor};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let matches = Command::new("twee")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split twee files into passages and tokenize passage bodies")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the twee file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (e.g., 'token-log', 'passage-json'); overrides the config"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults and ./twee.toml"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the output to this file instead of stdout"),
        )
        .arg(
            Arg::new("macro-names")
                .long("macro-names")
                .help("Emit macroName tokens for words directly followed by a colon")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    if let Err(e) = handle_process_command(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Layer defaults, ./twee.toml, --config and CLI flags
fn load_config(matches: &ArgMatches) -> Result<TweeConfig, ProcessingError> {
    let mut loader = Loader::new().with_working_dir(".");
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let format = matches.get_one::<String>("format").map(String::as_str);
    Ok(loader
        .with_flags(format, matches.get_flag("macro-names"))?
        .build()?)
}

/// Handle the default process command
fn handle_process_command(matches: &ArgMatches) -> Result<(), ProcessingError> {
    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| ProcessingError::FileNotFound("no input path given".to_string()))?;

    let config = load_config(matches)?;
    let processor = Processor::from_config(&config)?;
    let output = processor.process_file(path)?;

    match matches.get_one::<String>("output") {
        Some(out_path) => fs::write(out_path, output)?,
        None => print!("{}", output),
    }
    Ok(())
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
