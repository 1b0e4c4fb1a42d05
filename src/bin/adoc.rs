//! Command-line interface for adoc
//! This binary parses markup files and prints the resulting tree, or checks them for problems.
//!
//! Usage:
//!   adoc parse `<path>` [--format `<format>`] [--draft] [--config `<file>`] [-a name=value]
//!   adoc check `<path>` [--config `<file>`] [-a name=value]
//!
//! `check` exits with status 1 when the document has warnings and 2 when it cannot be read.

use adoc::adoc::formats::{serialize_blocks, serialize_draft};
use adoc::adoc::{DocumentLoader, ParseConfig};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adoc=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = Command::new("adoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing and checking markup documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_input_args(Command::new("parse").about("Parse a document and print its tree"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "yaml", "markup"])
                        .default_value("json"),
                )
                .arg(
                    Arg::new("draft")
                        .long("draft")
                        .help("Stop after parsing, leaving includes and references unresolved")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(with_input_args(
            Command::new("check").about("Parse and resolve a document, reporting warnings"),
        ))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches),
        Some(("check", check_matches)) => handle_check_command(check_matches),
        _ => unreachable!(),
    }
}

fn with_input_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("path")
                .help("Path to the document")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("YAML file with parse settings"),
        )
        .arg(
            Arg::new("attribute")
                .long("attribute")
                .short('a')
                .help("Set a document attribute (name=value, or name to set it empty)")
                .action(ArgAction::Append),
        )
}

/// Build the loader for the `path` argument, applying `--config` and `--attribute`.
fn load(matches: &ArgMatches) -> DocumentLoader {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");

    let mut config = match matches.get_one::<String>("config") {
        Some(config_path) => ParseConfig::from_yaml_file(config_path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }),
        None => ParseConfig::default(),
    };
    if let Some(attributes) = matches.get_many::<String>("attribute") {
        for attribute in attributes {
            let (name, value) = attribute.split_once('=').unwrap_or((attribute, ""));
            config = config.with_attribute(name.trim(), value.trim());
        }
    }

    match DocumentLoader::from_path(path) {
        Ok(loader) => loader.with_config(config),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches) {
    let loader = load(matches);
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");

    let output = if matches.get_flag("draft") {
        let draft = loader.parse_draft().unwrap_or_else(|e| fail(e));
        match format {
            "markup" => Ok(serialize_draft(&draft)),
            "yaml" => serde_yaml::to_string(&draft).map_err(|e| e.to_string()),
            _ => serde_json::to_string_pretty(&draft).map_err(|e| e.to_string()),
        }
    } else {
        let resolved = loader.parse().unwrap_or_else(|e| fail(e));
        for warning in &resolved.warnings {
            eprintln!("{}", warning);
        }
        match format {
            "markup" => Ok(serialize_blocks(&resolved.document.blocks)),
            "yaml" => serde_yaml::to_string(&resolved).map_err(|e| e.to_string()),
            _ => serde_json::to_string_pretty(&resolved).map_err(|e| e.to_string()),
        }
    };

    match output {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => fail(e),
    }
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) {
    let resolved = load(matches).parse().unwrap_or_else(|e| fail(e));
    if resolved.has_warnings() {
        for warning in &resolved.warnings {
            eprintln!("{}", warning);
        }
        eprintln!("{} warning(s)", resolved.warnings.len());
        std::process::exit(1);
    }
    println!("ok");
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(2);
}
