//! locbridge command-line tool.
//!
//! Inspect how option objects are interpreted and replay recorded engine
//! callbacks through a location session.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::build::BuildArgs;
use commands::run::RunArgs;
use commands::common::load_config;
use error::CliError;

#[derive(Parser)]
#[command(name = "locbridge")]
#[command(about = "Event-based bridge to a native location engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.locbridge/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the location request built from an options object
    Build(BuildArgs),

    /// List recognized option keys with their kind and default
    Keys,

    /// Replay engine callbacks through a session, printing each event
    Run(RunArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        e.exit();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Build(args) => commands::build::run(args),
        Commands::Keys => {
            commands::keys::run();
            Ok(())
        }
        Commands::Run(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::run::run(args, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from([
            "locbridge",
            "--config",
            "/tmp/lb.ini",
            "run",
            "--fixes",
            "fixes.jsonl",
            "--options",
            r#"{"onceLocation":true}"#,
            "--max-events",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lb.ini")));
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.fixes, PathBuf::from("fixes.jsonl"));
                assert_eq!(args.max_events, Some(3));
                assert!(!args.repeat);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_requires_fixes() {
        assert!(Cli::try_parse_from(["locbridge", "run"]).is_err());
    }
}
