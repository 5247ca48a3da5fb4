//! occmap CLI - Command-line interface
//!
//! Runs the occurrence density tile server and offers one-shot tile and
//! capabilities requests against the configured store.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::PathBuf;

use commands::capabilities::CapabilitiesArgs;
use commands::config::ConfigCommands;
use commands::serve::ServeArgs;
use commands::tile::TileArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "occmap")]
#[command(version = occmap::VERSION)]
#[command(about = "Occurrence density vector tile server", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.occmap/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP tile server
    Serve(ServeArgs),

    /// Compose a single tile and write it to a file
    Tile(TileArgs),

    /// Print a dataset's extent and year span as JSON
    Capabilities(CapabilitiesArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config { command } => commands::config::run(command, config_path),
        Commands::Serve(args) => {
            let runner = CliRunner::new(config_path, true)?;
            block_on(commands::serve::run(&runner, args))
        }
        Commands::Tile(args) => {
            let runner = CliRunner::new(config_path, true)?;
            block_on(commands::tile::run(&runner, args))
        }
        Commands::Capabilities(args) => {
            // JSON goes to stdout, keep logs off it
            let runner = CliRunner::new(config_path, false)?;
            block_on(commands::capabilities::run(&runner, args))
        }
    }
}

fn block_on<F>(command: F) -> Result<(), CliError>
where
    F: Future<Output = Result<(), CliError>>,
{
    tokio::runtime::Runtime::new()
        .map_err(CliError::Runtime)?
        .block_on(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["occmap", "config", "path", "--config", "/tmp/o.ini"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/o.ini")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Path
            }
        ));
    }

    #[test]
    fn test_serve_bind_override() {
        let cli = Cli::parse_from(["occmap", "serve", "--bind", "127.0.0.1:9001"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, Some("127.0.0.1:9001".parse().unwrap()));
    }
}
