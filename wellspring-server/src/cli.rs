use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wellspring",
    about = "Wellspring Gateway - credential-holding AI proxy",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "WELLSPRING_CONFIG", help = "Path to a JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "WELLSPRING_HOST", help = "Interface to bind (overrides config)")]
    pub host: Option<String>,

    #[arg(short, long, env = "WELLSPRING_PORT", help = "Port to listen on (overrides config)")]
    pub port: Option<u16>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the gateway (default if no command specified)")]
    Serve,

    #[command(subcommand, about = "Inspect configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Validate the configuration and credential without serving")]
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["wellspring", "--port", "9000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.port, Some(9000));
    }

    #[test]
    fn test_config_show_json() {
        let cli = Cli::try_parse_from(["wellspring", "config", "show", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config(ConfigCommands::Show { json: true }))));
    }
}
