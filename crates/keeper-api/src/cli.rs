//! CLI definitions for the `keeperd` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Secret vault server.
#[derive(Parser)]
#[command(name = "keeperd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to keeper.toml (defaults to ./keeper.toml).
    #[arg(short, long, global = true, env = "KEEPER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Override the configured listen address.
        #[arg(short, long)]
        listen: Option<String>,

        /// Export spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Validate the configuration file and exit.
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "keeperd",
            "--config",
            "/etc/keeper.toml",
            "serve",
            "--listen",
            "0.0.0.0:9000",
            "--otel",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/etc/keeper.toml")));
        match cli.command {
            Commands::Serve { listen, otel } => {
                assert_eq!(listen.as_deref(), Some("0.0.0.0:9000"));
                assert!(otel);
            }
            Commands::CheckConfig => panic!("expected serve"),
        }
    }

    #[test]
    fn test_check_config_accepts_trailing_config() {
        let cli = Cli::try_parse_from(["keeperd", "check-config", "-c", "k.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig));
        assert_eq!(cli.config, Some(PathBuf::from("k.toml")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["keeperd"]).is_err());
    }
}
