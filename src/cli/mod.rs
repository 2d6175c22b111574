//! CLI Module
//!
//! Command-line interface for the neighbor hub using Clap v4.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LoggingConfig;

/// Neighbor hub onboarding for the 48th Ave block
#[derive(Parser, Debug)]
#[command(name = "neighborhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (writes log files to ~/.neighborhub/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep everything in memory instead of talking to the backend
    #[arg(long, global = true)]
    pub offline: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the new-neighbor onboarding wizard (default)
    Onboard,

    /// List the public coupon catalog
    Catalog {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,

        /// Where to write it (default: ~/.neighborhub/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show the effective configuration (API key redacted)
    Config,
}

/// Logging settings from the effective configuration.
///
/// Falls back to defaults when the config cannot be read; the command itself
/// reports that error once logging is up.
pub fn logging_settings(cli: &Cli) -> LoggingConfig {
    commands::read_config(cli.config.as_deref(), cli.offline)
        .map(|config| config.logging)
        .unwrap_or_default()
}

/// Main CLI entry point
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Commands::Onboard) => {
            let config = commands::load_config(cli.config.as_deref(), cli.offline)?;
            commands::cmd_onboard(&config).await
        }
        Some(Commands::Catalog { json }) => {
            let config = commands::load_config(cli.config.as_deref(), cli.offline)?;
            commands::cmd_catalog(&config, json).await
        }
        Some(Commands::Init { force, path }) => {
            let path = path.unwrap_or_else(crate::config::Config::user_config_path);
            commands::cmd_init(&path, force)
        }
        Some(Commands::Config) => {
            let config = commands::read_config(cli.config.as_deref(), cli.offline)?;
            commands::cmd_config(&config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_onboard() {
        let cli = Cli::try_parse_from(["neighborhub"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
        assert!(!cli.offline);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["neighborhub", "catalog", "--json", "--offline", "-d"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Catalog { json: true }));
        assert!(cli.offline);
        assert!(cli.debug);
    }

    #[test]
    fn test_init_flags() {
        let cli =
            Cli::try_parse_from(["neighborhub", "init", "--force", "--path", "hub.toml"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Init {
                force: true,
                path: Some(PathBuf::from("hub.toml")),
            })
        );
    }

    #[test]
    fn test_logging_settings_come_from_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("neighborhub.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\nfile = \"hub.log\"\n").unwrap();

        let cli = Cli::try_parse_from(["neighborhub", "--config", path.to_str().unwrap()]).unwrap();
        let settings = logging_settings(&cli);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.file, Some(PathBuf::from("hub.log")));
    }

    #[test]
    fn test_logging_settings_default_when_config_missing() {
        let cli = Cli::try_parse_from(["neighborhub", "--config", "/nonexistent/hub.toml"]).unwrap();
        assert_eq!(logging_settings(&cli), LoggingConfig::default());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["neighborhub", "chat"]).is_err());
    }
}
