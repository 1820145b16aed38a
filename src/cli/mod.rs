//! CLI module - Command-line interface for Folio
//!
//! Argument parsing lives here; each subcommand's work is in `commands`.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - portfolio tracker backend
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to ./config.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `database.url`
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Overrides `server.port`
    #[arg(long, env = "FOLIO_PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Apply pending migrations and exit
    Migrate,

    /// Delete expired sessions once and exit
    #[command(alias = "purge")]
    PurgeSessions,

    /// Delete a user with its sessions and portfolios
    #[command(alias = "rm-user")]
    DeleteUser {
        username: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["folio"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parses_overrides_and_subcommand() {
        let cli = Cli::try_parse_from([
            "folio",
            "--database-url",
            "sqlite::memory:",
            "--port",
            "9000",
            "delete-user",
            "alice",
            "--yes",
        ])
        .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(
            cli.command,
            Some(Commands::DeleteUser {
                username: "alice".to_string(),
                yes: true,
            })
        );
    }

    #[test]
    fn test_purge_alias() {
        let cli = Cli::try_parse_from(["folio", "purge"]).unwrap();
        assert_eq!(cli.command, Some(Commands::PurgeSessions));
    }
}
