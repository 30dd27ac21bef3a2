//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gitcfg_core::{OutputFormat, Scope};

/// gitcfg - Explore and manage git configuration with scope-aware output
#[derive(Parser, Debug)]
#[command(name = "gitcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    /// Enable verbose diagnostic logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Additional settings file, layered over the global one
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Timeout in seconds for each git invocation
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Run as if started in DIR
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Display consolidated configuration grouped by category
    ///
    /// Examples:
    ///   gitcfg view                          # Everything, all scopes
    ///   gitcfg view --scope local            # Only the repository's settings
    ///   gitcfg view --category user-identity # One category
    ///   gitcfg view --search email -f json   # Keyword filter as JSON
    View {
        /// Limit output to a single scope (system, global, or local)
        #[arg(long)]
        scope: Option<Scope>,

        /// Restrict output to a configuration category id
        #[arg(long)]
        category: Option<String>,

        /// Filter by keyword in key or value (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Output format (pretty or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Show the effective value of a key and which scopes override which
    Get {
        /// Configuration key, e.g. user.email
        key: String,

        /// Output format (pretty or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Set a key at a scope, replacing any existing values there
    Set {
        /// Configuration key, e.g. user.email
        key: String,

        /// New value
        value: String,

        /// Scope to write to
        #[arg(long, default_value = "global")]
        scope: Scope,
    },

    /// Remove every value of a key at a scope
    Unset {
        /// Configuration key, e.g. core.editor
        key: String,

        /// Scope to remove from
        #[arg(long, default_value = "global")]
        scope: Scope,
    },

    /// List categories and bundles with coverage of the current configuration
    Categories {
        /// Output format (pretty or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_view_filters() {
        let cli = Cli::parse_from([
            "gitcfg", "view", "--scope", "LOCAL", "--category", "core-behavior", "--search", "edit",
            "-f", "json",
        ]);
        assert_eq!(
            cli.command,
            Commands::View {
                scope: Some(Scope::Local),
                category: Some("core-behavior".into()),
                search: Some("edit".into()),
                format: Some(OutputFormat::Json),
            }
        );
    }

    #[test]
    fn set_defaults_to_global_scope() {
        let cli = Cli::parse_from(["gitcfg", "set", "user.name", "Ann"]);
        assert_eq!(
            cli.command,
            Commands::Set {
                key: "user.name".into(),
                value: "Ann".into(),
                scope: Scope::Global,
            }
        );
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::parse_from(["gitcfg", "get", "user.email", "-C", "/tmp", "--timeout", "2.5", "-v"]);
        assert_eq!(cli.global.directory, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.global.timeout, Some(2.5));
        assert!(cli.global.verbose);
    }

    #[test]
    fn user_scope_is_alias_of_global() {
        let cli = Cli::parse_from(["gitcfg", "unset", "user.name", "--scope", "user"]);
        assert!(matches!(cli.command, Commands::Unset { scope: Scope::Global, .. }));
    }

    #[test]
    fn unknown_scope_is_rejected() {
        assert!(Cli::try_parse_from(["gitcfg", "view", "--scope", "worktree"]).is_err());
    }
}
