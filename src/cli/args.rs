//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::mode::BuildMode;

/// buildplan - Resolve front-end build configuration into one plan.
#[derive(Debug, Parser)]
#[command(name = "buildplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (replaces buildplan.yml discovery)
    #[arg(short, long, global = true, env = "BUILDPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Build mode (development or production); overrides BUILD_MODE
    #[arg(short, long, global = true, value_name = "MODE")]
    pub mode: Option<BuildMode>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved build plan (default if no command specified)
    Resolve(ResolveArgs),

    /// Validate configuration and report problems
    Check(CheckArgs),

    /// Show the optimization policy for the active mode
    Policy(PolicyArgs),

    /// Show the resolved path alias table
    Aliases(AliasesArgs),

    /// Show how the dev server would proxy a request path
    Proxy(ProxyArgs),

    /// Write a starter buildplan.yml
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Output as YAML instead of JSON
    #[arg(long)]
    pub yaml: bool,

    /// Write the plan to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {}

/// Arguments for the `policy` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PolicyArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `aliases` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AliasesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `proxy` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ProxyArgs {
    /// Request path to match, e.g. /api/users
    #[arg(long)]
    pub path: String,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["buildplan"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.mode.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["buildplan", "policy", "--mode", "prod", "--json"]).unwrap();
        assert_eq!(cli.mode, Some(BuildMode::Production));
        assert!(matches!(cli.command, Some(Commands::Policy(PolicyArgs { json: true }))));
    }

    #[test]
    fn invalid_mode_is_rejected() {
        assert!(Cli::try_parse_from(["buildplan", "--mode", "staging"]).is_err());
    }

    #[test]
    fn resolve_output_file() {
        let cli =
            Cli::try_parse_from(["buildplan", "resolve", "--yaml", "-o", "plan.yml"]).unwrap();
        match cli.command {
            Some(Commands::Resolve(args)) => {
                assert!(args.yaml);
                assert_eq!(args.output, Some(PathBuf::from("plan.yml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn proxy_requires_path() {
        assert!(Cli::try_parse_from(["buildplan", "proxy"]).is_err());
    }
}
