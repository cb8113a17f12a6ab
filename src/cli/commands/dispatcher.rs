//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, ResolveArgs};
use crate::error::Result;
use crate::resolve::ResolveOptions;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    options: ResolveOptions,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf, options: ResolveOptions) -> Self {
        Self {
            project_root,
            options,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the options every resolving command uses.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.project_root;
        let options = self.options.clone();

        match &cli.command {
            Some(Commands::Resolve(args)) => {
                let cmd = super::resolve::ResolveCommand::new(root, options, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Check(_)) => {
                let cmd = super::check::CheckCommand::new(root, options);
                cmd.execute(ui)
            }
            Some(Commands::Policy(args)) => {
                let cmd = super::policy::PolicyCommand::new(root, options, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Aliases(args)) => {
                let cmd = super::aliases::AliasesCommand::new(root, options, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Proxy(args)) => {
                let cmd = super::proxy::ProxyCommand::new(root, options, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Init(args)) => {
                let cmd = super::init::InitCommand::new(root, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                // Default to resolve with default args
                let cmd = super::resolve::ResolveCommand::new(root, options, ResolveArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
