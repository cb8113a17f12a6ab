//! Resolve command implementation.
//!
//! The `buildplan resolve` command prints the resolved build plan.

use std::fs;
use std::path::{Path, PathBuf};

use crate::assembler::ResolvedConfig;
use crate::cli::args::ResolveArgs;
use crate::error::{ConfigError, Result};
use crate::resolve::{resolve_build_plan, ResolveOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand {
    project_root: PathBuf,
    options: ResolveOptions,
    args: ResolveArgs,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(project_root: &Path, options: ResolveOptions, args: ResolveArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            options,
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ResolveArgs {
        &self.args
    }

    fn render(&self, plan: &ResolvedConfig) -> Result<String> {
        if self.args.yaml {
            serde_yaml::to_string(plan).map_err(|e| ConfigError::Other(e.into()))
        } else {
            serde_json::to_string_pretty(plan).map_err(|e| ConfigError::Other(e.into()))
        }
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let plan = resolve_build_plan(&self.project_root, &self.options)?;
        let rendered = self.render(&plan)?;

        match &self.args.output {
            Some(path) => {
                let mut contents = rendered;
                if !contents.ends_with('\n') {
                    contents.push('\n');
                }
                fs::write(path, contents)?;
                ui.success(&format!(
                    "Wrote {} plan to {}",
                    plan.mode,
                    path.display()
                ));
            }
            None => ui.output(&rendered),
        }

        Ok(CommandResult::success())
    }
}
