//! Policy command implementation.
//!
//! The `buildplan policy` command shows the optimization policy for the
//! active build mode.

use std::path::{Path, PathBuf};

use crate::cli::args::PolicyArgs;
use crate::error::{ConfigError, Result};
use crate::policy::select_policy;
use crate::resolve::{resolve_mode, ResolveOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The policy command implementation.
pub struct PolicyCommand {
    project_root: PathBuf,
    options: ResolveOptions,
    args: PolicyArgs,
}

impl PolicyCommand {
    /// Create a new policy command.
    pub fn new(project_root: &Path, options: ResolveOptions, args: PolicyArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            options,
            args,
        }
    }
}

impl Command for PolicyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let resolved = resolve_mode(&self.project_root, &self.options)?;
        let policy = select_policy(resolved.mode);

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&policy).map_err(|e| ConfigError::Other(e.into()))?;
            ui.output(&json);
        } else {
            ui.show_header(&format!(
                "Optimization policy: {} ({})",
                resolved.mode, resolved.source
            ));
            for (name, enabled) in policy.toggles() {
                ui.key_value(name, if enabled { "on" } else { "off" });
            }
        }

        Ok(CommandResult::success())
    }
}
