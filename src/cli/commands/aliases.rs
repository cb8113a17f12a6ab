//! Aliases command implementation.
//!
//! The `buildplan aliases` command shows the resolved alias table.

use std::path::{Path, PathBuf};

use crate::aliases::{absolute_root, resolve_aliases};
use crate::cli::args::AliasesArgs;
use crate::error::{ConfigError, Result};
use crate::resolve::{load_project_config, ResolveOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The aliases command implementation.
pub struct AliasesCommand {
    project_root: PathBuf,
    options: ResolveOptions,
    args: AliasesArgs,
}

impl AliasesCommand {
    /// Create a new aliases command.
    pub fn new(project_root: &Path, options: ResolveOptions, args: AliasesArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            options,
            args,
        }
    }
}

impl Command for AliasesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = absolute_root(&self.project_root)?;
        let (_, loaded) = load_project_config(&root, &self.options)?;
        let aliases = resolve_aliases(&root, &loaded.config.aliases)?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&aliases).map_err(|e| ConfigError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Aliases");
        for (name, path) in &aliases {
            let shown = path.strip_prefix(&root).unwrap_or(path);
            ui.key_value(name, &shown.display().to_string());
        }

        Ok(CommandResult::success())
    }
}
