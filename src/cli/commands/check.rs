//! Check command implementation.
//!
//! The `buildplan check` command resolves the plan without printing it and
//! reports every structural problem at once.

use std::path::{Path, PathBuf};

use crate::aliases::absolute_root;
use crate::config::validate_config;
use crate::error::Result;
use crate::resolve::{load_project_config, resolve_build_plan, ResolveOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    options: ResolveOptions,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, options: ResolveOptions) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            options,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = absolute_root(&self.project_root)?;
        let (resolved_mode, loaded) = load_project_config(&root, &self.options)?;

        if loaded.sources.is_empty() {
            ui.verbose("No configuration files found, using defaults");
        }
        for source in &loaded.sources {
            ui.verbose(&format!("Loaded {}", source.display()));
        }
        if loaded.env_overrides {
            ui.verbose("Applied BUILDPLAN__* overrides");
        }

        let errors = validate_config(&loaded.config);
        if !errors.is_empty() {
            for error in &errors {
                ui.error(&format!("{}: {}", error.field, error.message));
            }
            let noun = if errors.len() == 1 { "problem" } else { "problems" };
            ui.error(&format!("Found {} configuration {}", errors.len(), noun));
            return Ok(CommandResult::failure(1));
        }

        let plan = resolve_build_plan(&root, &self.options)?;

        ui.show_header("Build plan");
        ui.key_value(
            "mode",
            &format!("{} ({})", resolved_mode.mode, resolved_mode.source),
        );
        ui.key_value("config files", &loaded.sources.len().to_string());
        ui.key_value("aliases", &plan.aliases.len().to_string());
        ui.key_value("styles", &plan.style_resources.len().to_string());
        ui.key_value("proxy rules", &plan.proxy_rules.len().to_string());
        ui.success("Configuration is valid");

        Ok(CommandResult::success())
    }
}
