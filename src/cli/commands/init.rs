//! Init command implementation.
//!
//! The `buildplan init` command writes a starter `buildplan.yml` and the
//! shared style files it references.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::{schema::default_style_resources, LOCAL_FILE, PROJECT_FILE};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn config_path(&self) -> PathBuf {
        self.project_root.join(PROJECT_FILE)
    }

    /// Starter configuration for this project.
    fn create_config(&self) -> String {
        let project_name = self
            .project_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app");

        let resources: String = default_style_resources()
            .iter()
            .map(|p| format!("    - {}\n", p.display()))
            .collect();

        format!(
            "# buildplan configuration for {project_name}\n\
             #\n\
             # Mode files (buildplan.development.yml, buildplan.production.yml)\n\
             # and {LOCAL_FILE} are merged over this file.\n\
             \n\
             # default_mode: development\n\
             \n\
             output:\n\
             \x20 output_dir: dist\n\
             \x20 assets_dir: static\n\
             \x20 public_path: /\n\
             \n\
             aliases:\n\
             \x20 \"@\": src\n\
             \x20 \"@assets\": src/assets\n\
             \x20 \"@components\": src/components\n\
             \x20 \"@views\": src/views\n\
             \n\
             styles:\n\
             \x20 resources:\n\
             {resources}\
             \x20 extract_variables: false\n\
             \n\
             dev_server:\n\
             \x20 host: 0.0.0.0\n\
             \x20 port: 8888\n\
             \x20 proxy:\n\
             \x20   - path_prefix: /api\n\
             \x20     target: http://www.example.org\n\
             \x20     rewrite:\n\
             \x20       - pattern: \"^/api\"\n\
             \x20         replacement: \"/\"\n"
        )
    }

    /// Create any missing shared style file as an empty stub.
    fn scaffold_styles(&self, ui: &mut dyn UserInterface) -> Result<()> {
        for relative in default_style_resources() {
            let path = self.project_root.join(&relative);
            if path.exists() {
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, "// Shared by every stylesheet\n")?;
            ui.verbose(&format!("Created {}", relative.display()));
        }
        Ok(())
    }

    /// Update gitignore to exclude local overrides.
    fn update_gitignore(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let gitignore_path = self.project_root.join(".gitignore");

        if gitignore_path.exists() {
            let content = fs::read_to_string(&gitignore_path)?;
            if !content.lines().any(|line| line.trim() == LOCAL_FILE) {
                let new_content = if content.ends_with('\n') || content.is_empty() {
                    format!("{}{}\n", content, LOCAL_FILE)
                } else {
                    format!("{}\n{}\n", content, LOCAL_FILE)
                };
                fs::write(&gitignore_path, new_content)?;
                ui.message(&format!("Added {} to .gitignore", LOCAL_FILE));
            }
        }

        Ok(())
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config_path = self.config_path();
        if config_path.exists() && !self.args.force {
            ui.error(&format!(
                "{} already exists. Use --force to overwrite.",
                PROJECT_FILE
            ));
            return Ok(CommandResult::failure(2));
        }

        fs::create_dir_all(&self.project_root)?;
        fs::write(&config_path, self.create_config())?;
        self.scaffold_styles(ui)?;
        self.update_gitignore(ui)?;

        ui.success(&format!("Created {}", PROJECT_FILE));
        ui.message("Run `buildplan check` to validate it.");

        Ok(CommandResult::success())
    }
}
