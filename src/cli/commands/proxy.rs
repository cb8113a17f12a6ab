//! Proxy command implementation.
//!
//! The `buildplan proxy --path /api/users` command shows which proxy rule
//! forwards a request path and where it ends up.

use std::path::{Path, PathBuf};

use crate::aliases::absolute_root;
use crate::cli::args::ProxyArgs;
use crate::error::Result;
use crate::proxy::{find_rule, resolve_proxy_rules};
use crate::resolve::{load_project_config, ResolveOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The proxy command implementation.
pub struct ProxyCommand {
    project_root: PathBuf,
    options: ResolveOptions,
    args: ProxyArgs,
}

impl ProxyCommand {
    /// Create a new proxy command.
    pub fn new(project_root: &Path, options: ResolveOptions, args: ProxyArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            options,
            args,
        }
    }
}

impl Command for ProxyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = absolute_root(&self.project_root)?;
        let (_, loaded) = load_project_config(&root, &self.options)?;
        let rules = resolve_proxy_rules(&loaded.config.dev_server.proxy)?;

        let path = self.args.path.as_str();
        let Some(rule) = find_rule(&rules, path) else {
            ui.warning(&format!("No proxy rule matches {}", path));
            return Ok(CommandResult::failure(1));
        };

        let rewritten = rule.rewrite_path(path);
        let forwarded = format!("{}{}", rule.target.trim_end_matches('/'), rewritten);

        ui.show_header(&format!("Proxy {}", rule.path_prefix));
        ui.key_value("target", &rule.target);
        ui.key_value("rewritten", &rewritten);
        ui.key_value("forwarded to", &forwarded);
        ui.key_value("websocket", if rule.ws { "yes" } else { "no" });
        ui.key_value("change origin", if rule.change_origin { "yes" } else { "no" });

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("buildplan.yml"),
            r#"
dev_server:
  proxy:
    - path_prefix: /api
      target: http://www.example.org
      rewrite:
        - pattern: "^/api"
          replacement: "/api"
        - pattern: "^/api"
          replacement: ""
"#,
        )
        .unwrap();
        temp
    }

    fn run(temp: &TempDir, path: &str) -> (CommandResult, MockUI) {
        let cmd = ProxyCommand::new(
            temp.path(),
            ResolveOptions::default(),
            ProxyArgs {
                path: path.to_string(),
            },
        );
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn shows_rewritten_path_with_last_declared_rewrite() {
        let temp = setup_project();
        let (result, ui) = run(&temp, "/api/users");

        assert!(result.success);
        assert!(ui.has_key_value("rewritten", "/users"));
        assert!(ui.has_key_value("forwarded to", "http://www.example.org/users"));
    }

    #[test]
    fn unmatched_path_fails() {
        let temp = setup_project();
        let (result, ui) = run(&temp, "/static/app.js");

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_warning("No proxy rule matches /static/app.js"));
    }
}
