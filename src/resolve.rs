//! End-to-end build plan resolution.
//!
//! Resolution is a single pass: check the root, pick the mode, load and
//! validate the layered configuration, resolve aliases, style resources and
//! proxy rules, select the policy and assemble. The first error aborts.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::aliases::{absolute_root, resolve_aliases};
use crate::assembler::{assemble, ResolvedConfig};
use crate::config::{load_layered_config, read_default_mode, validate, LoadedConfig};
use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::mode::{BuildMode, ModeDetector, ResolvedMode};
use crate::policy::select_policy;
use crate::proxy::resolve_proxy_rules;
use crate::styles::load_style_resources;

/// Inputs that come from outside the project directory.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Mode given on the command line
    pub mode_flag: Option<BuildMode>,
    /// Config file replacing discovery
    pub config_override: Option<PathBuf>,
    /// Environment captured at startup
    pub env: EnvSnapshot,
}

impl ResolveOptions {
    pub fn new(env: EnvSnapshot) -> Self {
        Self {
            env,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode_flag = Some(mode);
        self
    }

    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_override = Some(path.into());
        self
    }
}

/// Resolve only the build mode for a project.
pub fn resolve_mode(project_root: &Path, options: &ResolveOptions) -> Result<ResolvedMode> {
    let config_default = read_default_mode(
        project_root,
        options.config_override.as_deref(),
        &options.env,
    )?;

    Ok(ResolvedMode::resolve(
        options.mode_flag,
        config_default,
        &ModeDetector::new(),
        &options.env,
    ))
}

/// Resolve the mode and load the layered configuration for it.
///
/// The configuration is not validated.
pub fn load_project_config(
    project_root: &Path,
    options: &ResolveOptions,
) -> Result<(ResolvedMode, LoadedConfig)> {
    let resolved_mode = resolve_mode(project_root, options)?;

    let loaded = load_layered_config(
        project_root,
        resolved_mode.mode,
        options.config_override.as_deref(),
        &options.env,
    )?;
    if loaded.sources.is_empty() {
        debug!("No configuration files found, using defaults");
    }
    for source in &loaded.sources {
        debug!("Config layer: {}", source.display());
    }
    if loaded.env_overrides {
        debug!("Applied environment overrides");
    }

    Ok((resolved_mode, loaded))
}

/// Resolve the complete build plan for a project.
///
/// # Errors
///
/// Returns the first `ConfigError` raised by any stage. No partial plan is
/// produced.
///
/// # Example
///
/// ```
/// use buildplan::resolve::{resolve_build_plan, ResolveOptions};
/// use buildplan::EnvSnapshot;
/// use tempfile::TempDir;
///
/// let temp = TempDir::new().unwrap();
/// std::fs::write(temp.path().join("buildplan.yml"), "styles:\n  resources: []").unwrap();
///
/// let plan = resolve_build_plan(temp.path(), &ResolveOptions::new(EnvSnapshot::new())).unwrap();
/// assert!(plan.optimization_policy.source_map);
/// ```
pub fn resolve_build_plan(project_root: &Path, options: &ResolveOptions) -> Result<ResolvedConfig> {
    let root = absolute_root(project_root)?;

    let (resolved_mode, loaded) = load_project_config(&root, options)?;
    let mode = resolved_mode.mode;
    info!("Resolving {} build ({})", mode, resolved_mode.source);

    let config = loaded.config;
    validate(&config)?;

    let aliases = resolve_aliases(&root, &config.aliases)?;
    let styles = load_style_resources(&root, &config.styles)?;
    let proxy_rules = resolve_proxy_rules(&config.dev_server.proxy)?;
    let policy = select_policy(mode);

    let plan = assemble(mode, aliases, styles, policy, proxy_rules, &config)?;
    debug!(
        "Plan: {} aliases, {} style resources, {} proxy rules",
        plan.aliases.len(),
        plan.style_resources.len(),
        plan.proxy_rules.len()
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::mode::ModeSource;
    use crate::policy::OptimizationPolicy;
    use std::fs;
    use tempfile::TempDir;

    fn project_with_styles() -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("src/assets/styles/less");
        fs::create_dir_all(&dir).unwrap();
        for file in ["variables.less", "mixins.less", "functions.less"] {
            fs::write(dir.join(file), "").unwrap();
        }
        temp
    }

    #[test]
    fn unset_environment_resolves_development() {
        let temp = project_with_styles();

        let plan = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();

        assert_eq!(plan.mode, BuildMode::Development);
        assert_eq!(plan.optimization_policy, OptimizationPolicy::DEVELOPMENT);
    }

    #[test]
    fn production_environment_with_styles() {
        let temp = project_with_styles();
        let env = EnvSnapshot::from_pairs([("BUILD_MODE", "production")]);

        let plan = resolve_build_plan(temp.path(), &ResolveOptions::new(env)).unwrap();

        assert_eq!(plan.mode, BuildMode::Production);
        assert_eq!(plan.style_resources.len(), 3);
        assert!(plan.style_resources[0].ends_with("variables.less"));
        assert!(plan.style_resources[2].ends_with("functions.less"));
        assert!(plan.optimization_policy.compress);
    }

    #[test]
    fn missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let err = resolve_build_plan(&temp.path().join("gone"), &ResolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRoot { .. }));
    }

    #[test]
    fn missing_style_resource_aborts() {
        let temp = TempDir::new().unwrap();
        let err = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingStyleResource { .. }));
    }

    #[test]
    fn mode_file_layer_applies() {
        let temp = project_with_styles();
        fs::write(
            temp.path().join("buildplan.production.yml"),
            "output:\n  public_path: /app/\n",
        )
        .unwrap();

        let dev = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap();
        let prod = resolve_build_plan(
            temp.path(),
            &ResolveOptions::default().with_mode(BuildMode::Production),
        )
        .unwrap();

        assert_eq!(dev.output.public_path, "/");
        assert_eq!(prod.output.public_path, "/app/");
    }

    #[test]
    fn config_default_mode_is_used_without_environment() {
        let temp = project_with_styles();
        fs::write(temp.path().join("buildplan.yml"), "default_mode: production\n").unwrap();

        let resolved = resolve_mode(temp.path(), &ResolveOptions::default()).unwrap();
        assert_eq!(resolved.mode, BuildMode::Production);
        assert_eq!(resolved.source, ModeSource::ConfigDefault);
    }

    #[test]
    fn local_file_default_mode_is_used() {
        let temp = project_with_styles();
        fs::write(temp.path().join("buildplan.local.yml"), "default_mode: production\n").unwrap();

        let resolved = resolve_mode(temp.path(), &ResolveOptions::default()).unwrap();
        assert_eq!(resolved.mode, BuildMode::Production);
        assert_eq!(resolved.source, ModeSource::ConfigDefault);

        let (_, loaded) = load_project_config(temp.path(), &ResolveOptions::default()).unwrap();
        assert_eq!(loaded.config.default_mode, Some(resolved.mode));
    }

    #[test]
    fn numeric_output_dir_override_resolves() {
        let temp = project_with_styles();
        let env = EnvSnapshot::from_pairs([("BUILDPLAN__OUTPUT__OUTPUT_DIR", "2024")]);

        let plan = resolve_build_plan(temp.path(), &ResolveOptions::new(env)).unwrap();
        assert_eq!(plan.output.output_dir, PathBuf::from("2024"));
    }

    #[test]
    fn unrecognized_environment_mode_falls_through() {
        let temp = project_with_styles();
        let env = EnvSnapshot::from_pairs([("BUILD_MODE", "staging")]);

        let resolved = resolve_mode(temp.path(), &ResolveOptions::new(env)).unwrap();
        assert_eq!(resolved.mode, BuildMode::Development);
        assert_eq!(resolved.source, ModeSource::Fallback);
    }

    #[test]
    fn validation_errors_abort() {
        let temp = project_with_styles();
        fs::write(temp.path().join("buildplan.yml"), "dev_server:\n  port: 0\n").unwrap();

        let err = resolve_build_plan(temp.path(), &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigValidationError { .. }));
    }

    #[test]
    fn explicit_config_replaces_discovery() {
        let temp = project_with_styles();
        fs::write(temp.path().join("buildplan.yml"), "dev_server:\n  port: 7000\n").unwrap();
        let other = temp.path().join("ci.yml");
        fs::write(&other, "dev_server:\n  port: 7100\n").unwrap();

        let plan = resolve_build_plan(
            temp.path(),
            &ResolveOptions::default().with_config(&other),
        )
        .unwrap();
        assert_eq!(plan.dev_server.port, 7100);
    }

    #[test]
    fn environment_override_wins() {
        let temp = project_with_styles();
        fs::write(temp.path().join("buildplan.yml"), "dev_server:\n  port: 7000\n").unwrap();
        let env = EnvSnapshot::from_pairs([("BUILDPLAN__DEV_SERVER__PORT", "7200")]);

        let plan = resolve_build_plan(temp.path(), &ResolveOptions::new(env)).unwrap();
        assert_eq!(plan.dev_server.port, 7200);
    }
}
