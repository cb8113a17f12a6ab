//! Configuration file discovery and loading.
//!
//! This module finds the configuration layers for a project root and
//! merges them in priority order on top of the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::config::env_overrides::{
    collect_overrides, env_override_layer, overrides_layer, EnvOverride,
};
use crate::config::merger::{deep_merge, merge_layers};
use crate::config::schema::ProjectConfig;
use crate::env::EnvSnapshot;
use crate::error::{ConfigError, Result};
use crate::mode::BuildMode;

/// Project configuration file name.
pub const PROJECT_FILE: &str = "buildplan.yml";

/// Untracked local overrides file name.
pub const LOCAL_FILE: &str = "buildplan.local.yml";

/// File name of the mode-specific layer, e.g. `buildplan.production.yml`.
pub fn mode_file_name(mode: BuildMode) -> String {
    format!("buildplan.{}.yml", mode)
}

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Built-in defaults
/// 2. Project config (`buildplan.yml`)
/// 3. Mode config (`buildplan.<mode>.yml`)
/// 4. Local overrides (`buildplan.local.yml`)
/// 5. `BUILDPLAN__*` environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Project config: buildplan.yml
    pub project: Option<PathBuf>,

    /// Mode config: buildplan.<mode>.yml
    pub mode: Option<PathBuf>,

    /// Local overrides: buildplan.local.yml
    pub local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root and mode.
    pub fn discover(project_root: &Path, mode: BuildMode) -> Self {
        Self {
            project: existing(project_root.join(PROJECT_FILE)),
            mode: existing(project_root.join(mode_file_name(mode))),
            local: existing(project_root.join(LOCAL_FILE)),
        }
    }

    /// Use a single explicit file instead of discovery.
    pub fn explicit(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            project: Some(path.to_path_buf()),
            mode: None,
            local: None,
        })
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.project, &self.mode, &self.local]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Check if a project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `buildplan.yml` (primary indicator)
/// 2. `package.json` (fallback)
///
/// # Returns
///
/// The path to the project root, or None if not found.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    let mut package_root = None;

    loop {
        if current.join(PROJECT_FILE).is_file() {
            return Some(current);
        }

        if package_root.is_none() && current.join("package.json").is_file() {
            package_root = Some(current.clone());
        }

        if !current.pop() {
            return package_root;
        }
    }
}

/// Load a config file as a raw YAML value (for merging).
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a [`ProjectConfig`] (no layering).
pub fn parse_config(content: &str, source_path: &Path) -> Result<ProjectConfig> {
    if content.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ConfigError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// The built-in defaults as the base layer.
pub fn defaults_layer() -> Result<Value> {
    serde_yaml::to_value(ProjectConfig::default()).map_err(|e| ConfigError::Other(e.into()))
}

/// Read `default_mode` from the layers that do not depend on the mode.
///
/// The mode must be known before the mode-specific layer can be chosen, so
/// this merges the project file, the local file and environment overrides
/// (or only the `--config` file and the environment).
pub fn read_default_mode(
    project_root: &Path,
    config_override: Option<&Path>,
    env: &EnvSnapshot,
) -> Result<Option<BuildMode>> {
    let paths = match config_override {
        Some(path) => ConfigPaths::explicit(path)?,
        None => ConfigPaths::discover(project_root, BuildMode::Development),
    };

    let mut layers = vec![defaults_layer()?];
    for path in [&paths.project, &paths.local].into_iter().flatten() {
        layers.push(load_config_value(path)?);
    }
    let base = merge_layers(layers);
    let merged = match env_override_layer(env, &base) {
        Some(layer) => deep_merge(base, layer),
        None => base,
    };

    match merged.get("default_mode") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_yaml::from_value(value.clone())
            .map(Some)
            .map_err(|e| ConfigError::invalid("default_mode", e.to_string())),
    }
}

/// A merged configuration and the files it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The typed, merged configuration.
    pub config: ProjectConfig,
    /// Files that contributed, in merge order.
    pub sources: Vec<PathBuf>,
    /// Whether `BUILDPLAN__*` variables contributed.
    pub env_overrides: bool,
}

/// Load and merge all configuration layers for a project.
///
/// If `config_override` is given, only that file is loaded (on top of the
/// defaults); otherwise the project, mode and local files are discovered.
/// A project without any file resolves to the defaults.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the override file doesn't exist.
/// Returns `ConfigParseError` if any layer is invalid.
pub fn load_layered_config(
    project_root: &Path,
    mode: BuildMode,
    config_override: Option<&Path>,
    env: &EnvSnapshot,
) -> Result<LoadedConfig> {
    let paths = match config_override {
        Some(path) => ConfigPaths::explicit(path)?,
        None => ConfigPaths::discover(project_root, mode),
    };

    let mut layers = vec![defaults_layer()?];
    let mut sources = Vec::new();

    for path in paths.all_existing() {
        debug!("Loading config layer {}", path.display());
        layers.push(load_config_value(path)?);
        sources.push(path.clone());
    }

    let base = merge_layers(layers);
    let overrides = collect_overrides(env, &base);
    let env_overrides = !overrides.is_empty();
    let merged = match overrides_layer(&overrides) {
        Some(layer) => deep_merge(base.clone(), layer),
        None => base.clone(),
    };

    let config = match serde_yaml::from_value(merged) {
        Ok(config) => config,
        Err(e) => return Err(parse_failure(&base, &overrides, &sources, project_root, e)),
    };

    Ok(LoadedConfig {
        config,
        sources,
        env_overrides,
    })
}

/// Name the layer responsible for a merged config that does not deserialize.
///
/// An override variable is blamed when the files alone are fine and that
/// variable alone breaks them.
fn parse_failure(
    base: &Value,
    overrides: &[EnvOverride],
    sources: &[PathBuf],
    project_root: &Path,
    error: serde_yaml::Error,
) -> ConfigError {
    if serde_yaml::from_value::<ProjectConfig>(base.clone()).is_ok() {
        for o in overrides {
            let single = deep_merge(base.clone(), o.to_layer());
            if let Err(e) = serde_yaml::from_value::<ProjectConfig>(single) {
                return ConfigError::InvalidOverride {
                    variable: o.variable.clone(),
                    message: e.to_string(),
                };
            }
        }
    }

    let path = sources
        .last()
        .cloned()
        .unwrap_or_else(|| project_root.join(PROJECT_FILE));
    ConfigError::ConfigParseError {
        path,
        message: format!("Failed to parse merged config: {}", error),
    }
}
