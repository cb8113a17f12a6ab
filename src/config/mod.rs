//! Configuration loading, parsing, and validation.
//!
//! This module handles all aspects of project configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - `BUILDPLAN__*` environment overrides in [`env_overrides`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use buildplan::config::{load_layered_config, validate};
//! use buildplan::mode::BuildMode;
//! use buildplan::EnvSnapshot;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("buildplan.yml"), "output:\n  output_dir: build").unwrap();
//!
//! let loaded = load_layered_config(
//!     temp.path(),
//!     BuildMode::Development,
//!     None,
//!     &EnvSnapshot::new(),
//! )
//! .unwrap();
//! validate(&loaded.config).unwrap();
//! assert_eq!(loaded.config.output.output_dir.to_str(), Some("build"));
//! ```
//!
//! # Configuration File Locations
//!
//! Layers are merged in this order:
//! 1. Built-in defaults
//! 2. Project config (`buildplan.yml`)
//! 3. Mode config (`buildplan.development.yml` / `buildplan.production.yml`)
//! 4. Local overrides (`buildplan.local.yml`)
//! 5. `BUILDPLAN__SECTION__FIELD` environment variables

pub mod env_overrides;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{
    AnalyzerMode, AnalyzerSettings, CacheGroup, ChunkConfig, ChunkSelection,
    CompressionAlgorithm, CompressionSettings, CssConfig, DevServerConfig, ImageOptimization,
    OutputSettings, Preprocessor, ProjectConfig, ProxyRuleConfig, ResourceHints, RewriteRule,
    StyleSettings,
};

// Loader re-exports
pub use loader::{
    find_project_root, load_config_value, load_layered_config, parse_config, read_default_mode,
    ConfigPaths, LoadedConfig, LOCAL_FILE, PROJECT_FILE,
};

// Merger re-exports
pub use merger::{deep_merge, merge_layers};

// Env override re-exports
pub use env_overrides::{collect_overrides, env_override_layer, EnvOverride, ENV_PREFIX};

// Validator re-exports
pub use validator::{validate, validate_config, ValidationError};
