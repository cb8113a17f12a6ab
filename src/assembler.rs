//! Build plan assembly.
//!
//! [`assemble`] combines the resolved pieces into one immutable
//! [`ResolvedConfig`], checking invariants that span several sections. It
//! does no I/O, so equal inputs always give equal plans.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::schema::{
    AnalyzerSettings, CacheGroup, CompressionAlgorithm, ImageOptimization, OutputSettings,
    OverlaySettings, Preprocessor, ProjectConfig, ResourceHints,
};
use crate::error::{ConfigError, Result};
use crate::mode::BuildMode;
use crate::policy::OptimizationPolicy;
use crate::proxy::ProxyRule;
use crate::styles::StyleResources;

/// The complete build plan handed to the bundler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub mode: BuildMode,
    pub output: OutputSettings,
    pub aliases: BTreeMap<String, PathBuf>,
    pub style_resources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub less_variables: BTreeMap<String, String>,
    pub optimization_policy: OptimizationPolicy,
    /// Present when `split_chunks` is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_splitting: Option<ChunkSplitting>,
    /// Present when `compress` is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionPlan>,
    /// Present when `analyze` is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerSettings>,
    pub css: CssPlan,
    pub images: ImageOptimization,
    pub resource_hints: ResourceHints,
    pub proxy_rules: Vec<ProxyRule>,
    pub dev_server: DevServerPlan,
}

/// Enabled cache groups, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSplitting {
    pub cache_groups: IndexMap<String, CacheGroup>,
}

/// Asset compression as the compression plugin expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionPlan {
    pub algorithm: CompressionAlgorithm,
    pub filename: String,
    /// Asset filter regex built from the extensions
    pub test: String,
    pub threshold: u64,
    pub min_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CssPlan {
    /// Extract stylesheets into separate files (production)
    pub extract: bool,
    pub source_map: bool,
    pub preprocessor: Preprocessor,
}

/// Dev-server settings without the proxy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevServerPlan {
    pub host: String,
    pub port: u16,
    pub https: bool,
    pub open: bool,
    pub hot_only: bool,
    pub symlinks: bool,
    pub overlay: OverlaySettings,
}

/// Assemble the build plan.
///
/// # Errors
///
/// Returns `InvalidField` naming the offending field when:
/// - `output.output_dir` is empty or `output.assets_dir` is absolute
/// - compression is on without any `compression.extensions`, or with
///   `compression.min_ratio` outside `(0, 1]`
/// - chunk splitting is on without an enabled cache group
/// - two proxy rules share a path prefix
pub fn assemble(
    mode: BuildMode,
    aliases: BTreeMap<String, PathBuf>,
    styles: StyleResources,
    policy: OptimizationPolicy,
    proxy_rules: Vec<ProxyRule>,
    settings: &ProjectConfig,
) -> Result<ResolvedConfig> {
    check_output(&settings.output)?;
    check_unique_prefixes(&proxy_rules)?;

    let compression = if policy.compress {
        Some(compression_plan(settings)?)
    } else {
        None
    };

    let chunk_splitting = if policy.split_chunks {
        Some(chunk_splitting(settings)?)
    } else {
        None
    };

    let analyzer = policy.analyze.then(|| settings.analyzer.clone());

    let server = &settings.dev_server;

    Ok(ResolvedConfig {
        mode,
        output: settings.output.clone(),
        aliases,
        style_resources: styles.files,
        less_variables: styles.variables,
        optimization_policy: policy,
        chunk_splitting,
        compression,
        analyzer,
        css: CssPlan {
            extract: mode.is_production(),
            source_map: policy.source_map,
            preprocessor: settings.css.preprocessor,
        },
        images: settings.images.clone(),
        resource_hints: settings.resource_hints,
        proxy_rules,
        dev_server: DevServerPlan {
            host: server.host.clone(),
            port: server.port,
            https: server.https,
            open: server.open,
            hot_only: server.hot_only,
            symlinks: server.symlinks,
            overlay: server.overlay,
        },
    })
}

fn check_output(output: &OutputSettings) -> Result<()> {
    if output.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::invalid("output.output_dir", "must not be empty"));
    }
    if output.assets_dir.is_absolute() {
        return Err(ConfigError::invalid(
            "output.assets_dir",
            "must be relative to the output directory",
        ));
    }
    Ok(())
}

fn check_unique_prefixes(rules: &[ProxyRule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.path_prefix.as_str()) {
            return Err(ConfigError::invalid(
                "dev_server.proxy",
                format!("path prefix '{}' is declared more than once", rule.path_prefix),
            ));
        }
    }
    Ok(())
}

fn compression_plan(settings: &ProjectConfig) -> Result<CompressionPlan> {
    let compression = &settings.compression;

    if !compression.extensions.iter().any(|e| !e.trim().is_empty()) {
        return Err(ConfigError::invalid(
            "compression.extensions",
            "compression is enabled but no compressible extension is declared",
        ));
    }
    if !(compression.min_ratio > 0.0 && compression.min_ratio <= 1.0) {
        return Err(ConfigError::invalid(
            "compression.min_ratio",
            format!("{} is outside (0, 1]", compression.min_ratio),
        ));
    }

    Ok(CompressionPlan {
        algorithm: compression.algorithm,
        filename: compression.filename.clone(),
        test: compression.test_pattern(),
        threshold: compression.threshold,
        min_ratio: compression.min_ratio,
    })
}

fn chunk_splitting(settings: &ProjectConfig) -> Result<ChunkSplitting> {
    let cache_groups: IndexMap<String, CacheGroup> = settings
        .chunks
        .cache_groups
        .iter()
        .filter(|(_, group)| group.enabled)
        .map(|(id, group)| (id.clone(), group.clone()))
        .collect();

    if cache_groups.is_empty() {
        return Err(ConfigError::invalid(
            "chunks.cache_groups",
            "chunk splitting is enabled but no cache group is enabled",
        ));
    }

    Ok(ChunkSplitting { cache_groups })
}
