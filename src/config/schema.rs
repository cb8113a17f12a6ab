//! Configuration schema definitions.
//!
//! This module contains all the struct definitions that map to
//! the `buildplan.yml` file format. Every struct fills omitted fields with
//! its defaults, so an empty file describes the stock project layout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::mode::BuildMode;

/// Root configuration structure for `buildplan.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Mode used when neither `--mode` nor the environment selects one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<BuildMode>,

    /// Output paths and emission settings
    pub output: OutputSettings,

    /// Symbolic import prefixes, relative to the project root
    pub aliases: BTreeMap<String, PathBuf>,

    /// Shared style resources injected into every stylesheet
    pub styles: StyleSettings,

    /// Development server settings
    pub dev_server: DevServerConfig,

    /// Compression of emitted assets (production)
    pub compression: CompressionSettings,

    /// Chunk splitting (production)
    pub chunks: ChunkConfig,

    /// Bundle analysis report (production)
    pub analyzer: AnalyzerSettings,

    /// Stylesheet handling
    pub css: CssConfig,

    /// Image loader options
    pub images: ImageOptimization,

    /// Prefetch/preload link injection
    pub resource_hints: ResourceHints,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_mode: None,
            output: OutputSettings::default(),
            aliases: default_aliases(),
            styles: StyleSettings::default(),
            dev_server: DevServerConfig::default(),
            compression: CompressionSettings::default(),
            chunks: ChunkConfig::default(),
            analyzer: AnalyzerSettings::default(),
            css: CssConfig::default(),
            images: ImageOptimization::default(),
            resource_hints: ResourceHints::default(),
        }
    }
}

/// The stock alias table.
pub fn default_aliases() -> BTreeMap<String, PathBuf> {
    [
        ("@", "src"),
        ("@assets", "src/assets"),
        ("@components", "src/components"),
        ("@views", "src/views"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
    .collect()
}

/// Where and how bundles are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output directory, relative to the project root
    pub output_dir: PathBuf,

    /// Static asset directory, relative to `output_dir`
    pub assets_dir: PathBuf,

    /// Generated index file, relative to `output_dir`
    pub index_path: PathBuf,

    /// Public URL prefix of the deployed bundle
    pub public_path: String,

    /// Content hashes in emitted file names
    pub filename_hashing: bool,

    /// Ship the runtime template compiler
    pub runtime_compiler: bool,

    /// Run loaders in parallel workers
    pub parallel: bool,

    /// Dependencies that must be transpiled
    pub transpile_dependencies: Vec<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            assets_dir: PathBuf::from("static"),
            index_path: PathBuf::from("index.html"),
            public_path: "/".to_string(),
            filename_hashing: true,
            runtime_compiler: false,
            parallel: default_parallel(),
            transpile_dependencies: Vec::new(),
        }
    }
}

fn default_parallel() -> bool {
    std::thread::available_parallelism()
        .map(|n| n.get() > 1)
        .unwrap_or(false)
}

/// Shared style resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    /// Files prepended to every stylesheet, in order
    pub resources: Vec<PathBuf>,

    /// Extract `@name: value;` declarations as preprocessor variables
    pub extract_variables: bool,

    /// File to extract variables from (defaults to the first resource)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_file: Option<PathBuf>,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            resources: default_style_resources(),
            extract_variables: false,
            variables_file: None,
        }
    }
}

/// The stock shared style files.
pub fn default_style_resources() -> Vec<PathBuf> {
    ["variables.less", "mixins.less", "functions.less"]
        .iter()
        .map(|file| PathBuf::from("src/assets/styles/less").join(file))
        .collect()
}

/// Development server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    pub host: String,
    pub port: u16,
    pub https: bool,
    /// Open a browser on start
    pub open: bool,
    /// Hot reload without full-page fallback
    pub hot_only: bool,
    /// Resolve symlinks to their real path (needed for hot reload of linked packages)
    pub symlinks: bool,
    pub overlay: OverlaySettings,
    /// Proxy rules, matched in declaration order
    pub proxy: Vec<ProxyRuleConfig>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            https: false,
            open: false,
            hot_only: true,
            symlinks: true,
            overlay: OverlaySettings::default(),
            proxy: Vec::new(),
        }
    }
}

/// Which diagnostics the browser overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub warnings: bool,
    pub errors: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            warnings: true,
            errors: true,
        }
    }
}

/// A proxy rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyRuleConfig {
    /// Request path prefix, e.g. `/api`
    pub path_prefix: String,

    /// Upstream URL
    pub target: String,

    /// Proxy websocket upgrades
    pub ws: bool,

    /// Rewrite the `Host` header to the target
    pub change_origin: bool,

    /// Path rewrites, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rewrite: Vec<RewriteRule>,
}

impl Default for ProxyRuleConfig {
    fn default() -> Self {
        Self {
            path_prefix: String::new(),
            target: String::new(),
            ws: true,
            change_origin: true,
            rewrite: Vec::new(),
        }
    }
}

/// A single path rewrite: regex pattern and replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    /// Create a rewrite rule.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Compression of emitted assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionSettings {
    pub algorithm: CompressionAlgorithm,

    /// Output file name template
    pub filename: String,

    /// Compressible file extensions, without the dot
    pub extensions: Vec<String>,

    /// Only compress assets larger than this many bytes
    pub threshold: u64,

    /// Only keep results that compress at least this well
    pub min_ratio: f64,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            algorithm: CompressionAlgorithm::Gzip,
            filename: "[path].gz[query]".to_string(),
            extensions: ["js", "css", "json", "txt", "html", "ico", "svg"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            threshold: 10240,
            min_ratio: 0.8,
        }
    }
}

impl CompressionSettings {
    /// Asset filter pattern matching the configured extensions.
    ///
    /// ```
    /// use buildplan::config::CompressionSettings;
    ///
    /// let settings = CompressionSettings::default();
    /// assert_eq!(
    ///     settings.test_pattern(),
    ///     r"(?i)\.(js|css|json|txt|html|ico|svg)(\?.*)?$"
    /// );
    /// ```
    pub fn test_pattern(&self) -> String {
        let extensions: Vec<String> = self
            .extensions
            .iter()
            .map(|e| regex::escape(e.trim_start_matches('.')))
            .collect();
        format!(r"(?i)\.({})(\?.*)?$", extensions.join("|"))
    }
}

/// Compression algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    #[default]
    Gzip,
    Brotli,
}

/// Chunk splitting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Cache groups keyed by id, in declaration order
    pub cache_groups: IndexMap<String, CacheGroup>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        let mut cache_groups = IndexMap::new();
        cache_groups.insert(
            "common".to_string(),
            CacheGroup {
                name: "chunk-common".to_string(),
                min_chunks: Some(2),
                max_initial_requests: Some(5),
                min_size: Some(0),
                priority: 1,
                ..CacheGroup::default()
            },
        );
        cache_groups.insert(
            "vendors".to_string(),
            CacheGroup {
                name: "chunk-vendors".to_string(),
                test: Some(r"[\\/]node_modules[\\/]".to_string()),
                priority: 2,
                ..CacheGroup::default()
            },
        );
        Self { cache_groups }
    }
}

/// A chunk cache group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheGroup {
    /// Emitted chunk name
    pub name: String,

    /// Module path regex, in the bundler's (JavaScript) syntax.
    ///
    /// Validation compiles it with the `regex` crate; lookaround and
    /// backreferences cannot be checked that way and are passed through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,

    pub chunks: ChunkSelection,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_chunks: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_initial_requests: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,

    pub priority: i32,
    pub reuse_existing_chunk: bool,
    pub enforce: bool,

    /// Disabled groups stay in the file but are left out of the plan
    pub enabled: bool,
}

impl Default for CacheGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            test: None,
            chunks: ChunkSelection::Initial,
            min_chunks: None,
            max_initial_requests: None,
            min_size: None,
            priority: 0,
            reuse_existing_chunk: true,
            enforce: true,
            enabled: true,
        }
    }
}

/// Which chunks a cache group may pull modules from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSelection {
    #[default]
    Initial,
    Async,
    All,
}

/// Bundle analyzer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub mode: AnalyzerMode,
    pub report_filename: String,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            mode: AnalyzerMode::Static,
            report_filename: "report.html".to_string(),
        }
    }
}

/// How the analyzer publishes its report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Write an HTML report next to the bundle
    #[default]
    Static,
    /// Serve the report over HTTP
    Server,
    /// Write raw stats as JSON
    Json,
}

/// Stylesheet configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    pub preprocessor: Preprocessor,
}

/// Style pre-processor language the shared resources are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preprocessor {
    #[default]
    Less,
    Sass,
    Scss,
    Stylus,
}

/// Image loader options, passed through to the image optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptimization {
    pub enabled: bool,
    pub mozjpeg: MozjpegOptions,
    pub optipng: OptipngOptions,
    pub pngquant: PngquantOptions,
    pub gifsicle: GifsicleOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webp: Option<WebpOptions>,
}

impl Default for ImageOptimization {
    fn default() -> Self {
        Self {
            enabled: true,
            mozjpeg: MozjpegOptions::default(),
            optipng: OptipngOptions::default(),
            pngquant: PngquantOptions::default(),
            gifsicle: GifsicleOptions::default(),
            webp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MozjpegOptions {
    pub progressive: bool,
    pub quality: u8,
}

impl Default for MozjpegOptions {
    fn default() -> Self {
        Self {
            progressive: true,
            quality: 65,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptipngOptions {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PngquantOptions {
    /// Minimum and maximum quality, each in `0..=1`
    pub quality: [f64; 2],
    pub speed: u8,
}

impl Default for PngquantOptions {
    fn default() -> Self {
        Self {
            quality: [0.65, 0.9],
            speed: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GifsicleOptions {
    pub interlaced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebpOptions {
    pub quality: u8,
}

/// Prefetch/preload hint injection. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceHints {
    pub prefetch: bool,
    pub preload: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.output.output_dir, PathBuf::from("dist"));
        assert_eq!(config.output.assets_dir, PathBuf::from("static"));
        assert_eq!(config.dev_server.port, 8888);
        assert!(config.dev_server.proxy.is_empty());
    }

    #[test]
    fn default_aliases_are_the_four_source_roots() {
        let aliases = default_aliases();
        assert_eq!(aliases.len(), 4);
        assert_eq!(aliases["@"], PathBuf::from("src"));
        assert_eq!(aliases["@components"], PathBuf::from("src/components"));
    }

    #[test]
    fn default_style_resources_are_ordered() {
        let resources = default_style_resources();
        let names: Vec<_> = resources
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["variables.less", "mixins.less", "functions.less"]);
    }

    #[test]
    fn proxy_rule_defaults_ws_and_change_origin() {
        let yaml = r#"
path_prefix: /api
target: http://www.example.org
rewrite:
  - pattern: "^/api"
    replacement: "/"
"#;
        let rule: ProxyRuleConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(rule.ws);
        assert!(rule.change_origin);
        assert_eq!(rule.rewrite, vec![RewriteRule::new("^/api", "/")]);
    }

    #[test]
    fn cache_groups_keep_declaration_order() {
        let yaml = r#"
cache_groups:
  vendors:
    name: chunk-vendors
  echarts:
    name: chunk-echarts
    enabled: false
  common:
    name: chunk-common
"#;
        let chunks: ChunkConfig = serde_yaml::from_str(yaml).unwrap();
        let ids: Vec<_> = chunks.cache_groups.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["vendors", "echarts", "common"]);
        assert!(!chunks.cache_groups["echarts"].enabled);
        assert!(chunks.cache_groups["common"].reuse_existing_chunk);
    }

    #[test]
    fn compression_test_pattern_matches_query_strings() {
        let pattern = regex::Regex::new(&CompressionSettings::default().test_pattern()).unwrap();
        assert!(pattern.is_match("app.3f2a.js"));
        assert!(pattern.is_match("style.CSS?v=2"));
        assert!(!pattern.is_match("logo.png"));
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let result: Result<CompressionSettings, _> = serde_yaml::from_str("algorithm: zstd");
        assert!(result.is_err());
    }

    #[test]
    fn default_mode_parses_lowercase() {
        let config: ProjectConfig = serde_yaml::from_str("default_mode: production").unwrap();
        assert_eq!(config.default_mode, Some(BuildMode::Production));
    }
}
