//! Mode-conditional optimization policy.
//!
//! Exactly one policy is active per build, chosen purely by the build
//! mode. Every toggle is explicit for both modes.

use serde::Serialize;

use crate::mode::BuildMode;

/// Optimization toggles handed to the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OptimizationPolicy {
    pub minify: bool,
    pub drop_console: bool,
    pub source_map: bool,
    pub split_chunks: bool,
    pub compress: bool,
    pub analyze: bool,
}

impl OptimizationPolicy {
    /// Production: minified, console-stripped, chunk-split, compressed, analyzed.
    pub const PRODUCTION: Self = Self {
        minify: true,
        drop_console: true,
        source_map: false,
        split_chunks: true,
        compress: true,
        analyze: true,
    };

    /// Development: unminified and source-mapped.
    pub const DEVELOPMENT: Self = Self {
        minify: false,
        drop_console: false,
        source_map: true,
        split_chunks: false,
        compress: false,
        analyze: false,
    };

    /// Names and values of every toggle, in declaration order.
    pub fn toggles(&self) -> [(&'static str, bool); 6] {
        [
            ("minify", self.minify),
            ("drop_console", self.drop_console),
            ("source_map", self.source_map),
            ("split_chunks", self.split_chunks),
            ("compress", self.compress),
            ("analyze", self.analyze),
        ]
    }
}

/// Select the policy for a mode.
///
/// ```
/// use buildplan::mode::BuildMode;
/// use buildplan::policy::select_policy;
///
/// let policy = select_policy(BuildMode::Production);
/// assert!(policy.minify && policy.drop_console);
/// ```
pub fn select_policy(mode: BuildMode) -> OptimizationPolicy {
    match mode {
        BuildMode::Production => OptimizationPolicy::PRODUCTION,
        BuildMode::Development => OptimizationPolicy::DEVELOPMENT,
    }
}
