//! Build mode detection and resolution.
//!
//! Determines whether the plan is resolved for development or production.
//! The priority chain is:
//!
//! 1. Explicit `--mode` flag
//! 2. Environment (`BUILD_MODE`, then `NODE_ENV`)
//! 3. Config `default_mode`
//! 4. Fallback to development

pub mod detection;
pub mod resolver;

pub use detection::{detect_mode, DetectedMode, ModeDetector, MODE_VARIABLES};
pub use resolver::{ModeSource, ResolvedMode};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The active build mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Unminified, source-mapped, proxy-enabled.
    #[default]
    Development,
    /// Minified, console-stripped, chunk-split, compressed, analyzed.
    Production,
}

impl BuildMode {
    /// Lowercase name, as used in file names and the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Whether this is the production mode.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("unknown build mode: {}", s)),
        }
    }
}
