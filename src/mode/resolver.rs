//! Build mode resolution.
//!
//! Resolves the active mode using the priority chain:
//! 1. Explicit `--mode` flag
//! 2. Environment detection (`BUILD_MODE`, `NODE_ENV`)
//! 3. Config `default_mode`
//! 4. Fallback to development

use tracing::{debug, warn};

use super::detection::{DetectedMode, ModeDetector};
use super::BuildMode;
use crate::env::EnvSnapshot;

/// How the mode was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSource {
    /// Explicitly set via `--mode`.
    Flag,
    /// Read from an environment variable.
    Environment(String),
    /// Set via config `default_mode`.
    ConfigDefault,
    /// Fallback to development.
    Fallback,
}

impl std::fmt::Display for ModeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--mode flag"),
            Self::Environment(var) => write!(f, "detected via {}", var),
            Self::ConfigDefault => write!(f, "config default"),
            Self::Fallback => write!(f, "default"),
        }
    }
}

/// A resolved mode with how it was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMode {
    /// The build mode.
    pub mode: BuildMode,
    /// How this mode was determined.
    pub source: ModeSource,
}

impl ResolvedMode {
    /// Resolve the mode using the priority chain.
    ///
    /// An unrecognized environment value is logged and skipped, so the chain
    /// continues with the config default and then the fallback.
    ///
    /// # Example
    ///
    /// ```
    /// use buildplan::mode::{BuildMode, ModeDetector, ModeSource, ResolvedMode};
    /// use buildplan::EnvSnapshot;
    ///
    /// let env = EnvSnapshot::from_pairs([("BUILD_MODE", "production")]);
    /// let resolved = ResolvedMode::resolve(None, None, &ModeDetector::new(), &env);
    /// assert_eq!(resolved.mode, BuildMode::Production);
    /// assert_eq!(resolved.source, ModeSource::Environment("BUILD_MODE".into()));
    /// ```
    pub fn resolve(
        flag: Option<BuildMode>,
        config_default: Option<BuildMode>,
        detector: &ModeDetector,
        env: &EnvSnapshot,
    ) -> Self {
        let detected = detector.detect(env).unwrap_or_else(|e| {
            warn!("{}; ignoring it", e);
            None
        });
        Self::resolve_with_detection(flag, config_default, detected)
    }

    /// Resolve with a pre-computed detection result.
    pub fn resolve_with_detection(
        flag: Option<BuildMode>,
        config_default: Option<BuildMode>,
        detected: Option<DetectedMode>,
    ) -> Self {
        let resolved = if let Some(mode) = flag {
            Self {
                mode,
                source: ModeSource::Flag,
            }
        } else if let Some(d) = detected {
            Self {
                mode: d.mode,
                source: ModeSource::Environment(d.detected_via),
            }
        } else if let Some(mode) = config_default {
            Self {
                mode,
                source: ModeSource::ConfigDefault,
            }
        } else {
            Self {
                mode: BuildMode::Development,
                source: ModeSource::Fallback,
            }
        };

        debug!("Build mode: {} ({})", resolved.mode, resolved.source);
        resolved
    }
}
