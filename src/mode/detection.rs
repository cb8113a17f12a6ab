//! Build mode detection from the environment.
//!
//! Checks a fixed list of variables in order. The first variable that is
//! set decides; an unrecognized value never fails the build, it is reported
//! as an [`EnvironmentError`] and the caller falls back to development.

use tracing::warn;

use super::BuildMode;
use crate::env::EnvSnapshot;
use crate::error::EnvironmentError;

/// Variables consulted for the build mode, highest priority first.
pub const MODE_VARIABLES: [&str; 2] = ["BUILD_MODE", "NODE_ENV"];

/// A build mode read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedMode {
    /// The detected mode.
    pub mode: BuildMode,
    /// The variable that carried it.
    pub detected_via: String,
}

/// Parse an optional raw mode value, failing closed to development.
///
/// ```
/// use buildplan::mode::{detect_mode, BuildMode};
///
/// assert_eq!(detect_mode(None), BuildMode::Development);
/// assert_eq!(detect_mode(Some("production")), BuildMode::Production);
/// assert_eq!(detect_mode(Some("staging")), BuildMode::Development);
/// ```
///
/// Blank values count as unset.
pub fn detect_mode(value: Option<&str>) -> BuildMode {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => BuildMode::Development,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Unrecognized build mode {:?}, using development", raw);
            BuildMode::Development
        }),
    }
}

/// Environment-based mode detector.
#[derive(Debug, Clone)]
pub struct ModeDetector {
    variables: Vec<String>,
}

impl ModeDetector {
    /// Create a detector for [`MODE_VARIABLES`].
    pub fn new() -> Self {
        Self {
            variables: MODE_VARIABLES.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create a detector for a custom list of variables.
    pub fn with_variables<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    /// Variables this detector checks, in order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Detect the mode from a snapshot.
    ///
    /// Returns `Ok(None)` when no variable is set and an error when the first
    /// set variable holds an unknown value.
    pub fn detect(
        &self,
        env: &EnvSnapshot,
    ) -> std::result::Result<Option<DetectedMode>, EnvironmentError> {
        self.detect_with_env(|key| env.get(key).map(str::to_string))
    }

    /// Detect with a custom variable lookup.
    pub fn detect_with_env<F>(
        &self,
        env_fn: F,
    ) -> std::result::Result<Option<DetectedMode>, EnvironmentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for variable in &self.variables {
            let Some(value) = env_fn(variable) else {
                continue;
            };
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }

            return match trimmed.parse::<BuildMode>() {
                Ok(mode) => Ok(Some(DetectedMode {
                    mode,
                    detected_via: variable.clone(),
                })),
                Err(_) => Err(EnvironmentError::UnrecognizedMode {
                    variable: variable.clone(),
                    value,
                }),
            };
        }

        Ok(None)
    }
}

impl Default for ModeDetector {
    fn default() -> Self {
        Self::new()
    }
}
