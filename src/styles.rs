//! Shared style resources.
//!
//! Variables, mixins and functions files are prepended to every stylesheet
//! before compilation, so later files may use what earlier ones define.
//! Missing files fail here instead of deep inside the style compiler.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::schema::StyleSettings;
use crate::error::{ConfigError, Result};

/// Regex for a top-level `@name: value;` declaration.
static VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@([A-Za-z_][\w-]*)\s*:\s*([^;{}]+);").expect("VARIABLE_REGEX must compile")
});

/// Style resources ready for injection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleResources {
    /// Absolute paths, in declaration order
    pub files: Vec<PathBuf>,

    /// Preprocessor variables, empty unless extraction is enabled
    pub variables: BTreeMap<String, String>,
}

impl From<Vec<PathBuf>> for StyleResources {
    fn from(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            variables: BTreeMap::new(),
        }
    }
}

/// Collect the configured style files under `root`, in declaration order.
///
/// # Errors
///
/// Returns `MissingStyleResource` naming the first listed file that does
/// not exist.
pub fn collect_style_resources(root: &Path, settings: &StyleSettings) -> Result<Vec<PathBuf>> {
    settings
        .resources
        .iter()
        .map(|resource| {
            let path = root.join(resource);
            if !path.is_file() {
                return Err(ConfigError::MissingStyleResource { path });
            }
            debug!("Style resource {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Collect style files and, when enabled, extract their variables.
///
/// Variables come from `variables_file` if set, else the first resource.
pub fn load_style_resources(root: &Path, settings: &StyleSettings) -> Result<StyleResources> {
    let files = collect_style_resources(root, settings)?;

    let variables = if settings.extract_variables {
        let source = match &settings.variables_file {
            Some(file) => {
                let path = root.join(file);
                if !path.is_file() {
                    return Err(ConfigError::MissingStyleResource { path });
                }
                Some(path)
            }
            None => files.first().cloned(),
        };
        match source {
            Some(path) => extract_less_variables(&path)?,
            None => BTreeMap::new(),
        }
    } else {
        BTreeMap::new()
    };

    Ok(StyleResources { files, variables })
}

/// Parse top-level `@name: value;` declarations from a Less file.
///
/// Names are returned without the leading `@`. Later declarations of the
/// same name win, as they do in Less.
pub fn extract_less_variables(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingStyleResource {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io(e)
        }
    })?;
    Ok(parse_less_variables(&content))
}

fn parse_less_variables(content: &str) -> BTreeMap<String, String> {
    let mut variables = BTreeMap::new();

    for line in content.lines() {
        if let Some(caps) = VARIABLE_REGEX.captures(line) {
            variables.insert(caps[1].to_string(), caps[2].trim().to_string());
        }
    }

    variables
}
