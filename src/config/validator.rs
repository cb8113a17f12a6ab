//! Configuration validation rules.
//!
//! This module validates individual fields of a merged configuration:
//! - Output paths are usable
//! - Alias names are not empty
//! - Dev-server port and proxy rules are well-formed
//! - Cache group patterns compile
//! - Image optimizer options are in range
//!
//! Invariants that span several sections (for example compression needing
//! extensions) are checked when the plan is assembled.

use regex::Regex;
use tracing::debug;

use crate::config::schema::ProjectConfig;
use crate::error::{ConfigError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_output(config));
    errors.extend(validate_aliases(config));
    errors.extend(validate_dev_server(config));
    errors.extend(validate_chunks(config));
    errors.extend(validate_images(config));

    errors
}

fn validate_output(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let output = &config.output;

    if output.output_dir.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "empty-output-dir",
            "output.output_dir",
            "Output directory must not be empty",
        ));
    }

    if output.assets_dir.is_absolute() {
        errors.push(ValidationError::new(
            "absolute-assets-dir",
            "output.assets_dir",
            format!(
                "Assets directory '{}' must be relative to the output directory",
                output.assets_dir.display()
            ),
        ));
    }

    let public = output.public_path.as_str();
    let public_ok = public.is_empty()
        || public.starts_with('/')
        || public.starts_with("./")
        || public.starts_with("http://")
        || public.starts_with("https://");
    if !public_ok {
        errors.push(ValidationError::new(
            "invalid-public-path",
            "output.public_path",
            format!(
                "Public path '{}' must be empty, start with '/' or './', or be an absolute URL",
                public
            ),
        ));
    }

    errors
}

fn validate_aliases(config: &ProjectConfig) -> Vec<ValidationError> {
    config
        .aliases
        .iter()
        .filter_map(|(name, target)| {
            if name.trim().is_empty() {
                Some(ValidationError::new(
                    "empty-alias",
                    "aliases",
                    "Alias names must not be empty",
                ))
            } else if target.as_os_str().is_empty() {
                Some(ValidationError::new(
                    "empty-alias-target",
                    format!("aliases.{}", name),
                    format!("Alias '{}' has an empty target", name),
                ))
            } else {
                None
            }
        })
        .collect()
}

fn validate_dev_server(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let server = &config.dev_server;

    if server.port == 0 {
        errors.push(ValidationError::new(
            "invalid-port",
            "dev_server.port",
            "Dev server port must be between 1 and 65535",
        ));
    }

    if server.host.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-host",
            "dev_server.host",
            "Dev server host must not be empty",
        ));
    }

    for (i, rule) in server.proxy.iter().enumerate() {
        let field = format!("dev_server.proxy[{}]", i);

        if !rule.path_prefix.starts_with('/') {
            errors.push(ValidationError::new(
                "invalid-proxy-prefix",
                format!("{}.path_prefix", field),
                format!(
                    "Proxy path prefix '{}' must start with '/'",
                    rule.path_prefix
                ),
            ));
        }

        if !is_proxy_target(&rule.target) {
            errors.push(ValidationError::new(
                "invalid-proxy-target",
                format!("{}.target", field),
                format!(
                    "Proxy target '{}' must be an http(s):// or ws(s):// URL with a host",
                    rule.target
                ),
            ));
        }
    }

    errors
}

pub(crate) fn is_proxy_target(target: &str) -> bool {
    ["http://", "https://", "ws://", "wss://"]
        .iter()
        .find_map(|scheme| target.strip_prefix(scheme))
        .map(|rest| {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !host.contains(char::is_whitespace)
        })
        .unwrap_or(false)
}

fn validate_chunks(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (id, group) in &config.chunks.cache_groups {
        let field = format!("chunks.cache_groups.{}", id);

        if group.name.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-chunk-name",
                format!("{}.name", field),
                format!("Cache group '{}' must have a chunk name", id),
            ));
        }

        if let Some(test) = &group.test {
            match Regex::new(test) {
                Ok(_) => {}
                Err(e) if bundler_only_syntax(&e) => {
                    debug!("Cache group '{}': test pattern not checkable here: {}", id, e);
                }
                Err(e) => errors.push(ValidationError::new(
                    "invalid-chunk-test",
                    format!("{}.test", field),
                    format!("Cache group '{}' has an invalid test pattern: {}", id, e),
                )),
            }
        }
    }

    errors
}

/// Lookaround and backreferences are valid for the bundler's regex engine
/// but not supported by `regex`; such patterns are passed through unchecked.
fn bundler_only_syntax(error: &regex::Error) -> bool {
    error.to_string().contains("not supported")
}

fn validate_images(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let images = &config.images;

    if images.mozjpeg.quality > 100 {
        errors.push(ValidationError::new(
            "out-of-range",
            "images.mozjpeg.quality",
            "JPEG quality must be between 0 and 100",
        ));
    }

    let [min, max] = images.pngquant.quality;
    if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
        errors.push(ValidationError::new(
            "out-of-range",
            "images.pngquant.quality",
            "PNG quality must be an ascending pair within 0..1",
        ));
    }

    if !(1..=11).contains(&images.pngquant.speed) {
        errors.push(ValidationError::new(
            "out-of-range",
            "images.pngquant.speed",
            "PNG quantizer speed must be between 1 and 11",
        ));
    }

    if let Some(webp) = &images.webp {
        if webp.quality > 100 {
            errors.push(ValidationError::new(
                "out-of-range",
                "images.webp.quality",
                "WebP quality must be between 0 and 100",
            ));
        }
    }

    errors
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &ProjectConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        Err(ConfigError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
