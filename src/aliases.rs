//! Path alias table.
//!
//! Aliases map short import prefixes such as `@components` to absolute
//! directories under the project root. The table is resolved once and
//! handed to the bundler's module resolver.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Resolve configured aliases against the project root.
///
/// Relative targets are joined onto `root`; absolute targets are kept.
///
/// # Errors
///
/// Returns `MissingRoot` if `root` is not an existing directory, and
/// `InvalidField` for an empty alias name or target.
///
/// # Example
///
/// ```
/// use buildplan::aliases::resolve_aliases;
/// use buildplan::config::schema::default_aliases;
/// use tempfile::TempDir;
///
/// let temp = TempDir::new().unwrap();
/// let aliases = resolve_aliases(temp.path(), &default_aliases()).unwrap();
/// assert!(aliases["@views"].ends_with("src/views"));
/// ```
pub fn resolve_aliases(
    root: &Path,
    aliases: &BTreeMap<String, PathBuf>,
) -> Result<BTreeMap<String, PathBuf>> {
    let root = absolute_root(root)?;

    aliases
        .iter()
        .map(|(name, target)| {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid("aliases", "alias name must not be empty"));
            }
            if target.as_os_str().is_empty() {
                return Err(ConfigError::invalid(
                    format!("aliases.{}", name),
                    "alias target must not be empty",
                ));
            }
            let resolved = root.join(target);
            debug!("Alias {} -> {}", name, resolved.display());
            Ok((name.clone(), resolved))
        })
        .collect()
}

/// Check that `root` is an existing directory and make it absolute.
pub(crate) fn absolute_root(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(ConfigError::MissingRoot {
            path: root.to_path_buf(),
        });
    }
    Ok(std::path::absolute(root)?)
}

/// A resolved alias table with import lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, PathBuf>,
}

impl AliasTable {
    pub fn new(entries: BTreeMap<String, PathBuf>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an import specifier through the longest matching alias.
    ///
    /// An alias matches when the specifier equals it or continues with `/`,
    /// so `@components/Button.vue` never matches the bare `@` alias.
    ///
    /// ```
    /// use buildplan::aliases::AliasTable;
    /// use std::collections::BTreeMap;
    /// use std::path::PathBuf;
    ///
    /// let table = AliasTable::new(BTreeMap::from([
    ///     ("@".to_string(), PathBuf::from("/app/src")),
    ///     ("@components".to_string(), PathBuf::from("/app/src/components")),
    /// ]));
    /// assert_eq!(
    ///     table.resolve_import("@components/Button.vue"),
    ///     Some(PathBuf::from("/app/src/components/Button.vue"))
    /// );
    /// assert_eq!(table.resolve_import("lodash"), None);
    /// ```
    pub fn resolve_import(&self, specifier: &str) -> Option<PathBuf> {
        self.entries
            .iter()
            .filter_map(|(name, target)| {
                let rest = specifier.strip_prefix(name.as_str())?;
                if rest.is_empty() {
                    Some((name.len(), target.clone()))
                } else {
                    rest.strip_prefix('/')
                        .map(|sub| (name.len(), target.join(sub)))
                }
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, path)| path)
    }

    pub fn into_inner(self) -> BTreeMap<String, PathBuf> {
        self.entries
    }
}

impl From<BTreeMap<String, PathBuf>> for AliasTable {
    fn from(entries: BTreeMap<String, PathBuf>) -> Self {
        Self::new(entries)
    }
}
