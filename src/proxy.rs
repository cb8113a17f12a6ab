//! Dev-server proxy rules.
//!
//! Requests whose path starts with a rule's prefix are forwarded to its
//! target after the first matching rewrite is applied. Rewrites are kept in
//! an ordered table keyed by pattern: when a pattern is declared twice the
//! entry keeps its first position and takes the last replacement.

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::schema::ProxyRuleConfig;
use crate::config::validator::is_proxy_target;
use crate::error::{ConfigError, Result};

/// A resolved proxy rule.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyRule {
    pub path_prefix: String,
    pub target: String,
    pub ws: bool,
    pub change_origin: bool,
    /// Pattern to replacement, in declaration order
    pub rewrite: IndexMap<String, String>,
    #[serde(skip)]
    compiled: Vec<Regex>,
}

impl PartialEq for ProxyRule {
    fn eq(&self, other: &Self) -> bool {
        // `compiled` is derived from `rewrite`
        self.path_prefix == other.path_prefix
            && self.target == other.target
            && self.ws == other.ws
            && self.change_origin == other.change_origin
            && self.rewrite == other.rewrite
    }
}

impl ProxyRule {
    /// Whether a request path is forwarded by this rule.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }

    /// Apply the first matching rewrite, or return the path unchanged.
    ///
    /// Replacements may refer to capture groups as `$1`.
    ///
    /// ```
    /// use buildplan::config::{ProxyRuleConfig, RewriteRule};
    /// use buildplan::proxy::resolve_proxy_rules;
    ///
    /// let rules = resolve_proxy_rules(&[ProxyRuleConfig {
    ///     path_prefix: "/api".into(),
    ///     target: "http://www.example.org".into(),
    ///     rewrite: vec![RewriteRule::new("^/api", "")],
    ///     ..ProxyRuleConfig::default()
    /// }])
    /// .unwrap();
    /// assert_eq!(rules[0].rewrite_path("/api/users"), "/users");
    /// ```
    pub fn rewrite_path(&self, path: &str) -> String {
        self.compiled
            .iter()
            .zip(self.rewrite.values())
            .find(|(regex, _)| regex.is_match(path))
            .map(|(regex, replacement)| regex.replace(path, replacement.as_str()).into_owned())
            .unwrap_or_else(|| path.to_string())
    }
}

/// Find the first rule, in declaration order, that forwards `path`.
pub fn find_rule<'a>(rules: &'a [ProxyRule], path: &str) -> Option<&'a ProxyRule> {
    rules.iter().find(|rule| rule.matches(path))
}

/// Validate configured proxy rules and collapse their rewrite tables.
///
/// # Errors
///
/// Returns `InvalidField` naming the rule for a prefix that does not start
/// with `/`, a target that is not an http(s) or ws(s) URL, or a rewrite
/// pattern that does not compile.
pub fn resolve_proxy_rules(configs: &[ProxyRuleConfig]) -> Result<Vec<ProxyRule>> {
    configs
        .iter()
        .enumerate()
        .map(|(index, config)| resolve_rule(index, config))
        .collect()
}

fn resolve_rule(index: usize, config: &ProxyRuleConfig) -> Result<ProxyRule> {
    let field = format!("dev_server.proxy[{}]", index);

    if !config.path_prefix.starts_with('/') {
        return Err(ConfigError::invalid(
            format!("{}.path_prefix", field),
            format!("'{}' must start with '/'", config.path_prefix),
        ));
    }
    if !is_proxy_target(&config.target) {
        return Err(ConfigError::invalid(
            format!("{}.target", field),
            format!(
                "'{}' is not an http(s):// or ws(s):// URL",
                config.target
            ),
        ));
    }

    let mut rewrite = IndexMap::new();
    for rule in &config.rewrite {
        if let Some(previous) = rewrite.insert(rule.pattern.clone(), rule.replacement.clone()) {
            warn!(
                "Proxy {}: rewrite '{}' declared twice; '{}' replaces '{}'",
                config.path_prefix, rule.pattern, rule.replacement, previous
            );
        }
    }

    let compiled = rewrite
        .keys()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                ConfigError::invalid(
                    format!("{}.rewrite", field),
                    format!("invalid pattern '{}': {}", pattern, e),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Proxy {} -> {} ({} rewrites)",
        config.path_prefix,
        config.target,
        rewrite.len()
    );

    Ok(ProxyRule {
        path_prefix: config.path_prefix.clone(),
        target: config.target.clone(),
        ws: config.ws,
        change_origin: config.change_origin,
        rewrite,
        compiled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RewriteRule;

    fn api_rule(rewrite: Vec<RewriteRule>) -> ProxyRuleConfig {
        ProxyRuleConfig {
            path_prefix: "/api".to_string(),
            target: "http://www.example.org".to_string(),
            rewrite,
            ..ProxyRuleConfig::default()
        }
    }

    #[test]
    fn duplicate_rewrite_pattern_last_write_wins() {
        let configs = [api_rule(vec![
            RewriteRule::new("^/api", "/api"),
            RewriteRule::new("^/api", "/"),
        ])];

        let rules = resolve_proxy_rules(&configs).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rewrite.len(), 1);
        assert_eq!(rules[0].rewrite.get("^/api"), Some(&"/".to_string()));
        assert_eq!(rules[0].rewrite_path("/api/users"), "//users");
    }

    #[test]
    fn duplicate_keeps_first_position() {
        let configs = [api_rule(vec![
            RewriteRule::new("^/api/v1", "/v1"),
            RewriteRule::new("^/api/v2", "/v2"),
            RewriteRule::new("^/api/v1", "/legacy"),
        ])];

        let rules = resolve_proxy_rules(&configs).unwrap();
        let entries: Vec<_> = rules[0]
            .rewrite
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(entries, vec![("^/api/v1", "/legacy"), ("^/api/v2", "/v2")]);
    }

    #[test]
    fn first_matching_rewrite_applies() {
        let configs = [api_rule(vec![
            RewriteRule::new("^/api/admin", "/internal"),
            RewriteRule::new("^/api", ""),
        ])];

        let rules = resolve_proxy_rules(&configs).unwrap();

        assert_eq!(rules[0].rewrite_path("/api/admin/users"), "/internal/users");
        assert_eq!(rules[0].rewrite_path("/api/users"), "/users");
        assert_eq!(rules[0].rewrite_path("/other"), "/other");
    }

    #[test]
    fn capture_groups_in_replacement() {
        let configs = [api_rule(vec![RewriteRule::new("^/api/v(\\d+)", "/version-$1")])];

        let rules = resolve_proxy_rules(&configs).unwrap();
        assert_eq!(rules[0].rewrite_path("/api/v2/items"), "/version-2/items");
    }

    #[test]
    fn find_rule_uses_declaration_order() {
        let mut auth = api_rule(Vec::new());
        auth.path_prefix = "/api/auth".to_string();
        auth.target = "https://auth.example.org".to_string();
        let configs = [api_rule(Vec::new()), auth];

        let rules = resolve_proxy_rules(&configs).unwrap();

        let rule = find_rule(&rules, "/api/auth/login").unwrap();
        assert_eq!(rule.target, "http://www.example.org");
        assert!(find_rule(&rules, "/static/app.js").is_none());
    }

    #[test]
    fn prefix_must_start_with_slash() {
        let mut config = api_rule(Vec::new());
        config.path_prefix = "api".to_string();

        let err = resolve_proxy_rules(&[config]).unwrap_err();
        assert!(err.to_string().contains("dev_server.proxy[0].path_prefix"));
    }

    #[test]
    fn target_must_be_a_url() {
        let mut config = api_rule(Vec::new());
        config.target = "www.example.org".to_string();

        let err = resolve_proxy_rules(&[config]).unwrap_err();
        assert!(err.to_string().contains("dev_server.proxy[0].target"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let configs = [api_rule(vec![RewriteRule::new("^/api(", "/")])];

        let err = resolve_proxy_rules(&configs).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("dev_server.proxy[0].rewrite"));
        assert!(msg.contains("^/api("));
    }

    #[test]
    fn equality_ignores_compiled_patterns() {
        let configs = [api_rule(vec![RewriteRule::new("^/api", "/")])];
        let a = resolve_proxy_rules(&configs).unwrap();
        let b = resolve_proxy_rules(&configs).unwrap();
        assert_eq!(a, b);
    }
}
